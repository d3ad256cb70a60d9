// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Legend entries attached to a layer.

use crate::style::VectorStyle;
use serde::{Deserialize, Serialize};

/// One entry of a layer legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegendEntry {
    /// A legend graphic referenced by URL (or any other verbatim string).
    Graphic(String),
    /// A legend entry derived from a style rule.
    Info(LegendInfo),
}

/// A legend entry derived from a style rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegendInfo {
    /// Label of the entry.
    pub label: String,
    /// Geometry type the symbol is drawn for.
    pub geometry_type: Option<String>,
    /// Paint of the symbol.
    pub style: VectorStyle,
}

impl From<&str> for LegendEntry {
    fn from(value: &str) -> Self {
        LegendEntry::Graphic(value.to_string())
    }
}
