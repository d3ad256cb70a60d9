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

//! Errors raised while decoding configuration and feature documents.

use thiserror::Error;

/// A document could not be turned into descriptors, styles or features.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid GeoJSON document: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("invalid configuration document: {0}")]
    Config(#[from] serde_json::Error),
}
