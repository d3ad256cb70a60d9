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

//! The base contract of every feature pipeline stage.
//!
//! A lane is a small, stateless-or-configured unit of hot-path work (filter,
//! transform, render packing). Agents hold lanes and decide when they run.

use std::fmt;

/// The kind of processing a lane performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Selects which loaded features are eligible for display.
    Filter,
    /// Normalizes features right after load.
    Transform,
    /// Turns features into GPU-consumable records.
    Render,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Filter => write!(f, "Filter"),
            LaneKind::Transform => write!(f, "Transform"),
            LaneKind::Render => write!(f, "Render"),
        }
    }
}

/// Base trait for all lanes.
pub trait Lane: Send + Sync {
    /// Human-readable name of the lane's strategy, used in logs.
    fn strategy_name(&self) -> &'static str;

    /// The kind of processing this lane performs.
    fn lane_kind(&self) -> LaneKind;
}
