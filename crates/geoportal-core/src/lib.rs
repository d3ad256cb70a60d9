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

//! # Geoportal Core
//!
//! Foundational crate containing traits, core types, and collaborator
//! contracts shared by every layer of the WebGL map-layer stack.
//!
//! Nothing in here knows how a layer is built or loaded. Higher-level crates
//! (`geoportal-data`, `geoportal-lanes`, `geoportal-agents`) depend on these
//! contracts and receive concrete collaborators through injection.

#![warn(missing_docs)]

pub mod color;
pub mod event;
pub mod feature;
pub mod geometry;
pub mod lane;
pub mod legend;
pub mod loader;
pub mod renderer;
pub mod services;
pub mod style;

pub use color::RgbaColor;
pub use event::{EventBus, LayerEvent};
pub use feature::{Feature, Properties, SharedFeature};
pub use geometry::{BoundingRegion, Extent, GeometryType};
pub use lane::{Lane, LaneKind};
pub use legend::{LegendEntry, LegendInfo};
pub use loader::{FeatureLoader, LoadError, LoadRequest};
pub use renderer::{GraphicsDevice, RendererMode};
pub use services::{FeatureNotifier, LoaderOverlay};
pub use style::{StyleModel, StyleRegistry, StyleRule, VectorStyle};
