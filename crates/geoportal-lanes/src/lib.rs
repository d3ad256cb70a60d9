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

//! # Geoportal Lanes
//!
//! Hot-path pipelines run on every loaded feature or on every GPU upload:
//! the loading-time filter, the post-load transform and the attribute
//! packing of the two renderer strategies.

pub mod feature_lane;
pub mod render_lane;

pub use feature_lane::{ExcludedTypes, FeatureFilterLane, FeatureTransformLane};
pub use render_lane::{
    renderer_for, Attribute, Channel, GenericRenderer, LayerRenderer, PackedBuffer,
    PointRenderer, RenderFunctions,
};
