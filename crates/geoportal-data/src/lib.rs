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

//! # Geoportal Data
//!
//! Data layouts of the layer stack: raw layer descriptors, the mutable
//! feature source, rule-based style models and the in-memory registries the
//! portal configuration is read into.

pub mod decode;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod source;
pub mod style_model;

pub use decode::decode_features;
pub use descriptor::{GfiAttributes, LayerDescriptor, LegendConfig, SourceKind};
pub use error::DecodeError;
pub use registry::{InMemoryLayerRegistry, RawLayerRegistry};
pub use source::VectorSource;
pub use style_model::{InMemoryStyleRegistry, RuleStyleModel};
