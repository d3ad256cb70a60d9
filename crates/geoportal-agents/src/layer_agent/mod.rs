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

//! The WebGL layer and the pieces it is assembled from.

mod base_layer;
mod legend;
mod rendered_layer;
mod services;
mod source_manager;
mod webgl_layer;

pub use base_layer::{BaseLayer, LayerLifecycle};
pub use legend::build_legend;
pub use rendered_layer::{LayerOptions, RenderedLayer, UploadedBuffer};
pub use services::{LayerServices, NoLoader};
pub use source_manager::SourceManager;
pub use webgl_layer::{LayerState, WebGlLayer};
