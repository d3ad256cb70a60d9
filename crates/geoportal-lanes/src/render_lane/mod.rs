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

//! Renderer strategies turning visible features into GPU attribute buffers.
//!
//! A layer picks one [`LayerRenderer`] when its GPU object is built and keeps
//! it until the layer is fully reconstructed.

mod generic_renderer;
mod point_renderer;
mod render_functions;

pub use generic_renderer::{GenericRenderer, GenericVertex, Primitive};
pub use point_renderer::{PointInstance, PointRenderer};
pub use render_functions::{
    Attribute, AttributeFn, Channel, RenderFunctions, DEFAULT_POINT_SIZE, DEFAULT_STROKE_WIDTH,
    UNBOUND_FILL_OPACITY, UNBOUND_POINT_OPACITY, UNBOUND_STROKE_OPACITY,
};

use geoportal_core::feature::SharedFeature;
use geoportal_core::lane::Lane;
use geoportal_core::renderer::{BufferUsage, RendererMode};
use geoportal_core::style::PointSymbol;

/// Records packed for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedBuffer {
    /// Raw record bytes.
    pub bytes: Vec<u8>,
    /// Number of records.
    pub count: usize,
    /// Size of one record in bytes.
    pub stride: u64,
    /// How the buffer is bound.
    pub usage: BufferUsage,
}

impl PackedBuffer {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Packs the features of a layer into GPU records.
pub trait LayerRenderer: Lane {
    /// The strategy this renderer implements.
    fn mode(&self) -> RendererMode;

    /// Packs `features` in order.
    fn pack(&self, features: &[SharedFeature]) -> PackedBuffer;
}

/// Creates the renderer for `mode`. `symbol` styles point features that
/// have no rule bound.
pub fn renderer_for(mode: RendererMode, symbol: PointSymbol) -> Box<dyn LayerRenderer> {
    match mode {
        RendererMode::Point => Box::new(PointRenderer::new(symbol)),
        RendererMode::Generic => Box::new(GenericRenderer::new()),
    }
}
