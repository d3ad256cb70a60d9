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

//! The GPU-backed visual object of a layer.

use geoportal_core::lane::Lane;
use geoportal_core::renderer::{
    BufferDescriptor, BufferId, GraphicsDevice, RendererMode, ResourceError,
};
use geoportal_data::{GfiAttributes, LayerDescriptor, VectorSource};
use geoportal_lanes::LayerRenderer;
use std::fmt;
use std::sync::Arc;

/// Options a rendered layer is created with, read from the layer attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOptions {
    /// Id of the owning layer, used in buffer labels and logs.
    pub id: String,
    pub name: Option<String>,
    pub typ: Option<String>,
    pub gfi_attributes: Option<GfiAttributes>,
    pub gfi_theme: Option<serde_json::Value>,
    /// Hit tolerance in pixels.
    pub hit_tolerance: f64,
    /// Layer opacity in `0..=1`.
    pub opacity: f32,
    pub is_point_layer: bool,
}

impl LayerOptions {
    /// Reads the options from the effective layer attributes.
    pub fn from_attributes(attributes: &LayerDescriptor, is_point_layer: bool) -> Self {
        Self {
            id: attributes.id.clone(),
            name: attributes.name.clone(),
            typ: attributes.typ.clone(),
            gfi_attributes: attributes.gfi_attributes.clone(),
            gfi_theme: attributes.gfi_theme.clone(),
            hit_tolerance: attributes.hit_tolerance(),
            opacity: attributes.effective_opacity().unwrap_or(1.0) as f32,
            is_point_layer,
        }
    }
}

/// A buffer currently owned on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadedBuffer {
    pub id: BufferId,
    /// Number of records in the buffer.
    pub count: usize,
}

/// Owns the GPU buffer a layer is drawn from.
///
/// Feature data lives in the source and survives [`RenderedLayer::dispose`];
/// only the GPU side is released. A disposed instance is never revived, the
/// controller builds a new one.
pub struct RenderedLayer {
    options: LayerOptions,
    renderer: Box<dyn LayerRenderer>,
    device: Arc<dyn GraphicsDevice>,
    buffer: Option<UploadedBuffer>,
    uploaded_revision: Option<u64>,
    disposed: bool,
}

impl RenderedLayer {
    pub fn new(
        options: LayerOptions,
        renderer: Box<dyn LayerRenderer>,
        device: Arc<dyn GraphicsDevice>,
    ) -> Self {
        log::info!(
            "Building {} renderer '{}' for layer '{}'.",
            renderer.mode(),
            renderer.strategy_name(),
            options.id
        );
        Self {
            options,
            renderer,
            device,
            buffer: None,
            uploaded_revision: None,
            disposed: false,
        }
    }

    pub fn options(&self) -> &LayerOptions {
        &self.options
    }

    /// The renderer mode the object was built with.
    pub fn mode(&self) -> RendererMode {
        self.renderer.mode()
    }

    /// Name of the packing strategy the buffer is built with.
    pub fn strategy_name(&self) -> &'static str {
        self.renderer.strategy_name()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The buffer currently on the device, if any.
    pub fn buffer(&self) -> Option<UploadedBuffer> {
        self.buffer
    }

    /// Uploads the features of `source` when its revision changed since the
    /// last upload. Returns whether an upload happened.
    pub fn prepare(&mut self, source: &VectorSource) -> Result<bool, ResourceError> {
        if self.disposed {
            return Err(ResourceError::Disposed);
        }
        if self.uploaded_revision == Some(source.revision()) {
            return Ok(false);
        }

        self.release_buffer()?;
        let packed = self.renderer.pack(source.features());
        if !packed.is_empty() {
            let label = format!("{} {} buffer", self.options.id, self.renderer.mode());
            let descriptor = BufferDescriptor {
                label: Some(label.into()),
                usage: packed.usage,
                stride: packed.stride,
            };
            let id = self.device.create_buffer_with_data(&descriptor, &packed.bytes)?;
            self.buffer = Some(UploadedBuffer {
                id,
                count: packed.count,
            });
        }
        self.uploaded_revision = Some(source.revision());
        log::trace!(
            "Uploaded {} records for layer '{}'.",
            packed.count,
            self.options.id
        );
        Ok(true)
    }

    fn release_buffer(&mut self) -> Result<(), ResourceError> {
        match self.buffer.take() {
            Some(buffer) => self.device.destroy_buffer(buffer.id),
            None => Ok(()),
        }
    }

    /// Releases the GPU resources. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Err(e) = self.release_buffer() {
            log::warn!("Failed to release buffer of layer '{}': {e}", self.options.id);
        }
        self.uploaded_revision = None;
        self.disposed = true;
        log::info!("Disposed GPU resources of layer '{}'.", self.options.id);
    }
}

impl Drop for RenderedLayer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for RenderedLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedLayer")
            .field("options", &self.options)
            .field("mode", &self.renderer.mode())
            .field("buffer", &self.buffer)
            .field("disposed", &self.disposed)
            .finish()
    }
}
