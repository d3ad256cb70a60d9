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

//! The collaborators a layer is constructed with.

use async_trait::async_trait;
use geoportal_core::feature::Feature;
use geoportal_core::loader::{FeatureLoader, LoadError, LoadRequest};
use geoportal_core::renderer::GraphicsDevice;
use geoportal_core::services::{FeatureNotifier, LoaderOverlay, NoopNotifier, NoopOverlay};
use geoportal_core::style::StyleRegistry;
use geoportal_data::{InMemoryLayerRegistry, InMemoryStyleRegistry, RawLayerRegistry};
use std::fmt;
use std::sync::Arc;

/// A loader for layers that never fetch anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLoader;

#[async_trait]
impl FeatureLoader for NoLoader {
    async fn load(&self, request: &LoadRequest) -> Result<Vec<Feature>, LoadError> {
        Err(LoadError::Unsupported(request.format))
    }
}

/// Registries, UI hooks, loader and GPU device injected into a layer.
#[derive(Clone)]
pub struct LayerServices {
    /// Style models looked up by `styleId`.
    pub styles: Arc<dyn StyleRegistry>,
    /// Raw layers looked up by `sourceId`.
    pub layers: Arc<dyn RawLayerRegistry>,
    /// Loading indicator shown while remote data arrives.
    pub overlay: Arc<dyn LoaderOverlay>,
    pub notifier: Arc<dyn FeatureNotifier>,
    pub loader: Arc<dyn FeatureLoader>,
    /// Device the layer's buffers are created on.
    pub device: Arc<dyn GraphicsDevice>,
}

impl LayerServices {
    /// Services around `device` with empty registries and no-op hooks.
    pub fn new(device: Arc<dyn GraphicsDevice>) -> Self {
        Self {
            styles: Arc::new(InMemoryStyleRegistry::new()),
            layers: Arc::new(InMemoryLayerRegistry::new()),
            overlay: Arc::new(NoopOverlay),
            notifier: Arc::new(NoopNotifier),
            loader: Arc::new(NoLoader),
            device,
        }
    }

    pub fn with_styles(mut self, styles: Arc<dyn StyleRegistry>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_layers(mut self, layers: Arc<dyn RawLayerRegistry>) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_overlay(mut self, overlay: Arc<dyn LoaderOverlay>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn FeatureNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn FeatureLoader>) -> Self {
        self.loader = loader;
        self
    }
}

impl fmt::Debug for LayerServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerServices").finish_non_exhaustive()
    }
}
