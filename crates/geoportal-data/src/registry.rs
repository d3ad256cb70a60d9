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

//! The raw layer list: every layer and service the portal knows about.

use crate::descriptor::LayerDescriptor;
use crate::error::DecodeError;

/// Looks up raw layer descriptors by id.
pub trait RawLayerRegistry: Send + Sync {
    /// The descriptor registered under `id`.
    fn layer_where_id(&self, id: &str) -> Option<LayerDescriptor>;
}

/// A layer list held in memory, typically read from `services.json`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLayerRegistry {
    layers: Vec<LayerDescriptor>,
}

impl InMemoryLayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON array of layer descriptors.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let layers: Vec<LayerDescriptor> = serde_json::from_str(text)?;
        log::debug!("Loaded {} raw layers.", layers.len());
        Ok(Self { layers })
    }

    /// Registers a raw layer. Lookups return the first one registered under
    /// an id.
    pub fn insert(&mut self, layer: LayerDescriptor) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl RawLayerRegistry for InMemoryLayerRegistry {
    fn layer_where_id(&self, id: &str) -> Option<LayerDescriptor> {
        self.layers.iter().find(|layer| layer.id == id).cloned()
    }
}
