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

//! Selection, visibility and legend state shared by every layer type.

use geoportal_core::legend::LegendEntry;
use geoportal_data::LayerDescriptor;

/// The lifecycle operations every map layer offers.
pub trait LayerLifecycle {
    /// The layer id.
    fn id(&self) -> &str;

    /// Whether the user selected the layer.
    fn is_selected(&self) -> bool;

    /// Whether the layer is currently drawn on the map.
    fn is_visible_in_map(&self) -> bool;

    /// Selects or deselects the layer.
    fn set_selected(&mut self, selected: bool);

    /// The legend built for the layer.
    fn legend(&self) -> &[LegendEntry];
}

/// Plain layer state without any rendering concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayer {
    id: String,
    name: Option<String>,
    is_selected: bool,
    is_visible_in_map: bool,
    legend: Vec<LegendEntry>,
}

impl BaseLayer {
    /// Creates the layer state. Child layers are not initialized: they stay
    /// invisible until their group selects them.
    pub fn new(attributes: &LayerDescriptor, initialize: bool) -> Self {
        let is_selected = attributes.is_selected();
        Self {
            id: attributes.id.clone(),
            name: attributes.name.clone(),
            is_selected,
            is_visible_in_map: initialize && is_selected,
            legend: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_legend(&mut self, legend: Vec<LegendEntry>) {
        self.legend = legend;
    }
}

impl LayerLifecycle for BaseLayer {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_selected(&self) -> bool {
        self.is_selected
    }

    fn is_visible_in_map(&self) -> bool {
        self.is_visible_in_map
    }

    fn set_selected(&mut self, selected: bool) {
        log::debug!("Layer '{}' selected: {selected}.", self.id);
        self.is_selected = selected;
        self.is_visible_in_map = selected;
    }

    fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }
}
