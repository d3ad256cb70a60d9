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

//! Legend construction, evaluated once when a layer is built.

use geoportal_core::legend::LegendEntry;
use geoportal_core::style::{GeometryTypeRequest, StyleModel};
use geoportal_data::{LayerDescriptor, LegendConfig, SourceKind};

/// Resolves the deprecated `legendURL` into a legend configuration.
fn from_legend_url(url: &str) -> LegendConfig {
    match url {
        "" => LegendConfig::Flag(true),
        "ignore" => LegendConfig::Flag(false),
        other => LegendConfig::Single(other.to_string()),
    }
}

/// Builds the legend of a layer.
///
/// Precedence: an explicit entry list, then `legendURL`, then the legend
/// flag (derived from the style model), then a plain legend string.
pub fn build_legend(
    attributes: &LayerDescriptor,
    source_layer: &LayerDescriptor,
    style_model: Option<&dyn StyleModel>,
) -> Vec<LegendEntry> {
    if let Some(LegendConfig::Entries(entries)) = &attributes.legend {
        return entries.clone();
    }

    let legend_url = attributes
        .legend_url
        .as_deref()
        .or(source_layer.legend_url.as_deref());
    let legend = match legend_url {
        Some(url) => Some(from_legend_url(url)),
        None => attributes.legend.clone(),
    };

    match (legend, style_model) {
        (Some(LegendConfig::Flag(true)), Some(model)) => {
            if source_layer.source_kind() == SourceKind::Wfs {
                request_geometry_type(source_layer, model);
            }
            model.legend_infos()
        }
        (Some(LegendConfig::Single(graphic)), _) => vec![LegendEntry::Graphic(graphic)],
        _ => Vec::new(),
    }
}

fn request_geometry_type(source_layer: &LayerDescriptor, model: &dyn StyleModel) {
    let mut request = GeometryTypeRequest {
        url: source_layer.url.clone().unwrap_or_default(),
        version: source_layer.version.clone(),
        feature_type: source_layer.feature_type.clone(),
        style_geometry_type: source_layer.style_geometry_type.clone(),
        use_proxy: source_layer.use_proxy(),
    };
    if source_layer.is_secured() {
        request.use_proxy = false;
        model.geometry_type_from_secured_wfs(&request);
    } else {
        model.geometry_type_from_wfs(&request);
    }
}
