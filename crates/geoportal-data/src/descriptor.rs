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

//! Raw layer descriptors as they appear in the portal's service and layer
//! configuration.

use geoportal_core::geometry::{BoundingRegion, GeometryError};
use geoportal_core::legend::LegendEntry;
use geoportal_core::loader::{LoadingStrategy, SourceFormat};
use geoportal_core::style::PointLayerStyle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Hit tolerance in pixels when none is configured.
pub const DEFAULT_HIT_TOLERANCE: f64 = 10.0;

/// Value types left as strings during property coercion when nothing else is
/// configured.
pub const DEFAULT_EXCLUDED_TYPES: &[&str] = &["boolean"];

/// The legend configuration of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegendConfig {
    /// `true` derives the legend from the style model.
    Flag(bool),
    /// An explicit list of entries.
    Entries(Vec<LegendEntry>),
    /// A single graphic.
    Single(String),
}

/// The feature info configuration of a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GfiAttributes {
    /// `"showAll"`, `"ignore"` or another keyword.
    Keyword(String),
    /// Property name to display label.
    Mapping(Map<String, Value>),
}

impl GfiAttributes {
    /// Whether feature info is switched off for the layer.
    pub fn is_ignore(&self) -> bool {
        matches!(self, GfiAttributes::Keyword(keyword) if keyword == "ignore")
    }
}

/// Where the features of a source come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Remote WFS.
    Wfs,
    /// GeoJSON, remote or inline.
    GeoJson,
    /// Anything else: an in-memory source over the inline features.
    Inline,
}

impl SourceKind {
    /// The wire format of a remote source.
    pub fn format(self) -> Option<SourceFormat> {
        match self {
            SourceKind::Wfs => Some(SourceFormat::Wfs),
            SourceKind::GeoJson => Some(SourceFormat::GeoJson),
            SourceKind::Inline => None,
        }
    }
}

/// A layer as configured in the portal.
///
/// Every field is optional so that a descriptor can be layered over the
/// source layer it references (see [`LayerDescriptor::merge_over`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerDescriptor {
    /// Unique layer id.
    pub id: String,
    /// Display name in the layer tree.
    pub name: Option<String>,
    /// Layer type tag. On a source layer this picks WFS, GeoJSON or inline data.
    pub typ: Option<String>,
    /// Id of the raw layer the data comes from.
    pub source_id: Option<String>,
    /// Inline GeoJSON features, used when the source is neither WFS nor GeoJSON.
    pub features: Option<Vec<geojson::Feature>>,
    /// Key into the style registry.
    pub style_id: Option<String>,
    /// Point symbol settings.
    pub style: Option<PointLayerStyle>,
    pub is_selected: Option<bool>,
    pub is_child_layer: Option<bool>,
    /// Region a feature's center must fall in to be kept.
    pub bbox_geometry: Option<geojson::Geometry>,
    pub hit_tolerance: Option<f64>,
    /// Transparency in percent. Wins over `opacity` when positive.
    pub transparency: Option<f64>,
    pub opacity: Option<f64>,
    pub legend: Option<LegendConfig>,
    /// Legacy legend switch: empty or `"ignore"`.
    #[serde(rename = "legendURL")]
    pub legend_url: Option<String>,
    /// Value types (`"number"`, `"boolean"`) coercion leaves as strings.
    pub exclude_types_from_parsing: Option<Vec<String>>,
    pub loading_strategy: Option<String>,
    /// Which properties feature info shows, or `"ignore"` to disable hits.
    pub gfi_attributes: Option<GfiAttributes>,
    pub gfi_theme: Option<Value>,
    /// Forces the renderer mode instead of inferring it from the data.
    pub is_point_layer: Option<bool>,
    /// Service or file URL of a remote source.
    pub url: Option<String>,
    pub version: Option<String>,
    pub feature_type: Option<String>,
    #[serde(rename = "featureNS")]
    pub feature_ns: Option<String>,
    pub is_secured: Option<bool>,
    pub use_proxy: Option<bool>,
    /// Geometry type requested for the legend of secured WFS layers.
    pub style_geometry_type: Option<String>,
    pub wfs_filter: Option<String>,
    /// Set once the data was refreshed by `update_source`.
    pub source_updated: Option<bool>,
}

macro_rules! prefer {
    ($top:expr, $base:expr; $($field:ident),* $(,)?) => {
        LayerDescriptor {
            id: if $top.id.is_empty() { $base.id.clone() } else { $top.id.clone() },
            $($field: $top.$field.clone().or_else(|| $base.$field.clone()),)*
        }
    };
}

impl LayerDescriptor {
    /// Creates an empty descriptor with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns a descriptor where every field set on `self` wins over the
    /// one of `base`.
    pub fn merge_over(&self, base: &LayerDescriptor) -> LayerDescriptor {
        prefer!(self, base;
            name, typ, source_id, features, style_id, style, is_selected,
            is_child_layer, bbox_geometry, hit_tolerance, transparency, opacity,
            legend, legend_url, exclude_types_from_parsing, loading_strategy,
            gfi_attributes, gfi_theme, is_point_layer, url, version,
            feature_type, feature_ns, is_secured, use_proxy,
            style_geometry_type, wfs_filter, source_updated,
        )
    }

    /// How the source of this descriptor is built, read from its type tag.
    pub fn source_kind(&self) -> SourceKind {
        match self.typ.as_deref() {
            Some("WFS") => SourceKind::Wfs,
            Some("GeoJSON") => SourceKind::GeoJson,
            _ => SourceKind::Inline,
        }
    }

    /// Whether the layer is switched on in the layer tree. Off when unset.
    pub fn is_selected(&self) -> bool {
        self.is_selected.unwrap_or(false)
    }

    /// Whether the layer belongs to a group. Child layers start hidden.
    pub fn is_child_layer(&self) -> bool {
        self.is_child_layer.unwrap_or(false)
    }

    /// Whether requests need credentials. Affects the legend geometry lookup.
    pub fn is_secured(&self) -> bool {
        self.is_secured.unwrap_or(false)
    }

    /// Whether service URLs go through the portal proxy.
    pub fn use_proxy(&self) -> bool {
        self.use_proxy.unwrap_or(false)
    }

    /// Whether the data was already refreshed once by `update_source`.
    pub fn source_updated(&self) -> bool {
        self.source_updated.unwrap_or(false)
    }

    /// Hit tolerance in pixels, 10 when unset.
    pub fn hit_tolerance(&self) -> f64 {
        self.hit_tolerance.unwrap_or(DEFAULT_HIT_TOLERANCE)
    }

    /// The symbol style of point layers, falling back to the default circle.
    pub fn point_style(&self) -> PointLayerStyle {
        self.style.clone().unwrap_or_default()
    }

    /// Layer opacity. A positive transparency (percent) takes precedence over
    /// the opacity field.
    pub fn effective_opacity(&self) -> Option<f64> {
        match self.transparency {
            Some(transparency) if transparency > 0.0 => Some((100.0 - transparency) / 100.0),
            _ => self.opacity,
        }
    }

    /// Value types that property coercion must leave untouched.
    pub fn excluded_types(&self) -> Vec<String> {
        match &self.exclude_types_from_parsing {
            Some(types) => types.clone(),
            None => DEFAULT_EXCLUDED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// How remote data is requested. Anything but `all` loads by extent.
    pub fn loading_strategy(&self) -> LoadingStrategy {
        LoadingStrategy::from_config(self.loading_strategy.as_deref())
    }

    /// Names of the properties a WFS should return: the keys of a
    /// `gfiAttributes` mapping. Keywords select all properties.
    pub fn property_names(&self) -> Vec<String> {
        match &self.gfi_attributes {
            Some(GfiAttributes::Mapping(mapping)) => mapping.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `gfiAttributes` is the `ignore` keyword, which disables hit
    /// detection.
    pub fn gfi_ignored(&self) -> bool {
        self.gfi_attributes
            .as_ref()
            .is_some_and(GfiAttributes::is_ignore)
    }

    /// The configured bounding region, if any.
    pub fn bounding_region(&self) -> Result<Option<BoundingRegion>, GeometryError> {
        self.bbox_geometry
            .as_ref()
            .map(|geometry| BoundingRegion::from_geojson(&geometry.value))
            .transpose()
    }
}
