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

//! Defines the `Feature`, the unit of vector data flowing through a layer.

use crate::geometry::{Extent, GeometryType};
use crate::style::StyleRule;
use geojson::feature::Id;
use serde_json::Value;
use std::sync::Arc;

/// The string-keyed property mapping of a feature.
pub type Properties = serde_json::Map<String, Value>;

/// A feature shared between a source and the retained feature list of a
/// layer. Features are only mutated before they become shared.
pub type SharedFeature = Arc<Feature>;

/// A single vector feature: geometry, properties, identity and the style
/// rule bound to it after loading.
///
/// The bound style rule lives in its own field so it never shows up among
/// the properties that info tools display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    id: Option<String>,
    geometry: Option<geojson::Geometry>,
    properties: Properties,
    style_rule: Option<Arc<StyleRule>>,
}

impl Feature {
    /// Creates a feature without id and properties.
    pub fn new(geometry: Option<geojson::Geometry>) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Creates a feature from a bare geometry value.
    pub fn from_value(value: geojson::Value) -> Self {
        Self::new(Some(geojson::Geometry::new(value)))
    }

    /// Builder-style id assignment.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder-style property assignment.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The feature id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Sets the feature id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// The geometry, if the feature has one.
    pub fn geometry(&self) -> Option<&geojson::Geometry> {
        self.geometry.as_ref()
    }

    /// Mutable access to the geometry.
    pub fn geometry_mut(&mut self) -> Option<&mut geojson::Geometry> {
        self.geometry.as_mut()
    }

    /// The geometry type tag.
    pub fn geometry_type(&self) -> Option<GeometryType> {
        self.geometry.as_ref().map(|g| GeometryType::of(&g.value))
    }

    /// The extent of the geometry.
    pub fn extent(&self) -> Option<Extent> {
        self.geometry.as_ref().and_then(|g| Extent::of(&g.value))
    }

    /// All properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Mutable access to all properties.
    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// A single property value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Sets a single property value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// The style rule bound after loading, if any.
    pub fn style_rule(&self) -> Option<&Arc<StyleRule>> {
        self.style_rule.as_ref()
    }

    /// Binds (or clears) the style rule.
    pub fn bind_style_rule(&mut self, rule: Option<Arc<StyleRule>>) {
        self.style_rule = rule;
    }
}

impl From<geojson::Feature> for Feature {
    fn from(feature: geojson::Feature) -> Self {
        let id = feature.id.map(|id| match id {
            Id::String(s) => s,
            Id::Number(n) => n.to_string(),
        });
        Self {
            id,
            geometry: feature.geometry,
            properties: feature.properties.unwrap_or_default(),
            style_rule: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_geojson_feature_maps_numeric_id() {
        let raw: geojson::Feature = serde_json::from_value(json!({
            "type": "Feature",
            "id": 7,
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
            "properties": {"name": "Harbour"}
        }))
        .unwrap();

        let feature = Feature::from(raw);
        assert_eq!(feature.id(), Some("7"));
        assert_eq!(feature.geometry_type(), Some(GeometryType::Point));
        assert_eq!(feature.get("name"), Some(&json!("Harbour")));
        assert!(feature.style_rule().is_none());
    }

    #[test]
    fn test_feature_without_geometry_has_no_extent() {
        let feature = Feature::default().with_id("a");
        assert!(feature.extent().is_none());
        assert!(feature.geometry_type().is_none());
    }

    #[test]
    fn test_style_rule_is_not_a_property() {
        let mut feature = Feature::default().with_property("kind", "school");
        feature.bind_style_rule(Some(Arc::new(StyleRule::default())));
        assert!(feature.style_rule().is_some());
        assert_eq!(feature.properties().len(), 1);
    }
}
