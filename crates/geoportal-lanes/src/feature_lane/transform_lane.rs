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

//! Normalizes features right after they were loaded.

use geoportal_core::feature::{Feature, SharedFeature};
use geoportal_core::geometry::strip_to_xy;
use geoportal_core::lane::{Lane, LaneKind};
use geoportal_core::style::StyleModel;
use geoportal_data::LayerDescriptor;
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

/// The type tag used in generated feature ids.
pub const LAYER_TYPE_TAG: &str = "webgl";

/// Value types that property coercion leaves as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludedTypes {
    /// Leave numeric strings untouched.
    pub number: bool,
    /// Leave `"true"`/`"false"` untouched.
    pub boolean: bool,
}

impl ExcludedTypes {
    /// Nothing excluded: every parseable string is converted.
    pub const NONE: Self = Self {
        number: false,
        boolean: false,
    };

    /// Reads type names such as `"number"` and `"boolean"`. Unknown names
    /// are ignored.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let has = |wanted: &str| names.iter().any(|name| name.as_ref() == wanted);
        Self {
            number: has("number"),
            boolean: has("boolean"),
        }
    }
}

impl Default for ExcludedTypes {
    fn default() -> Self {
        Self {
            number: false,
            boolean: true,
        }
    }
}

/// Turns a numeric string into a JSON number. Integers stay integers.
///
/// The whole trimmed string must be numeric. A numeric prefix such as
/// `"1.5 m"` or `"12abc"` is not enough, so unit-suffixed values and codes
/// stay strings instead of losing their suffix.
fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(integer) = text.parse::<i64>() {
        return Some(Number::from(integer));
    }
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .and_then(Number::from_f64)
}

fn coerce(value: &str, excluded: ExcludedTypes) -> Option<Value> {
    if !excluded.number {
        if let Some(number) = parse_number(value) {
            return Some(Value::Number(number));
        }
    }
    if !excluded.boolean {
        if value.eq_ignore_ascii_case("true") {
            return Some(Value::Bool(true));
        }
        if value.eq_ignore_ascii_case("false") {
            return Some(Value::Bool(false));
        }
    }
    None
}

/// Applies, in order: dimensionality reduction to X/Y, id assignment, style
/// rule binding and property type coercion.
#[derive(Clone)]
pub struct FeatureTransformLane {
    layer_id: String,
    style_model: Option<Arc<dyn StyleModel>>,
    excluded: ExcludedTypes,
}

impl fmt::Debug for FeatureTransformLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureTransformLane")
            .field("layer_id", &self.layer_id)
            .field("style_model", &self.style_model.as_ref().map(|m| m.id().to_string()))
            .field("excluded", &self.excluded)
            .finish()
    }
}

impl FeatureTransformLane {
    pub fn new(
        layer_id: impl Into<String>,
        style_model: Option<Arc<dyn StyleModel>>,
        excluded: ExcludedTypes,
    ) -> Self {
        Self {
            layer_id: layer_id.into(),
            style_model,
            excluded,
        }
    }

    /// Configures the lane from a layer descriptor.
    pub fn for_layer(descriptor: &LayerDescriptor, style_model: Option<Arc<dyn StyleModel>>) -> Self {
        Self::new(
            descriptor.id.clone(),
            style_model,
            ExcludedTypes::from_names(&descriptor.excluded_types()),
        )
    }

    /// The id given to the feature at `index` when it has none.
    pub fn generated_id(&self, index: usize) -> String {
        format!("{LAYER_TYPE_TAG}-{}-feature-id-{index}", self.layer_id)
    }

    /// Transforms one feature in place. `index` is its position in the
    /// loaded batch.
    pub fn transform(&self, feature: &mut Feature, index: usize) {
        if let Some(geometry) = feature.geometry_mut() {
            if strip_to_xy(&mut geometry.value) > 0 {
                geometry.bbox = None;
            }
        }

        if feature.id().is_none() {
            feature.set_id(self.generated_id(index));
        }

        let rule = self
            .style_model
            .as_ref()
            .and_then(|model| model.first_matching_rule(feature));
        feature.bind_style_rule(rule);

        self.coerce_properties(feature);
    }

    /// Converts string properties holding numbers or booleans.
    pub fn coerce_properties(&self, feature: &mut Feature) {
        for value in feature.properties_mut().values_mut() {
            let coerced = match value {
                Value::String(text) => coerce(text, self.excluded),
                _ => None,
            };
            if let Some(coerced) = coerced {
                *value = coerced;
            }
        }
    }

    /// Transforms a loaded batch and freezes it for sharing.
    pub fn run(&self, features: Vec<Feature>) -> Vec<SharedFeature> {
        let transformed: Vec<SharedFeature> = features
            .into_iter()
            .enumerate()
            .map(|(index, mut feature)| {
                self.transform(&mut feature, index);
                Arc::new(feature)
            })
            .collect();
        log::debug!(
            "Transformed {} features of layer '{}'.",
            transformed.len(),
            self.layer_id
        );
        transformed
    }
}

impl Lane for FeatureTransformLane {
    fn strategy_name(&self) -> &'static str {
        "WebGlFeatureTransform"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoportal_core::legend::LegendEntry;
    use geoportal_core::style::{GeometryTypeRequest, StyleRule, VectorStyle};
    use geojson::Value as Geometry;
    use serde_json::json;

    struct OnlyRule(Arc<StyleRule>);

    impl StyleModel for OnlyRule {
        fn id(&self) -> &str {
            "only"
        }
        fn rules_for_feature(&self, feature: &Feature) -> Vec<Arc<StyleRule>> {
            if self.0.matches(feature) {
                vec![Arc::clone(&self.0)]
            } else {
                Vec::new()
            }
        }
        fn legend_infos(&self) -> Vec<LegendEntry> {
            Vec::new()
        }
        fn geometry_type_from_wfs(&self, _request: &GeometryTypeRequest) {}
        fn geometry_type_from_secured_wfs(&self, _request: &GeometryTypeRequest) {}
    }

    fn fruit() -> Feature {
        Feature::default()
            .with_property("apple", "42")
            .with_property("pear", "true")
            .with_property("pumpkin", "false")
    }

    #[test]
    fn test_strips_height_component() {
        let lane = FeatureTransformLane::new("a", None, ExcludedTypes::default());
        let mut feature = Feature::from_value(Geometry::Polygon(vec![vec![
            vec![0.0, 0.0, 10.0],
            vec![1.0, 0.0, 10.0],
            vec![1.0, 1.0, 10.0],
            vec![0.0, 0.0, 10.0],
        ]]));

        lane.transform(&mut feature, 0);

        match &feature.geometry().unwrap().value {
            Geometry::Polygon(rings) => assert!(rings[0].iter().all(|p| p.len() == 2)),
            other => panic!("geometry type changed: {other:?}"),
        }
    }

    #[test]
    fn test_assigns_positional_ids_only_when_missing() {
        let lane = FeatureTransformLane::new("roads", None, ExcludedTypes::default());
        let features = lane.run(vec![
            Feature::default(),
            Feature::default().with_id("kept"),
            Feature::default(),
        ]);

        assert_eq!(features[0].id(), Some("webgl-roads-feature-id-0"));
        assert_eq!(features[1].id(), Some("kept"));
        assert_eq!(features[2].id(), Some("webgl-roads-feature-id-2"));
    }

    #[test]
    fn test_generated_ids_may_collide_with_explicit_ones() {
        let lane = FeatureTransformLane::new("a", None, ExcludedTypes::default());
        let features = lane.run(vec![
            Feature::default().with_id("webgl-a-feature-id-1"),
            Feature::default(),
        ]);
        assert_eq!(features[0].id(), features[1].id());
    }

    #[test]
    fn test_coerces_with_empty_exclusion_set() {
        let lane = FeatureTransformLane::new("a", None, ExcludedTypes::NONE);
        let mut feature = fruit();
        lane.transform(&mut feature, 0);

        assert_eq!(feature.get("apple"), Some(&json!(42)));
        assert_eq!(feature.get("pear"), Some(&json!(true)));
        assert_eq!(feature.get("pumpkin"), Some(&json!(false)));
    }

    #[test]
    fn test_numeric_prefix_is_not_coerced() {
        let lane = FeatureTransformLane::new("a", None, ExcludedTypes::NONE);
        let mut feature = fruit().with_property("zip", "12abc").with_property("height", "1.5 m");
        lane.transform(&mut feature, 0);

        assert_eq!(feature.get("zip"), Some(&json!("12abc")));
        assert_eq!(feature.get("height"), Some(&json!("1.5 m")));
    }

    #[test]
    fn test_excluded_types_stay_strings() {
        let excluded = ExcludedTypes::from_names(&["number", "boolean"]);
        let lane = FeatureTransformLane::new("a", None, excluded);
        let mut feature = fruit();
        lane.transform(&mut feature, 0);

        assert_eq!(feature.get("apple"), Some(&json!("42")));
        assert_eq!(feature.get("pear"), Some(&json!("true")));
        assert_eq!(feature.get("pumpkin"), Some(&json!("false")));
    }

    #[test]
    fn test_default_exclusion_keeps_booleans() {
        let lane = FeatureTransformLane::new("a", None, ExcludedTypes::default());
        let mut feature = fruit().with_property("ratio", " 0.25 ").with_property("name", "4b");
        lane.transform(&mut feature, 0);

        assert_eq!(feature.get("apple"), Some(&json!(42)));
        assert_eq!(feature.get("ratio"), Some(&json!(0.25)));
        assert_eq!(feature.get("name"), Some(&json!("4b")));
        assert_eq!(feature.get("pear"), Some(&json!("true")));
    }

    #[test]
    fn test_booleans_are_case_insensitive() {
        let lane = FeatureTransformLane::new("a", None, ExcludedTypes::NONE);
        let mut feature = Feature::default().with_property("flag", "TRUE");
        lane.coerce_properties(&mut feature);
        assert_eq!(feature.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn test_binds_first_matching_rule_outside_properties() {
        let rule: StyleRule = serde_json::from_value(json!({
            "conditions": {"properties": {"apple": "42"}},
            "style": {"polygonFillColor": [255, 0, 0, 0.5]}
        }))
        .unwrap();
        let model: Arc<dyn StyleModel> = Arc::new(OnlyRule(Arc::new(rule)));
        let lane = FeatureTransformLane::new("a", Some(model), ExcludedTypes::default());

        let features = lane.run(vec![fruit(), Feature::default()]);

        assert!(features[0].style_rule().is_some());
        assert!(features[1].style_rule().is_none());
        assert_eq!(features[0].properties().len(), 3);
    }

    #[test]
    fn test_unconditional_rule_binds_every_feature() {
        let model: Arc<dyn StyleModel> =
            Arc::new(OnlyRule(Arc::new(StyleRule::unconditional(VectorStyle::default()))));
        let lane = FeatureTransformLane::new("a", Some(model), ExcludedTypes::default());
        let features = lane.run(vec![Feature::default()]);
        assert!(features[0].style_rule().is_some());
    }

    #[test]
    fn test_for_layer_uses_descriptor_exclusions() {
        let mut descriptor = LayerDescriptor::new("a");
        descriptor.exclude_types_from_parsing = Some(vec![]);
        let lane = FeatureTransformLane::for_layer(&descriptor, None);
        let mut feature = fruit();
        lane.transform(&mut feature, 0);
        assert_eq!(feature.get("pear"), Some(&json!(true)));
    }
}
