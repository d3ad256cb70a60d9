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

//! Style rules and the style-model contracts used to bind them to features.

use crate::color::RgbaColor;
use crate::feature::{Feature, Properties};
use crate::legend::LegendEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// The paint parameters of a style rule, as written in `style.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VectorStyle {
    /// Fill color of polygons.
    pub polygon_fill_color: Option<RgbaColor>,
    /// Outline color of polygons and color of line strings.
    pub polygon_stroke_color: Option<RgbaColor>,
    /// Outline width of polygons and width of line strings.
    pub polygon_stroke_width: Option<f64>,
    /// Fill color of point symbols.
    pub circle_fill_color: Option<RgbaColor>,
    /// Radius of point symbols.
    pub circle_radius: Option<f64>,
    /// Label shown for this rule in the legend.
    pub legend_value: Option<String>,
}

/// Property conditions a feature must satisfy for a rule to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConditions {
    /// Expected property values. A two-element numeric array is read as an
    /// inclusive `[min, max]` range.
    pub properties: Properties,
}

impl StyleConditions {
    /// Whether every listed property of `feature` satisfies its condition.
    pub fn matches(&self, feature: &Feature) -> bool {
        self.properties.iter().all(|(key, expected)| {
            feature
                .get(key)
                .is_some_and(|actual| value_satisfies(actual, expected))
        })
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A two-number array is an inclusive range; anything else compares equal.
fn value_satisfies(actual: &Value, expected: &Value) -> bool {
    match expected {
        Value::Array(range) if range.len() == 2 && range.iter().all(Value::is_number) => {
            match (as_number(actual), as_number(&range[0]), as_number(&range[1])) {
                (Some(v), Some(min), Some(max)) => v >= min && v <= max,
                _ => false,
            }
        }
        // Loaded data is still stringly typed when rules are bound.
        Value::String(s) => match actual {
            Value::String(a) => a == s,
            other => other.to_string() == *s,
        },
        Value::Number(_) => match (as_number(actual), as_number(expected)) {
            (Some(a), Some(e)) => a == e,
            _ => false,
        },
        other => actual == other,
    }
}

/// A styling directive: optional conditions plus the paint to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleRule {
    /// Conditions restricting the rule. `None` matches every feature.
    pub conditions: Option<StyleConditions>,
    /// The paint parameters.
    pub style: VectorStyle,
}

impl StyleRule {
    /// A rule without conditions.
    pub fn unconditional(style: VectorStyle) -> Self {
        Self {
            conditions: None,
            style,
        }
    }

    /// Whether the rule applies to `feature`.
    pub fn matches(&self, feature: &Feature) -> bool {
        self.conditions
            .as_ref()
            .map_or(true, |conditions| conditions.matches(feature))
    }
}

/// Parameters of a geometry-type introspection request against a WFS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryTypeRequest {
    /// Service URL.
    pub url: String,
    /// WFS version.
    pub version: Option<String>,
    /// Feature type name.
    pub feature_type: Option<String>,
    /// Geometry type configured on the style, if any.
    pub style_geometry_type: Option<String>,
    /// Whether the request goes through the portal proxy. Ignored for
    /// secured services.
    pub use_proxy: bool,
}

/// A style model: an ordered list of rules plus legend information.
pub trait StyleModel: Send + Sync {
    /// The id under which the model is registered.
    fn id(&self) -> &str;

    /// All rules that apply to `feature`, in rule order.
    fn rules_for_feature(&self, feature: &Feature) -> Vec<Arc<StyleRule>>;

    /// The first rule that applies to `feature`.
    ///
    /// Implementations with ordered rule lists should override this to stop
    /// at the first match.
    fn first_matching_rule(&self, feature: &Feature) -> Option<Arc<StyleRule>> {
        self.rules_for_feature(feature).into_iter().next()
    }

    /// Legend entries derived from the rules.
    fn legend_infos(&self) -> Vec<LegendEntry>;

    /// Asks an unsecured WFS for the geometry type the legend should show.
    fn geometry_type_from_wfs(&self, request: &GeometryTypeRequest);

    /// Asks a secured WFS (credentials included) for the geometry type.
    fn geometry_type_from_secured_wfs(&self, request: &GeometryTypeRequest);
}

/// Looks style models up by style id.
pub trait StyleRegistry: Send + Sync {
    /// Returns the style model registered under `style_id`.
    fn style_model(&self, style_id: &str) -> Option<Arc<dyn StyleModel>>;
}

/// Layer-level symbol style of the point renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PointSymbol {
    /// Shape of the symbol (`circle`, `square`, ...).
    pub symbol_type: String,
    /// Symbol size in pixels.
    pub size: f64,
    /// Symbol color.
    pub color: RgbaColor,
    /// Whether the symbol rotates with the map view.
    pub rotate_with_view: bool,
    /// Pixel offset of the symbol.
    pub offset: [f64; 2],
    /// Symbol opacity.
    pub opacity: f64,
}

impl Default for PointSymbol {
    fn default() -> Self {
        Self {
            symbol_type: "circle".to_string(),
            size: 20.0,
            color: crate::color::DEFAULT_FEATURE_COLOR,
            rotate_with_view: false,
            offset: [0.0, 0.0],
            opacity: 0.6,
        }
    }
}

/// The `style` block of a point-layer descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLayerStyle {
    /// The symbol description.
    pub symbol: PointSymbol,
}
