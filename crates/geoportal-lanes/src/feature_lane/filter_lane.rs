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

//! Selects the loaded features that are eligible for display.

use geoportal_core::feature::Feature;
use geoportal_core::geometry::{BoundingRegion, GeometryError};
use geoportal_core::lane::{Lane, LaneKind};
use geoportal_data::LayerDescriptor;

/// Drops features without geometry and, when a bounding region is
/// configured, features whose extent center lies outside of it.
///
/// Order is preserved and nothing is added.
#[derive(Debug, Clone, Default)]
pub struct FeatureFilterLane {
    region: Option<BoundingRegion>,
}

impl FeatureFilterLane {
    pub fn new(region: Option<BoundingRegion>) -> Self {
        Self { region }
    }

    /// Builds the filter from the `bboxGeometry` of a descriptor.
    pub fn for_layer(descriptor: &LayerDescriptor) -> Result<Self, GeometryError> {
        Ok(Self::new(descriptor.bounding_region()?))
    }

    /// The region feature centers are tested against, if any.
    pub fn region(&self) -> Option<&BoundingRegion> {
        self.region.as_ref()
    }

    /// Whether a single feature passes the filter.
    pub fn accepts(&self, feature: &Feature) -> bool {
        if feature.geometry().is_none() {
            return false;
        }
        match &self.region {
            None => true,
            Some(region) => feature
                .extent()
                .is_some_and(|extent| region.intersects_coordinate(extent.center())),
        }
    }

    /// Filters a batch of loaded features.
    pub fn run(&self, features: Vec<Feature>) -> Vec<Feature> {
        let loaded = features.len();
        let kept: Vec<Feature> = features.into_iter().filter(|f| self.accepts(f)).collect();
        log::debug!("Feature filter kept {} of {loaded} features.", kept.len());
        kept
    }
}

impl Lane for FeatureFilterLane {
    fn strategy_name(&self) -> &'static str {
        "GeometryAndRegionFilter"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoportal_core::geometry::Extent;
    use geojson::Value;

    fn square(min: f64, max: f64) -> Feature {
        Feature::from_value(Value::Polygon(vec![vec![
            vec![min, min],
            vec![max, min],
            vec![max, max],
            vec![min, max],
            vec![min, min],
        ]]))
    }

    #[test]
    fn test_drops_features_without_geometry() {
        let lane = FeatureFilterLane::default();
        let features = vec![
            Feature::default().with_id("empty"),
            Feature::from_value(Value::Point(vec![1.0, 2.0])).with_id("point"),
        ];

        let kept = lane.run(features);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id(), Some("point"));
    }

    #[test]
    fn test_is_identity_without_region() {
        let lane = FeatureFilterLane::default();
        let features = vec![square(0.0, 1.0).with_id("a"), square(5.0, 6.0).with_id("b")];
        let kept = lane.run(features.clone());
        assert_eq!(kept, features);
    }

    #[test]
    fn test_region_keeps_features_centered_inside() {
        let region = BoundingRegion::from_extent(Extent::new(0.0, 0.0, 1.0, 1.0));
        let lane = FeatureFilterLane::new(Some(region));

        let kept = lane.run(vec![
            square(0.0, 1.0).with_id("inside"),
            square(1.0, 2.0).with_id("outside"),
        ]);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id(), Some("inside"));
    }

    #[test]
    fn test_region_boundary_is_inclusive() {
        let region = BoundingRegion::from_extent(Extent::new(0.0, 0.0, 1.0, 1.0));
        let lane = FeatureFilterLane::new(Some(region));
        assert!(lane.accepts(&Feature::from_value(Value::Point(vec![1.0, 1.0]))));
        assert!(!lane.accepts(&Feature::from_value(Value::Point(vec![1.0, 1.1]))));
    }

    #[test]
    fn test_for_layer_reads_bbox_geometry() {
        let descriptor: LayerDescriptor = serde_json::from_value(serde_json::json!({
            "id": "a",
            "bboxGeometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
            }
        }))
        .unwrap();
        let lane = FeatureFilterLane::for_layer(&descriptor).unwrap();
        assert!(lane.region().is_some());
    }
}
