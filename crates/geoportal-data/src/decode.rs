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

//! GeoJSON documents to features.

use crate::error::DecodeError;
use geojson::GeoJson;
use geoportal_core::feature::Feature;

/// Decodes a GeoJSON document into features.
///
/// A `FeatureCollection` yields its features in document order, a single
/// `Feature` yields itself and a bare geometry becomes one feature without
/// properties.
pub fn decode_features(text: &str) -> Result<Vec<Feature>, DecodeError> {
    let document: GeoJson = text.parse()?;
    let features = match document {
        GeoJson::FeatureCollection(collection) => {
            collection.features.into_iter().map(Feature::from).collect()
        }
        GeoJson::Feature(feature) => vec![Feature::from(feature)],
        GeoJson::Geometry(geometry) => vec![Feature::new(Some(geometry))],
    };
    Ok(features)
}

/// Converts inline descriptor features.
pub fn features_from_geojson(features: &[geojson::Feature]) -> Vec<Feature> {
    features.iter().cloned().map(Feature::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoportal_core::geometry::GeometryType;

    #[test]
    fn test_decode_feature_collection() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "a", "geometry": {"type": "Point", "coordinates": [1, 2]}, "properties": {"n": "1"}},
                {"type": "Feature", "geometry": null, "properties": null}
            ]
        }"#;

        let features = decode_features(text).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id(), Some("a"));
        assert_eq!(features[0].geometry_type(), Some(GeometryType::Point));
        assert!(features[1].geometry().is_none());
        assert!(features[1].properties().is_empty());
    }

    #[test]
    fn test_decode_bare_geometry() {
        let features =
            decode_features(r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].geometry_type(), Some(GeometryType::LineString));
        assert!(features[0].id().is_none());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_features("{\"type\": \"Nope\"}"),
            Err(DecodeError::GeoJson(_))
        ));
    }
}
