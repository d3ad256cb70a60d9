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

//! Owns the feature source of a layer and describes how it is loaded.

use geoportal_core::feature::{Feature, SharedFeature};
use geoportal_core::loader::LoadRequest;
use geoportal_data::decode::features_from_geojson;
use geoportal_data::{LayerDescriptor, SourceKind, VectorSource};
use geoportal_lanes::FeatureFilterLane;

/// The source of one layer plus the knowledge needed to (re)load it.
#[derive(Debug, Clone)]
pub struct SourceManager {
    kind: SourceKind,
    source: VectorSource,
    request: Option<LoadRequest>,
    inline: Vec<Feature>,
    filter: FeatureFilterLane,
}

impl SourceManager {
    /// Creates the source for `source_layer`.
    ///
    /// WFS layers and GeoJSON layers with a URL get a load request built
    /// from the source layer and the layer `attributes`. Inline features
    /// are kept for ingestion; the source itself starts empty.
    pub fn create_source(
        source_layer: &LayerDescriptor,
        attributes: &LayerDescriptor,
        filter: FeatureFilterLane,
    ) -> Self {
        let kind = source_layer.source_kind();
        let request = match (kind.format(), &source_layer.url) {
            (Some(format), Some(url)) => {
                let mut request = LoadRequest::new(attributes.id.clone(), format);
                request.url = Some(url.clone());
                request.strategy = attributes.loading_strategy();
                if kind == SourceKind::Wfs {
                    request.version = source_layer.version.clone();
                    request.feature_type = source_layer.feature_type.clone();
                    request.feature_ns = source_layer.feature_ns.clone();
                    request.property_names = source_layer.property_names();
                    request.include_credentials = source_layer.is_secured();
                    request.wfs_filter = source_layer.wfs_filter.clone();
                    request.bbox = filter.region().map(|region| region.extent().to_string());
                }
                Some(request)
            }
            _ => None,
        };
        let inline = source_layer
            .features
            .as_deref()
            .map(features_from_geojson)
            .unwrap_or_default();

        log::debug!(
            "Created {kind:?} source for layer '{}' ({} inline features, remote: {}).",
            attributes.id,
            inline.len(),
            request.is_some()
        );

        Self {
            kind,
            source: VectorSource::new(),
            request,
            inline,
            filter,
        }
    }

    /// Where the data comes from, decided from the source layer's type.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// The features currently visible.
    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    /// The request a loader fetches this source with, if it is remote.
    pub fn request(&self) -> Option<&LoadRequest> {
        self.request.as_ref()
    }

    /// The features configured inline on the descriptor, unfiltered.
    pub fn inline_features(&self) -> &[Feature] {
        &self.inline
    }

    pub fn filter(&self) -> &FeatureFilterLane {
        &self.filter
    }

    /// Load-start hook. WFS sources drop what they hold so reloads do not
    /// accumulate duplicates.
    pub fn begin_load(&mut self) {
        if self.kind == SourceKind::Wfs {
            self.clear();
        }
    }

    /// Empties the source.
    pub fn clear(&mut self) {
        self.source.clear();
    }

    /// Adds a subset of features.
    pub fn add_features<I>(&mut self, features: I)
    where
        I: IntoIterator<Item = SharedFeature>,
    {
        self.source.add_features(features);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoportal_core::loader::{LoadingStrategy, SourceFormat};
    use serde_json::json;
    use std::sync::Arc;

    fn descriptor(value: serde_json::Value) -> LayerDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_wfs_request_is_built_from_source_layer() {
        let source_layer = descriptor(json!({
            "id": "1711",
            "typ": "WFS",
            "url": "https://example.org/wfs",
            "version": "2.0.0",
            "featureType": "hospitals",
            "featureNS": "http://example.org/app",
            "isSecured": true,
            "wfsFilter": "<Filter/>",
            "gfiAttributes": {"name": "Name"}
        }));
        let attributes = descriptor(json!({
            "id": "layer",
            "loadingStrategy": "all",
            "bboxGeometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [2, 0], [2, 1], [0, 1], [0, 0]]]
            }
        }));
        let filter = FeatureFilterLane::for_layer(&attributes).unwrap();

        let manager = SourceManager::create_source(&source_layer, &attributes, filter);
        let request = manager.request().unwrap();

        assert_eq!(request.layer_id, "layer");
        assert_eq!(request.format, SourceFormat::Wfs);
        assert_eq!(request.feature_type.as_deref(), Some("hospitals"));
        assert_eq!(request.property_names, vec!["name".to_string()]);
        assert!(request.include_credentials);
        assert_eq!(request.wfs_filter.as_deref(), Some("<Filter/>"));
        assert_eq!(request.bbox.as_deref(), Some("0,0,2,1"));
        assert_eq!(request.strategy, LoadingStrategy::All);
    }

    #[test]
    fn test_inline_source_has_no_request() {
        let source_layer = descriptor(json!({
            "id": "a",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {}}
            ]
        }));
        let manager =
            SourceManager::create_source(&source_layer, &source_layer, FeatureFilterLane::default());

        assert_eq!(manager.kind(), SourceKind::Inline);
        assert!(manager.request().is_none());
        assert_eq!(manager.inline_features().len(), 1);
        assert!(manager.source().is_empty());
    }

    #[test]
    fn test_geojson_without_url_is_not_remote() {
        let source_layer = descriptor(json!({"id": "a", "typ": "GeoJSON"}));
        let manager =
            SourceManager::create_source(&source_layer, &source_layer, FeatureFilterLane::default());
        assert_eq!(manager.kind(), SourceKind::GeoJson);
        assert!(manager.request().is_none());
    }

    #[test]
    fn test_only_wfs_clears_on_load_start() {
        let wfs = descriptor(json!({"id": "a", "typ": "WFS", "url": "u"}));
        let geojson = descriptor(json!({"id": "b", "typ": "GeoJSON", "url": "u"}));
        let feature = Arc::new(Feature::default().with_id("x"));

        let mut wfs = SourceManager::create_source(&wfs, &wfs, FeatureFilterLane::default());
        wfs.add_features(vec![Arc::clone(&feature)]);
        wfs.begin_load();
        assert!(wfs.source().is_empty());

        let mut geojson =
            SourceManager::create_source(&geojson, &geojson, FeatureFilterLane::default());
        geojson.add_features(vec![feature]);
        geojson.begin_load();
        assert_eq!(geojson.source().len(), 1);
    }
}
