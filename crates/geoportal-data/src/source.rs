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

//! The mutable feature container backing a rendered layer.

use geoportal_core::feature::SharedFeature;

/// An ordered, in-memory collection of features.
///
/// Every mutation bumps the revision so consumers (GPU upload) can tell
/// whether their copy is stale.
#[derive(Debug, Clone, Default)]
pub struct VectorSource {
    features: Vec<SharedFeature>,
    revision: u64,
}

impl VectorSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding `features`.
    pub fn with_features(features: Vec<SharedFeature>) -> Self {
        Self {
            features,
            revision: 0,
        }
    }

    /// The features currently in the source, in insertion order.
    pub fn features(&self) -> &[SharedFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Removes every feature.
    pub fn clear(&mut self) {
        log::trace!("Clearing source with {} features.", self.features.len());
        self.features.clear();
        self.revision += 1;
    }

    /// Appends features in iteration order.
    pub fn add_features<I>(&mut self, features: I)
    where
        I: IntoIterator<Item = SharedFeature>,
    {
        self.features.extend(features);
        self.revision += 1;
    }

    /// Appends one feature and bumps the revision.
    pub fn add_feature(&mut self, feature: SharedFeature) {
        self.add_features(std::iter::once(feature));
    }

    /// The first feature with the given id.
    pub fn feature_by_id(&self, id: &str) -> Option<&SharedFeature> {
        self.features.iter().find(|feature| feature.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoportal_core::feature::Feature;
    use std::sync::Arc;

    fn feature(id: &str) -> SharedFeature {
        Arc::new(Feature::default().with_id(id))
    }

    #[test]
    fn test_add_and_clear_bump_revision() {
        let mut source = VectorSource::new();
        assert_eq!(source.revision(), 0);

        source.add_features(vec![feature("a"), feature("b")]);
        assert_eq!(source.len(), 2);
        assert_eq!(source.revision(), 1);

        source.clear();
        assert!(source.is_empty());
        assert_eq!(source.revision(), 2);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut source = VectorSource::with_features(vec![feature("b")]);
        source.add_feature(feature("a"));
        let ids: Vec<_> = source.features().iter().filter_map(|f| f.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_feature_by_id() {
        let source = VectorSource::with_features(vec![feature("a"), feature("b")]);
        assert!(source.feature_by_id("b").is_some());
        assert!(source.feature_by_id("c").is_none());
    }
}
