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

//! The contract between a layer source and whatever fetches its features.
//!
//! Transport (HTTP, credentials, proxies) and wire formats live behind
//! [`FeatureLoader`]; a source only describes *what* it needs through a
//! [`LoadRequest`].

use crate::feature::Feature;
use async_trait::async_trait;
use std::fmt;

/// The wire format a remote source is read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// OGC Web Feature Service.
    Wfs,
    /// GeoJSON document.
    GeoJson,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Wfs => write!(f, "WFS"),
            SourceFormat::GeoJson => write!(f, "GeoJSON"),
        }
    }
}

/// When a remote source loads its features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingStrategy {
    /// Load everything once.
    All,
    /// Load per requested extent (the default).
    #[default]
    Bbox,
}

impl LoadingStrategy {
    /// Reads the configuration value: `"all"` selects [`LoadingStrategy::All`],
    /// anything else the bbox default.
    pub fn from_config(value: Option<&str>) -> Self {
        match value {
            Some("all") => LoadingStrategy::All,
            _ => LoadingStrategy::Bbox,
        }
    }
}

/// Everything a loader needs to fetch the features of one source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Id of the layer that owns the source.
    pub layer_id: String,
    /// Wire format.
    pub format: SourceFormat,
    /// Service or document URL.
    pub url: Option<String>,
    /// Service version (WFS).
    pub version: Option<String>,
    /// Feature type name (WFS).
    pub feature_type: Option<String>,
    /// Feature namespace (WFS).
    pub feature_ns: Option<String>,
    /// Restricts the returned properties. Empty means all.
    pub property_names: Vec<String>,
    /// Send credentials with the request (secured services).
    pub include_credentials: bool,
    /// Optional WFS filter document.
    pub wfs_filter: Option<String>,
    /// Bounding box restriction as `min_x,min_y,max_x,max_y`. Only honoured
    /// by the `all` loading strategy.
    pub bbox: Option<String>,
    /// Loading strategy.
    pub strategy: LoadingStrategy,
}

impl LoadRequest {
    /// A request with only the mandatory parts set.
    pub fn new(layer_id: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            layer_id: layer_id.into(),
            format,
            url: None,
            version: None,
            feature_type: None,
            feature_ns: None,
            property_names: Vec::new(),
            include_credentials: false,
            wfs_filter: None,
            bbox: None,
            strategy: LoadingStrategy::default(),
        }
    }
}

/// An error raised while loading remote features.
#[derive(Debug)]
pub enum LoadError {
    /// The request could not be sent or the service answered with an error.
    Transport {
        /// The URL that was requested.
        url: String,
        /// Description of the failure.
        details: String,
    },
    /// The response could not be decoded into features.
    Decode(String),
    /// The loader does not handle this kind of request.
    Unsupported(SourceFormat),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Transport { url, details } => {
                write!(f, "Failed to load features from '{url}': {details}")
            }
            LoadError::Decode(msg) => write!(f, "Failed to decode features: {msg}"),
            LoadError::Unsupported(format) => {
                write!(f, "Loader does not support {format} sources")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Fetches and decodes the features of a remote source.
#[async_trait]
pub trait FeatureLoader: Send + Sync {
    /// Loads the features described by `request`.
    async fn load(&self, request: &LoadRequest) -> Result<Vec<Feature>, LoadError>;
}
