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

//! Loads GeoJSON documents from the local file system.

use async_trait::async_trait;
use geoportal_core::feature::Feature;
use geoportal_core::loader::{FeatureLoader, LoadError, LoadRequest, SourceFormat};
use geoportal_data::decode_features;
use std::path::{Path, PathBuf};

/// Reads the request URL as a path (optionally prefixed with `file://`),
/// relative paths resolved against a base directory.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonFileLoader {
    base_dir: Option<PathBuf>,
}

impl GeoJsonFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl FeatureLoader for GeoJsonFileLoader {
    async fn load(&self, request: &LoadRequest) -> Result<Vec<Feature>, LoadError> {
        if request.format != SourceFormat::GeoJson {
            return Err(LoadError::Unsupported(request.format));
        }
        let url = request.url.clone().unwrap_or_default();
        let path = self.resolve(&url);
        log::debug!("Reading GeoJSON from {}.", path.display());

        let text = std::fs::read_to_string(&path).map_err(|e| LoadError::Transport {
            url: url.clone(),
            details: e.to_string(),
        })?;
        decode_features(&text).map_err(|e| LoadError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn request(url: &str, format: SourceFormat) -> LoadRequest {
        let mut request = LoadRequest::new("layer", format);
        request.url = Some(url.to_string());
        request
    }

    #[test]
    fn test_reads_relative_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("points.json")).unwrap();
        write!(
            file,
            r#"{{"type": "FeatureCollection", "features": [
                {{"type": "Feature", "geometry": {{"type": "Point", "coordinates": [1, 2]}}, "properties": {{}}}}
            ]}}"#
        )
        .unwrap();

        let loader = GeoJsonFileLoader::with_base_dir(dir.path());
        let features =
            pollster::block_on(loader.load(&request("points.json", SourceFormat::GeoJson))).unwrap();
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn test_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "not json").unwrap();
        let loader = GeoJsonFileLoader::with_base_dir(dir.path());

        assert!(matches!(
            pollster::block_on(loader.load(&request("missing.json", SourceFormat::GeoJson))),
            Err(LoadError::Transport { .. })
        ));
        assert!(matches!(
            pollster::block_on(loader.load(&request("broken.json", SourceFormat::GeoJson))),
            Err(LoadError::Decode(_))
        ));
        assert!(matches!(
            pollster::block_on(loader.load(&request("x", SourceFormat::Wfs))),
            Err(LoadError::Unsupported(SourceFormat::Wfs))
        ));
    }

    #[test]
    fn test_file_scheme_is_stripped() {
        let loader = GeoJsonFileLoader::new();
        assert_eq!(loader.resolve("file:///tmp/a.json"), PathBuf::from("/tmp/a.json"));
    }
}
