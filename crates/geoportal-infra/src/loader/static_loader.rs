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

//! A loader answering from a fixed table of responses.

use async_trait::async_trait;
use geoportal_core::feature::Feature;
use geoportal_core::loader::{FeatureLoader, LoadError, LoadRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Response {
    Features(Vec<Feature>),
    Failure(String),
}

/// Serves prepared features keyed by request URL.
#[derive(Debug, Default)]
pub struct StaticFeatureLoader {
    responses: Mutex<HashMap<String, Response>>,
    requests: Mutex<Vec<LoadRequest>>,
    calls: AtomicUsize,
}

impl StaticFeatureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests for `url` with `features`.
    pub fn with_features(self, url: impl Into<String>, features: Vec<Feature>) -> Self {
        self.set_features(url, features);
        self
    }

    /// Replaces the answer for `url`.
    pub fn set_features(&self, url: impl Into<String>, features: Vec<Feature>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(url.into(), Response::Features(features));
        }
    }

    /// Makes requests for `url` fail with `details`.
    pub fn set_failure(&self, url: impl Into<String>, details: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(url.into(), Response::Failure(details.into()));
        }
    }

    /// Number of load calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// The requests received so far, in order.
    pub fn requests(&self) -> Vec<LoadRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FeatureLoader for StaticFeatureLoader {
    async fn load(&self, request: &LoadRequest) -> Result<Vec<Feature>, LoadError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let url = request.url.clone().unwrap_or_default();
        let response = self
            .responses
            .lock()
            .ok()
            .and_then(|responses| responses.get(&url).cloned());

        match response {
            Some(Response::Features(features)) => Ok(features),
            Some(Response::Failure(details)) => Err(LoadError::Transport { url, details }),
            None => Err(LoadError::Transport {
                url,
                details: "no response registered".to_string(),
            }),
        }
    }
}
