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

//! Collaborator contracts the layer stack calls out to.
//!
//! The portal provides these (store wiring, UI overlay, app-wide event
//! dispatch); the layer only sees the traits.

use crate::feature::SharedFeature;

/// The loading overlay shown while remote features are fetched.
pub trait LoaderOverlay: Send + Sync {
    /// Shows the overlay.
    fn show(&self);
    /// Hides the overlay.
    fn hide(&self);
}

/// Receives the features of every finished load cycle.
pub trait FeatureNotifier: Send + Sync {
    /// Called once per load cycle, after the transform ran.
    fn features_loaded(&self, layer_id: &str, features: &[SharedFeature]);

    /// Called when a layer (re)creates its GPU object.
    fn layer_built(&self, _layer_id: &str) {}

    /// Called when a layer released its GPU resources.
    fn layer_disposed(&self, _layer_id: &str) {}
}

/// An overlay that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOverlay;

impl LoaderOverlay for NoopOverlay {
    fn show(&self) {}
    fn hide(&self) {}
}

/// A notifier that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl FeatureNotifier for NoopNotifier {
    fn features_loaded(&self, _layer_id: &str, _features: &[SharedFeature]) {}
}
