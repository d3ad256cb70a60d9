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

//! The WebGL vector layer controller.

use super::base_layer::{BaseLayer, LayerLifecycle};
use super::legend::build_legend;
use super::rendered_layer::{LayerOptions, RenderedLayer};
use super::services::LayerServices;
use super::source_manager::SourceManager;
use anyhow::Context;
use geoportal_core::feature::{Feature, SharedFeature};
use geoportal_core::geometry::{Extent, GeometryType};
use geoportal_core::lane::{Lane, LaneKind};
use geoportal_core::legend::LegendEntry;
use geoportal_core::renderer::RendererMode;
use geoportal_core::style::StyleModel;
use geoportal_data::{LayerDescriptor, RawLayerRegistry, VectorSource};
use geoportal_lanes::{renderer_for, FeatureFilterLane, FeatureTransformLane};
use std::sync::Arc;

/// Where a layer is in its GPU lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    /// No GPU object exists.
    Unbuilt,
    /// A GPU object with the given renderer is live.
    Built(RendererMode),
    /// The GPU object released its resources; feature data is kept.
    Disposed,
}

/// The source layer a descriptor reads its features from: the referenced
/// raw layer, or the descriptor itself typed by its `sourceId`.
fn resolve_source_layer(
    descriptor: &LayerDescriptor,
    registry: &dyn RawLayerRegistry,
) -> LayerDescriptor {
    descriptor
        .source_id
        .as_deref()
        .and_then(|id| registry.layer_where_id(id))
        .unwrap_or_else(|| {
            log::debug!(
                "Layer '{}' uses its own descriptor as source layer.",
                descriptor.id
            );
            LayerDescriptor {
                typ: descriptor.source_id.clone(),
                ..descriptor.clone()
            }
        })
}

/// A vector layer drawn through a GPU device.
///
/// The controller owns the source, the retained feature list and the
/// [`RenderedLayer`]. Deselecting the layer disposes the GPU object; selecting
/// it again rebuilds one from the cached attributes with the renderer mode
/// decided at construction.
pub struct WebGlLayer {
    base: BaseLayer,
    attributes: LayerDescriptor,
    source_layer: LayerDescriptor,
    services: LayerServices,
    style_model: Option<Arc<dyn StyleModel>>,
    sources: SourceManager,
    transform: FeatureTransformLane,
    features: Vec<SharedFeature>,
    rendered: Option<RenderedLayer>,
    is_point_layer: Option<bool>,
    selected_at_construction: bool,
    source_updated: bool,
    generation: u64,
}

impl WebGlLayer {
    /// Builds the layer: source, renderer and legend.
    ///
    /// Inline features are filtered and transformed right away. Remote
    /// sources stay empty until [`WebGlLayer::load`] runs.
    pub fn new(descriptor: LayerDescriptor, services: LayerServices) -> anyhow::Result<Self> {
        let source_layer = resolve_source_layer(&descriptor, services.layers.as_ref());
        // Defaults are read lazily, so they only fill fields that neither
        // layer sets. A source layer's own hitTolerance is kept rather than
        // reset to the default.
        let attributes = descriptor.merge_over(&source_layer);

        let style_model = attributes
            .style_id
            .as_deref()
            .and_then(|id| services.styles.style_model(id));
        if let (Some(style_id), None) = (&attributes.style_id, &style_model) {
            log::warn!(
                "Style '{style_id}' of layer '{}' is unknown, using default render values.",
                attributes.id
            );
        }

        let filter = FeatureFilterLane::for_layer(&attributes)
            .with_context(|| format!("Invalid bboxGeometry on layer '{}'", attributes.id))?;
        let transform = FeatureTransformLane::for_layer(&attributes, style_model.clone());
        let sources = SourceManager::create_source(&source_layer, &attributes, filter);
        let base = BaseLayer::new(&attributes, !descriptor.is_child_layer());

        let mut layer = Self {
            base,
            selected_at_construction: descriptor.is_selected(),
            source_updated: attributes.source_updated(),
            attributes,
            source_layer,
            services,
            style_model,
            sources,
            transform,
            features: Vec::new(),
            rendered: None,
            is_point_layer: None,
            generation: 0,
        };

        let inline = layer.sources.inline_features().to_vec();
        if !inline.is_empty() {
            layer.ingest(inline);
        }

        layer.build_rendered_layer();

        let legend = build_legend(
            &layer.attributes,
            &layer.source_layer,
            layer.style_model.as_deref(),
        );
        layer.base.set_legend(legend);

        Ok(layer)
    }

    /// The effective attributes: the descriptor layered over its source layer.
    pub fn attributes(&self) -> &LayerDescriptor {
        &self.attributes
    }

    /// The layer the descriptor's `sourceId` resolved to, or the descriptor
    /// itself when nothing was registered under that id.
    pub fn source_layer(&self) -> &LayerDescriptor {
        &self.source_layer
    }

    /// The features currently visible.
    pub fn source(&self) -> &VectorSource {
        self.sources.source()
    }

    /// Source kind, load request and filter of this layer.
    pub fn source_manager(&self) -> &SourceManager {
        &self.sources
    }

    /// The features of the last load cycle, independent of visibility.
    pub fn features(&self) -> &[SharedFeature] {
        &self.features
    }

    /// The current GPU object. Still present, but disposed, after a
    /// deselect.
    pub fn rendered_layer(&self) -> Option<&RenderedLayer> {
        self.rendered.as_ref()
    }

    /// How many GPU objects this layer has built so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The style model found under the layer's `styleId`, if any.
    pub fn style_model(&self) -> Option<&Arc<dyn StyleModel>> {
        self.style_model.as_ref()
    }

    /// Whether [`WebGlLayer::update_source`] has already refreshed the data.
    pub fn source_updated(&self) -> bool {
        self.source_updated
    }

    /// Lifecycle state of the GPU object.
    pub fn state(&self) -> LayerState {
        match &self.rendered {
            None => LayerState::Unbuilt,
            Some(rendered) if rendered.is_disposed() => LayerState::Disposed,
            Some(rendered) => LayerState::Built(rendered.mode()),
        }
    }

    /// Whether no live GPU object exists.
    pub fn is_disposed(&self) -> bool {
        self.rendered
            .as_ref()
            .map_or(true, RenderedLayer::is_disposed)
    }

    /// Whether the layer renders point symbols. Decided once.
    pub fn is_point_layer(&mut self) -> bool {
        if let Some(decided) = self.is_point_layer {
            return decided;
        }
        let decided = match self.attributes.is_point_layer {
            Some(flag) => flag,
            None => {
                let features = self.sources.source().features();
                if features.is_empty() {
                    log::warn!(
                        "Layer '{}' has no features to infer its geometry from, assuming points.",
                        self.attributes.id
                    );
                }
                features.iter().all(|feature| {
                    feature
                        .geometry_type()
                        .is_some_and(GeometryType::is_point_like)
                })
            }
        };
        self.is_point_layer = Some(decided);
        decided
    }

    /// Creates a fresh GPU object for the decided renderer mode.
    fn build_rendered_layer(&mut self) {
        let is_point_layer = self.is_point_layer();
        let mode = if is_point_layer {
            RendererMode::Point
        } else {
            RendererMode::Generic
        };
        let options = LayerOptions::from_attributes(&self.attributes, is_point_layer);
        let renderer = renderer_for(mode, self.attributes.point_style().symbol);
        self.rendered = Some(RenderedLayer::new(
            options,
            renderer,
            Arc::clone(&self.services.device),
        ));
        self.generation += 1;
        self.services.notifier.layer_built(&self.attributes.id);
    }

    /// The lanes features pass through, in order. The render lane is only
    /// listed while a GPU object exists.
    pub fn pipeline(&self) -> Vec<(LaneKind, &'static str)> {
        let filter = self.sources.filter();
        let mut lanes = vec![
            (filter.lane_kind(), filter.strategy_name()),
            (self.transform.lane_kind(), self.transform.strategy_name()),
        ];
        if let Some(rendered) = self.rendered.as_ref().filter(|r| !r.is_disposed()) {
            lanes.push((LaneKind::Render, rendered.strategy_name()));
        }
        lanes
    }

    /// Runs filter and transform on a loaded batch, fills the source and
    /// replaces the retained list.
    fn ingest(&mut self, loaded: Vec<Feature>) -> usize {
        let received = loaded.len();
        let kept = self.sources.filter().run(loaded);
        let features = self.transform.run(kept);
        log::debug!(
            "Layer '{}': {} of {} features passed {} and {}.",
            self.attributes.id,
            features.len(),
            received,
            self.sources.filter().strategy_name(),
            self.transform.strategy_name()
        );
        self.sources.add_features(features.iter().cloned());
        self.services
            .notifier
            .features_loaded(&self.attributes.id, &features);
        let count = features.len();
        self.features = features;
        count
    }

    /// The overlay also follows the selection the layer was created with, so
    /// a layer deselected after construction still shows it.
    fn shows_overlay(&self) -> bool {
        self.base.is_selected() || self.selected_at_construction
    }

    /// Fetches the remote features once and adds them to the source. WFS
    /// sources drop their previous features when the load starts.
    ///
    /// Returns the number of features that passed the filter.
    pub async fn load(&mut self) -> anyhow::Result<usize> {
        let Some(request) = self.sources.request().cloned() else {
            log::debug!("Layer '{}' has no remote source.", self.attributes.id);
            return Ok(0);
        };

        if self.shows_overlay() {
            self.services.overlay.show();
        }
        self.sources.begin_load();

        let loader = Arc::clone(&self.services.loader);
        match loader.load(&request).await {
            Ok(loaded) => {
                let count = self.ingest(loaded);
                if self.shows_overlay() {
                    self.services.overlay.hide();
                }
                log::info!("Loaded {count} features into layer '{}'.", self.attributes.id);
                Ok(count)
            }
            Err(e) => {
                log::error!("Loading features of layer '{}' failed: {e}", self.attributes.id);
                Err(anyhow::Error::new(e)
                    .context(format!("Failed to load layer '{}'", self.attributes.id)))
            }
        }
    }

    /// Clears the source and runs a full load cycle. Sources without a
    /// remote part re-ingest their inline features.
    pub async fn refresh(&mut self) -> anyhow::Result<usize> {
        self.sources.clear();
        if self.sources.request().is_none() {
            let inline = self.sources.inline_features().to_vec();
            return Ok(self.ingest(inline));
        }
        self.load().await
    }

    /// Refreshes the source the first time it is called. Returns whether a
    /// refresh ran.
    pub async fn update_source(&mut self) -> anyhow::Result<bool> {
        if self.source_updated {
            return Ok(false);
        }
        self.source_updated = true;
        self.refresh().await?;
        Ok(true)
    }

    /// Empties the source. Retained features and the GPU object stay.
    pub fn clear_source(&mut self) {
        self.sources.clear();
    }

    /// Hides every feature.
    pub fn hide_all(&mut self) {
        self.clear_source();
    }

    /// Shows every retained feature.
    pub fn show_all(&mut self) {
        self.hide_all();
        self.sources.add_features(self.features.iter().cloned());
    }

    /// Shows the retained features with the given ids, in the order of
    /// `ids`. Unknown ids are skipped.
    pub fn show_by_ids<S: AsRef<str>>(&mut self, ids: &[S]) {
        let shown: Vec<SharedFeature> = ids
            .iter()
            .filter_map(|id| {
                self.features
                    .iter()
                    .find(|feature| feature.id() == Some(id.as_ref()))
                    .cloned()
            })
            .collect();
        self.hide_all();
        self.sources.add_features(shown);
    }

    /// Uploads the visible features when they changed since the last frame.
    /// Does nothing while the layer is disposed.
    pub fn prepare_frame(&mut self) -> anyhow::Result<bool> {
        match self.rendered.as_mut() {
            Some(rendered) if !rendered.is_disposed() => rendered
                .prepare(self.sources.source())
                .with_context(|| format!("Failed to upload layer '{}'", self.attributes.id)),
            _ => Ok(false),
        }
    }

    /// Visible features whose extent intersects the hit box around
    /// `coordinate`. The box grows with the square root of the map
    /// resolution. Layers without feature info never report hits.
    pub fn features_in_hit_box(&self, coordinate: [f64; 2], resolution: f64) -> Vec<SharedFeature> {
        match &self.attributes.gfi_attributes {
            Some(gfi) if !gfi.is_ignore() => {}
            _ => return Vec::new(),
        }
        let tolerance = match self.attributes.hit_tolerance() {
            t if t > 0.0 => t,
            _ => 1.0,
        };
        let hit_box = Extent::from_coordinate(coordinate).buffer(tolerance * resolution.sqrt());
        self.sources
            .source()
            .features()
            .iter()
            .filter(|feature| feature.extent().is_some_and(|e| e.intersects(&hit_box)))
            .cloned()
            .collect()
    }
}

impl LayerLifecycle for WebGlLayer {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn is_selected(&self) -> bool {
        self.base.is_selected()
    }

    fn is_visible_in_map(&self) -> bool {
        self.base.is_visible_in_map()
    }

    /// Rebuilds a disposed GPU object before selecting, and disposes it once
    /// the layer is no longer visible. Feature data is kept either way.
    fn set_selected(&mut self, selected: bool) {
        if self.is_disposed() {
            self.build_rendered_layer();
        }

        self.base.set_selected(selected);

        if !self.base.is_visible_in_map() {
            if let Some(rendered) = self.rendered.as_mut() {
                rendered.dispose();
                self.services.notifier.layer_disposed(&self.attributes.id);
            }
        }
    }

    fn legend(&self) -> &[LegendEntry] {
        self.base.legend()
    }
}
