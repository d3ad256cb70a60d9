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

//! Rule-based style models read from the portal's style definitions.

use crate::error::DecodeError;
use geoportal_core::feature::Feature;
use geoportal_core::legend::{LegendEntry, LegendInfo};
use geoportal_core::style::{GeometryTypeRequest, StyleModel, StyleRegistry, StyleRule};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// One entry of a style definition document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleDefinition {
    pub style_id: String,
    pub rules: Vec<StyleRule>,
}

/// A geometry-type lookup the model was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryTypeLookup {
    pub request: GeometryTypeRequest,
    pub secured: bool,
}

/// A style model holding an ordered list of rules.
///
/// Rules are evaluated in order; the first rule whose conditions match a
/// feature styles it.
#[derive(Debug, Default)]
pub struct RuleStyleModel {
    id: String,
    rules: Vec<Arc<StyleRule>>,
    geometry_type: Mutex<Option<String>>,
    lookups: Mutex<Vec<GeometryTypeLookup>>,
}

/// Locks `mutex`, recovering the data of a poisoned lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RuleStyleModel {
    pub fn new(id: impl Into<String>, rules: Vec<StyleRule>) -> Self {
        Self {
            id: id.into(),
            rules: rules.into_iter().map(Arc::new).collect(),
            ..Self::default()
        }
    }

    /// Rules in evaluation order. The first match binds.
    pub fn rules(&self) -> &[Arc<StyleRule>] {
        &self.rules
    }

    /// The geometry type shown in legend entries, once known.
    pub fn geometry_type(&self) -> Option<String> {
        lock(&self.geometry_type).clone()
    }

    /// Every geometry-type lookup requested so far, in call order.
    pub fn lookups(&self) -> Vec<GeometryTypeLookup> {
        lock(&self.lookups).clone()
    }

    fn record_lookup(&self, request: &GeometryTypeRequest, secured: bool) {
        log::debug!(
            "Style '{}' asked for the geometry type of '{}' (secured: {secured}).",
            self.id,
            request.url
        );
        if let Some(geometry_type) = &request.style_geometry_type {
            *lock(&self.geometry_type) = Some(geometry_type.clone());
        }
        lock(&self.lookups).push(GeometryTypeLookup {
            request: request.clone(),
            secured,
        });
    }
}

impl From<StyleDefinition> for RuleStyleModel {
    fn from(definition: StyleDefinition) -> Self {
        Self::new(definition.style_id, definition.rules)
    }
}

impl StyleModel for RuleStyleModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn rules_for_feature(&self, feature: &Feature) -> Vec<Arc<StyleRule>> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(feature))
            .cloned()
            .collect()
    }

    fn first_matching_rule(&self, feature: &Feature) -> Option<Arc<StyleRule>> {
        self.rules.iter().find(|rule| rule.matches(feature)).cloned()
    }

    fn legend_infos(&self) -> Vec<LegendEntry> {
        let geometry_type = self.geometry_type();
        self.rules
            .iter()
            .map(|rule| {
                LegendEntry::Info(LegendInfo {
                    label: rule.style.legend_value.clone().unwrap_or_default(),
                    geometry_type: geometry_type.clone(),
                    style: rule.style.clone(),
                })
            })
            .collect()
    }

    fn geometry_type_from_wfs(&self, request: &GeometryTypeRequest) {
        self.record_lookup(request, false);
    }

    fn geometry_type_from_secured_wfs(&self, request: &GeometryTypeRequest) {
        self.record_lookup(request, true);
    }
}

/// Style models keyed by style id.
#[derive(Debug, Default)]
pub struct InMemoryStyleRegistry {
    models: HashMap<String, Arc<RuleStyleModel>>,
}

impl InMemoryStyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a style definition document (a JSON array of definitions).
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let definitions: Vec<StyleDefinition> = serde_json::from_str(text)?;
        let mut registry = Self::new();
        for definition in definitions {
            registry.insert(RuleStyleModel::from(definition));
        }
        log::debug!("Loaded {} style models.", registry.models.len());
        Ok(registry)
    }

    /// Registers a model, replacing any model with the same id.
    pub fn insert(&mut self, model: RuleStyleModel) -> Arc<RuleStyleModel> {
        let model = Arc::new(model);
        self.models.insert(model.id.clone(), Arc::clone(&model));
        model
    }

    /// The concrete model registered under `style_id`.
    pub fn get(&self, style_id: &str) -> Option<Arc<RuleStyleModel>> {
        self.models.get(style_id).cloned()
    }
}

impl StyleRegistry for InMemoryStyleRegistry {
    fn style_model(&self, style_id: &str) -> Option<Arc<dyn StyleModel>> {
        self.get(style_id).map(|model| model as Arc<dyn StyleModel>)
    }
}
