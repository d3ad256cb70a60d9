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

//! A loader overlay that only logs and counts.

use geoportal_core::services::LoaderOverlay;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Logs every show/hide request of the loading overlay.
#[derive(Debug, Default)]
pub struct LoggingOverlay {
    shown: AtomicUsize,
    hidden: AtomicUsize,
}

impl LoggingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// How often the overlay was shown.
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::Relaxed)
    }

    /// How often the overlay was hidden.
    pub fn hidden(&self) -> usize {
        self.hidden.load(Ordering::Relaxed)
    }

    /// Whether more show than hide requests arrived.
    pub fn is_visible(&self) -> bool {
        self.shown() > self.hidden()
    }
}

impl LoaderOverlay for LoggingOverlay {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::Relaxed);
        log::info!("Loading...");
    }

    fn hide(&self) {
        self.hidden.fetch_add(1, Ordering::Relaxed);
        log::info!("Loading finished.");
    }
}
