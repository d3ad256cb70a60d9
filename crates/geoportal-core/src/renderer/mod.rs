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

//! Renderer-facing contracts: the graphics device abstraction, GPU buffer
//! handles and the renderer mode of a layer.

pub mod device;
pub mod error;

pub use self::device::{BufferDescriptor, BufferId, BufferUsage, GraphicsDevice};
pub use self::error::ResourceError;

use std::fmt;

/// The rendering strategy of a built layer. Fixed for the lifetime of a
/// rendered layer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererMode {
    /// Instanced point symbols; only valid for Point/MultiPoint data.
    Point,
    /// Generic vector rendering of lines and polygons.
    Generic,
}

impl fmt::Display for RendererMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererMode::Point => write!(f, "Point"),
            RendererMode::Generic => write!(f, "Generic"),
        }
    }
}
