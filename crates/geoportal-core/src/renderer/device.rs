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

//! Defines the `GraphicsDevice` trait, the narrow slice of a GPU backend a
//! vector layer needs: uploading attribute buffers and freeing them again.

use super::error::ResourceError;
use std::borrow::Cow;

/// An opaque handle to a GPU buffer resource.
///
/// Returned by [`GraphicsDevice::create_buffer_with_data`] and used to free
/// the buffer later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// How a buffer is bound when drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Per-vertex attributes.
    Vertex,
    /// Per-instance attributes (one record per point symbol).
    Instance,
}

/// A descriptor used to create a buffer.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// How the buffer is bound.
    pub usage: BufferUsage,
    /// Size in bytes of one record, so backends can build vertex layouts.
    pub stride: u64,
}

/// A graphics device able to own GPU buffers.
///
/// Implementations must be thread-safe, but the layer stack only ever calls
/// them from one thread at a time.
pub trait GraphicsDevice: Send + Sync {
    /// Creates a buffer initialized with `data`.
    ///
    /// # Errors
    /// Returns a [`ResourceError`] if the backend cannot allocate the buffer.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor<'_>,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Destroys a buffer and releases its memory.
    ///
    /// # Errors
    /// Returns [`ResourceError::InvalidHandle`] if the id is unknown.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;
}
