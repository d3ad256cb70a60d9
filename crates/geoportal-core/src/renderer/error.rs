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

//! Errors raised by graphics devices.

use super::device::BufferId;
use std::fmt;

/// An error related to the creation or use of a GPU resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The handle does not refer to a live resource.
    InvalidHandle(BufferId),
    /// The device refused to allocate the requested amount of memory.
    OutOfMemory {
        /// Requested size in bytes.
        requested: u64,
    },
    /// The resource belongs to a layer whose GPU state was already disposed.
    Disposed,
    /// An error originating from the specific graphics backend.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidHandle(id) => {
                write!(f, "Invalid resource handle: {id:?}")
            }
            ResourceError::OutOfMemory { requested } => {
                write!(f, "Out of GPU memory allocating {requested} bytes")
            }
            ResourceError::Disposed => write!(f, "GPU resources were already disposed"),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_display() {
        assert_eq!(
            ResourceError::InvalidHandle(BufferId(3)).to_string(),
            "Invalid resource handle: BufferId(3)"
        );
        assert_eq!(
            ResourceError::OutOfMemory { requested: 64 }.to_string(),
            "Out of GPU memory allocating 64 bytes"
        );
    }
}
