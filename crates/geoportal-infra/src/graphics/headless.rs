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

//! A graphics device that keeps buffers in host memory.
//!
//! Used by the sandbox and by tests to observe uploads and releases without
//! a GPU.

use geoportal_core::renderer::{
    BufferDescriptor, BufferId, BufferUsage, GraphicsDevice, ResourceError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct StoredBuffer {
    label: Option<String>,
    usage: BufferUsage,
    stride: u64,
    bytes: Vec<u8>,
}

/// A [`GraphicsDevice`] storing buffer contents in a map.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    buffers: Mutex<HashMap<BufferId, StoredBuffer>>,
    next_id: AtomicUsize,
    memory_limit: Option<usize>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device refusing allocations beyond `bytes` in total.
    pub fn with_memory_limit(bytes: usize) -> Self {
        Self {
            memory_limit: Some(bytes),
            ..Self::default()
        }
    }

    fn buffers(&self) -> Result<MutexGuard<'_, HashMap<BufferId, StoredBuffer>>, ResourceError> {
        self.buffers
            .lock()
            .map_err(|_| ResourceError::BackendError("buffer table poisoned".to_string()))
    }

    /// Number of buffers currently alive.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers().map_or(0, |buffers| buffers.len())
    }

    /// Bytes held by all live buffers.
    pub fn allocated_bytes(&self) -> usize {
        self.buffers()
            .map_or(0, |buffers| buffers.values().map(|b| b.bytes.len()).sum())
    }

    /// A copy of the contents of a live buffer.
    pub fn buffer_contents(&self, id: BufferId) -> Option<Vec<u8>> {
        self.buffers().ok()?.get(&id).map(|b| b.bytes.clone())
    }

    /// Usage and stride of a live buffer.
    pub fn buffer_layout(&self, id: BufferId) -> Option<(BufferUsage, u64)> {
        self.buffers().ok()?.get(&id).map(|b| (b.usage, b.stride))
    }

    /// Debug label of a live buffer.
    pub fn buffer_label(&self, id: BufferId) -> Option<String> {
        self.buffers().ok()?.get(&id).and_then(|b| b.label.clone())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor<'_>,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let mut buffers = self.buffers()?;
        if let Some(limit) = self.memory_limit {
            let used: usize = buffers.values().map(|b| b.bytes.len()).sum();
            if used + data.len() > limit {
                return Err(ResourceError::OutOfMemory {
                    requested: data.len() as u64,
                });
            }
        }

        let id = BufferId(self.next_id.fetch_add(1, Ordering::Relaxed));
        buffers.insert(
            id,
            StoredBuffer {
                label: descriptor.label.as_ref().map(|l| l.to_string()),
                usage: descriptor.usage,
                stride: descriptor.stride,
                bytes: data.to_vec(),
            },
        );
        log::trace!("Created buffer {id:?} ({} bytes).", data.len());
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        match self.buffers()?.remove(&id) {
            Some(_) => {
                log::trace!("Destroyed buffer {id:?}.");
                Ok(())
            }
            None => Err(ResourceError::InvalidHandle(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> BufferDescriptor<'static> {
        BufferDescriptor {
            label: Some("test".into()),
            usage: BufferUsage::Vertex,
            stride: 4,
        }
    }

    #[test]
    fn test_create_and_destroy() {
        let device = HeadlessDevice::new();
        let id = device.create_buffer_with_data(&descriptor(), &[1, 2, 3, 4]).unwrap();

        assert_eq!(device.live_buffer_count(), 1);
        assert_eq!(device.allocated_bytes(), 4);
        assert_eq!(device.buffer_contents(id), Some(vec![1, 2, 3, 4]));
        assert_eq!(device.buffer_layout(id), Some((BufferUsage::Vertex, 4)));
        assert_eq!(device.buffer_label(id).as_deref(), Some("test"));

        device.destroy_buffer(id).unwrap();
        assert_eq!(device.live_buffer_count(), 0);
        assert!(matches!(
            device.destroy_buffer(id),
            Err(ResourceError::InvalidHandle(_))
        ));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let device = HeadlessDevice::new();
        let first = device.create_buffer_with_data(&descriptor(), &[0]).unwrap();
        device.destroy_buffer(first).unwrap();
        let second = device.create_buffer_with_data(&descriptor(), &[0]).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_memory_limit() {
        let device = HeadlessDevice::with_memory_limit(8);
        device.create_buffer_with_data(&descriptor(), &[0; 6]).unwrap();
        assert!(matches!(
            device.create_buffer_with_data(&descriptor(), &[0; 4]),
            Err(ResourceError::OutOfMemory { requested: 4 })
        ));
    }
}
