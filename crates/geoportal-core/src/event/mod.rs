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

//! Layer events and the bus they travel on.

mod bus;

pub use self::bus::EventBus;

use crate::feature::SharedFeature;
use crate::services::FeatureNotifier;

/// Something that happened to a layer and that other parts of the portal
/// may react to.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerEvent {
    /// A load cycle finished and its features were transformed.
    FeaturesLoaded {
        /// Id of the layer.
        layer_id: String,
        /// The transformed features, in load order.
        features: Vec<SharedFeature>,
    },
    /// The GPU resources of a layer were released.
    Disposed {
        /// Id of the layer.
        layer_id: String,
    },
    /// The GPU resources of a layer were (re)created.
    Built {
        /// Id of the layer.
        layer_id: String,
    },
}

impl FeatureNotifier for EventBus<LayerEvent> {
    fn features_loaded(&self, layer_id: &str, features: &[SharedFeature]) {
        self.publish(LayerEvent::FeaturesLoaded {
            layer_id: layer_id.to_string(),
            features: features.to_vec(),
        });
    }

    fn layer_built(&self, layer_id: &str) {
        self.publish(LayerEvent::Built {
            layer_id: layer_id.to_string(),
        });
    }

    fn layer_disposed(&self, layer_id: &str) {
        self.publish(LayerEvent::Disposed {
            layer_id: layer_id.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Feature;
    use flume::TryRecvError;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_drain_on_empty_bus() {
        let bus = EventBus::<LayerEvent>::new();
        assert!(bus.drain().is_empty());
        assert_eq!(bus.receiver().try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_notifier_publishes_features_loaded() {
        let bus = EventBus::<LayerEvent>::new();
        let features = vec![Arc::new(Feature::default().with_id("a"))];

        bus.features_loaded("layer-1", &features);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![LayerEvent::FeaturesLoaded {
                layer_id: "layer-1".to_string(),
                features,
            }]
        );
    }

    #[test]
    fn test_lifecycle_notifications_keep_order() {
        let bus = EventBus::<LayerEvent>::new();
        bus.layer_built("a");
        bus.layer_disposed("a");

        let events = bus.drain();
        assert!(matches!(events[0], LayerEvent::Built { .. }));
        assert!(matches!(events[1], LayerEvent::Disposed { .. }));
    }

    #[test]
    fn test_publish_from_another_thread() {
        let bus = EventBus::<LayerEvent>::new();
        let sender = bus.sender();

        let handle = thread::spawn(move || {
            sender
                .send(LayerEvent::Disposed {
                    layer_id: "remote".to_string(),
                })
                .expect("send from thread failed");
        });

        let received = bus
            .receiver()
            .recv_timeout(Duration::from_secs(1))
            .expect("no event received");
        assert_eq!(
            received,
            LayerEvent::Disposed {
                layer_id: "remote".to_string()
            }
        );
        handle.join().expect("thread join failed");
    }

    #[test]
    fn test_send_fails_once_bus_is_dropped() {
        let bus = EventBus::<LayerEvent>::new();
        let sender = bus.sender();
        drop(bus);
        assert!(sender
            .send(LayerEvent::Built {
                layer_id: "gone".to_string()
            })
            .is_err());
    }
}
