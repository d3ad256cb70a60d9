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

//! Instanced point symbols.

use super::{LayerRenderer, PackedBuffer, RenderFunctions};
use bytemuck::{Pod, Zeroable};
use geoportal_core::feature::{Feature, SharedFeature};
use geoportal_core::lane::{Lane, LaneKind};
use geoportal_core::renderer::{BufferUsage, RendererMode};
use geoportal_core::style::PointSymbol;
use geojson::Value;

/// One point symbol instance as laid out in the instance buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    /// Point position in map units.
    pub position: [f32; 2],
    /// Packed RGB, see [`geoportal_core::color::pack_color`].
    pub color: f32,
    /// Radius in pixels.
    pub size: f32,
    pub opacity: f32,
}

/// Renders Point and MultiPoint features as instanced symbols.
///
/// Features with a bound rule read the point channel of the render
/// functions; the others use the layer's symbol.
#[derive(Debug, Clone, Default)]
pub struct PointRenderer {
    symbol: PointSymbol,
}

impl PointRenderer {
    pub fn new(symbol: PointSymbol) -> Self {
        Self { symbol }
    }

    pub fn symbol(&self) -> &PointSymbol {
        &self.symbol
    }

    fn template(&self, feature: &Feature) -> PointInstance {
        if feature.style_rule().is_some() {
            PointInstance {
                position: [0.0, 0.0],
                color: RenderFunctions::point_color(feature),
                size: RenderFunctions::point_size(feature),
                opacity: RenderFunctions::point_opacity(feature),
            }
        } else {
            PointInstance {
                position: [0.0, 0.0],
                color: self.symbol.color.packed(),
                size: self.symbol.size as f32,
                opacity: self.symbol.opacity as f32,
            }
        }
    }

    /// The instances of one feature. Non-point parts are skipped.
    pub fn instances(&self, feature: &Feature) -> Vec<PointInstance> {
        let mut out = Vec::new();
        if let Some(geometry) = feature.geometry() {
            let template = self.template(feature);
            collect_points(&geometry.value, &mut |x, y| {
                out.push(PointInstance {
                    position: [x as f32, y as f32],
                    ..template
                })
            });
        }
        out
    }
}

fn collect_points(value: &Value, emit: &mut impl FnMut(f64, f64)) {
    match value {
        Value::Point(position) => {
            if let [x, y, ..] = position.as_slice() {
                emit(*x, *y);
            }
        }
        Value::MultiPoint(positions) => {
            for position in positions {
                if let [x, y, ..] = position.as_slice() {
                    emit(*x, *y);
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_points(&geometry.value, emit);
            }
        }
        _ => log::trace!("Point renderer skipped a non-point geometry."),
    }
}

impl Lane for PointRenderer {
    fn strategy_name(&self) -> &'static str {
        "WebGlPoints"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Render
    }
}

impl LayerRenderer for PointRenderer {
    fn mode(&self) -> RendererMode {
        RendererMode::Point
    }

    fn pack(&self, features: &[SharedFeature]) -> PackedBuffer {
        let instances: Vec<PointInstance> = features
            .iter()
            .flat_map(|feature| self.instances(feature))
            .collect();
        PackedBuffer {
            bytes: bytemuck::cast_slice::<PointInstance, u8>(&instances).to_vec(),
            count: instances.len(),
            stride: std::mem::size_of::<PointInstance>() as u64,
            usage: BufferUsage::Instance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geoportal_core::style::StyleRule;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_one_instance_per_point() {
        let renderer = PointRenderer::default();
        let features: Vec<SharedFeature> = vec![
            Arc::new(Feature::from_value(Value::Point(vec![1.0, 2.0]))),
            Arc::new(Feature::from_value(Value::MultiPoint(vec![
                vec![3.0, 4.0],
                vec![5.0, 6.0],
            ]))),
        ];

        let packed = renderer.pack(&features);
        assert_eq!(packed.count, 3);
        assert_eq!(packed.stride, 20);
        assert_eq!(packed.bytes.len(), 60);
        assert_eq!(packed.usage, BufferUsage::Instance);

        let last: PointInstance = bytemuck::pod_read_unaligned(&packed.bytes[40..60]);
        assert_eq!(last.position, [5.0, 6.0]);
    }

    #[test]
    fn test_unbound_points_use_symbol() {
        let renderer = PointRenderer::default();
        let feature = Feature::from_value(Value::Point(vec![0.0, 0.0]));
        let instance = renderer.instances(&feature)[0];
        assert_relative_eq!(instance.color, 26_248.0);
        assert_relative_eq!(instance.size, 20.0);
        assert_relative_eq!(instance.opacity, 0.6);
    }

    #[test]
    fn test_bound_points_use_point_channel() {
        let rule: StyleRule = serde_json::from_value(json!({
            "style": {"circleFillColor": [255, 0, 0, 0.4], "circleRadius": 6}
        }))
        .unwrap();
        let mut feature = Feature::from_value(Value::Point(vec![0.0, 0.0]));
        feature.bind_style_rule(Some(Arc::new(rule)));

        let instance = PointRenderer::default().instances(&feature)[0];
        assert_relative_eq!(instance.color, 16_711_680.0);
        assert_relative_eq!(instance.size, 6.0);
        assert_relative_eq!(instance.opacity, 0.4);
    }

    #[test]
    fn test_lines_are_skipped() {
        let feature = Feature::from_value(Value::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]]));
        assert!(PointRenderer::default().instances(&feature).is_empty());
    }
}
