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

//! Vertex streams for lines and polygons.

use super::{LayerRenderer, PackedBuffer, RenderFunctions};
use bytemuck::{Pod, Zeroable};
use geoportal_core::feature::{Feature, SharedFeature};
use geoportal_core::lane::{Lane, LaneKind};
use geoportal_core::renderer::{BufferUsage, RendererMode};
use geojson::{PolygonType, Position, Value};

/// Which pass a vertex belongs to.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Fill = 0,
    Stroke = 1,
    Point = 2,
}

/// One vertex of the generic vector buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GenericVertex {
    pub position: [f32; 2],
    /// Packed RGB of the fill or the stroke, depending on the pass.
    pub color: f32,
    pub opacity: f32,
    /// Stroke width, or symbol size for points.
    pub width: f32,
    /// A [`Primitive`] discriminant.
    pub primitive: u32,
}

/// Attribute values of one feature, evaluated once per feature.
struct FeatureAttributes {
    fill: (f32, f32),
    stroke: (f32, f32, f32),
    point: (f32, f32, f32),
}

impl FeatureAttributes {
    fn of(feature: &Feature) -> Self {
        Self {
            fill: (
                RenderFunctions::fill_color(feature),
                RenderFunctions::fill_opacity(feature),
            ),
            stroke: (
                RenderFunctions::stroke_color(feature),
                RenderFunctions::stroke_opacity(feature),
                RenderFunctions::stroke_width(feature),
            ),
            point: (
                RenderFunctions::point_color(feature),
                RenderFunctions::point_opacity(feature),
                RenderFunctions::point_size(feature),
            ),
        }
    }

    fn vertex(&self, primitive: Primitive, position: &Position) -> Option<GenericVertex> {
        let [x, y, ..] = position.as_slice() else {
            return None;
        };
        let (color, opacity, width) = match primitive {
            Primitive::Fill => (self.fill.0, self.fill.1, 0.0),
            Primitive::Stroke => self.stroke,
            Primitive::Point => self.point,
        };
        Some(GenericVertex {
            position: [*x as f32, *y as f32],
            color,
            opacity,
            width,
            primitive: primitive as u32,
        })
    }
}

/// Renders every geometry type through the fill, stroke and point channels.
///
/// Polygons emit their ring positions once as fill and once as stroke;
/// tessellation is left to the device backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericRenderer;

impl GenericRenderer {
    pub fn new() -> Self {
        Self
    }

    /// The vertices of one feature.
    pub fn vertices(&self, feature: &Feature) -> Vec<GenericVertex> {
        let mut out = Vec::new();
        if let Some(geometry) = feature.geometry() {
            let attributes = FeatureAttributes::of(feature);
            emit(&geometry.value, &attributes, &mut out);
        }
        out
    }
}

fn emit_all<'a>(
    primitive: Primitive,
    positions: impl IntoIterator<Item = &'a Position>,
    attributes: &FeatureAttributes,
    out: &mut Vec<GenericVertex>,
) {
    out.extend(
        positions
            .into_iter()
            .filter_map(|position| attributes.vertex(primitive, position)),
    );
}

/// Polygons are drawn twice: once as fill and once as outline.
fn emit_polygon(rings: &PolygonType, attributes: &FeatureAttributes, out: &mut Vec<GenericVertex>) {
    emit_all(Primitive::Fill, rings.iter().flatten(), attributes, out);
    emit_all(Primitive::Stroke, rings.iter().flatten(), attributes, out);
}

fn emit(value: &Value, attributes: &FeatureAttributes, out: &mut Vec<GenericVertex>) {
    match value {
        Value::Point(position) => emit_all(Primitive::Point, [position], attributes, out),
        Value::MultiPoint(positions) => emit_all(Primitive::Point, positions, attributes, out),
        Value::LineString(line) => emit_all(Primitive::Stroke, line, attributes, out),
        Value::MultiLineString(lines) => {
            emit_all(Primitive::Stroke, lines.iter().flatten(), attributes, out)
        }
        Value::Polygon(rings) => emit_polygon(rings, attributes, out),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                emit_polygon(rings, attributes, out);
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                emit(&geometry.value, attributes, out);
            }
        }
    }
}

impl Lane for GenericRenderer {
    fn strategy_name(&self) -> &'static str {
        "WebGlVector"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Render
    }
}

impl LayerRenderer for GenericRenderer {
    fn mode(&self) -> RendererMode {
        RendererMode::Generic
    }

    fn pack(&self, features: &[SharedFeature]) -> PackedBuffer {
        let vertices: Vec<GenericVertex> = features
            .iter()
            .flat_map(|feature| self.vertices(feature))
            .collect();
        PackedBuffer {
            bytes: bytemuck::cast_slice::<GenericVertex, u8>(&vertices).to_vec(),
            count: vertices.len(),
            stride: std::mem::size_of::<GenericVertex>() as u64,
            usage: BufferUsage::Vertex,
        }
    }
}
