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

//! Per-feature GPU attribute values derived from the bound style rule.

use geoportal_core::color::{RgbaColor, DEFAULT_FEATURE_COLOR};
use geoportal_core::feature::Feature;
use geoportal_core::style::VectorStyle;
use std::fmt;

/// Opacity of polygon fills without a bound rule.
pub const UNBOUND_FILL_OPACITY: f32 = 0.8;
/// Opacity of strokes without a bound rule.
pub const UNBOUND_STROKE_OPACITY: f32 = 1.0;
/// Opacity of point symbols without a bound rule.
pub const UNBOUND_POINT_OPACITY: f32 = 0.8;
/// Stroke width when none is known.
pub const DEFAULT_STROKE_WIDTH: f32 = 1.0;
/// Point size when none is known.
pub const DEFAULT_POINT_SIZE: f32 = 20.0;

/// A group of attributes drawn together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Polygon interiors.
    Fill,
    /// Polygon outlines and line strings.
    Stroke,
    /// Point symbols.
    Point,
}

/// A single GPU attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Color,
    Opacity,
    Width,
    Size,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Color => "color",
            Attribute::Opacity => "opacity",
            Attribute::Width => "width",
            Attribute::Size => "size",
        };
        f.write_str(name)
    }
}

/// Reads one attribute of one feature.
pub type AttributeFn = fn(&Feature) -> f32;

const FILL: &[(Attribute, AttributeFn)] = &[
    (Attribute::Color, RenderFunctions::fill_color),
    (Attribute::Opacity, RenderFunctions::fill_opacity),
];

const STROKE: &[(Attribute, AttributeFn)] = &[
    (Attribute::Color, RenderFunctions::stroke_color),
    (Attribute::Width, RenderFunctions::stroke_width),
    (Attribute::Opacity, RenderFunctions::stroke_opacity),
];

const POINT: &[(Attribute, AttributeFn)] = &[
    (Attribute::Color, RenderFunctions::point_color),
    (Attribute::Size, RenderFunctions::point_size),
    (Attribute::Opacity, RenderFunctions::point_opacity),
];

impl Channel {
    /// The attributes of this channel with their accessors.
    pub fn attributes(self) -> &'static [(Attribute, AttributeFn)] {
        match self {
            Channel::Fill => FILL,
            Channel::Stroke => STROKE,
            Channel::Point => POINT,
        }
    }
}

fn style_of(feature: &Feature) -> Option<&VectorStyle> {
    feature.style_rule().map(|rule| &rule.style)
}

fn packed_or_default(color: Option<&RgbaColor>) -> f32 {
    color.unwrap_or(&DEFAULT_FEATURE_COLOR).packed()
}

fn alpha_or_opaque(color: Option<&RgbaColor>) -> f32 {
    color.and_then(|c| c.a).map_or(1.0, |alpha| alpha as f32)
}

/// Stateless attribute accessors.
///
/// Features without a bound rule get fixed defaults. Features with a rule
/// read the matching style field, falling back to the default color, full
/// opacity, width 1 and size 20 for missing fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderFunctions;

impl RenderFunctions {
    /// The accessor for `attribute` on `channel`, if the channel has one.
    pub fn accessor(channel: Channel, attribute: Attribute) -> Option<AttributeFn> {
        channel
            .attributes()
            .iter()
            .find(|(candidate, _)| *candidate == attribute)
            .map(|(_, accessor)| *accessor)
    }

    /// Evaluates `attribute` of `channel` for `feature`.
    pub fn evaluate(channel: Channel, attribute: Attribute, feature: &Feature) -> Option<f32> {
        Self::accessor(channel, attribute).map(|accessor| accessor(feature))
    }

    /// Packed polygon fill color of the bound rule.
    pub fn fill_color(feature: &Feature) -> f32 {
        match style_of(feature) {
            Some(style) => packed_or_default(style.polygon_fill_color.as_ref()),
            None => DEFAULT_FEATURE_COLOR.packed(),
        }
    }

    /// Alpha of the fill color, or [`UNBOUND_FILL_OPACITY`] without a rule.
    pub fn fill_opacity(feature: &Feature) -> f32 {
        match style_of(feature) {
            Some(style) => alpha_or_opaque(style.polygon_fill_color.as_ref()),
            None => UNBOUND_FILL_OPACITY,
        }
    }

    /// Packed polygon stroke color of the bound rule.
    pub fn stroke_color(feature: &Feature) -> f32 {
        match style_of(feature) {
            Some(style) => packed_or_default(style.polygon_stroke_color.as_ref()),
            None => DEFAULT_FEATURE_COLOR.packed(),
        }
    }

    /// Stroke width in pixels.
    pub fn stroke_width(feature: &Feature) -> f32 {
        style_of(feature)
            .and_then(|style| style.polygon_stroke_width)
            .map_or(DEFAULT_STROKE_WIDTH, |width| width as f32)
    }

    pub fn stroke_opacity(feature: &Feature) -> f32 {
        match style_of(feature) {
            Some(style) => alpha_or_opaque(style.polygon_stroke_color.as_ref()),
            None => UNBOUND_STROKE_OPACITY,
        }
    }

    /// Packed circle fill color of the bound rule.
    pub fn point_color(feature: &Feature) -> f32 {
        match style_of(feature) {
            Some(style) => packed_or_default(style.circle_fill_color.as_ref()),
            None => DEFAULT_FEATURE_COLOR.packed(),
        }
    }

    /// Circle radius in pixels, [`DEFAULT_POINT_SIZE`] when unstyled.
    pub fn point_size(feature: &Feature) -> f32 {
        style_of(feature)
            .and_then(|style| style.circle_radius)
            .map_or(DEFAULT_POINT_SIZE, |size| size as f32)
    }

    pub fn point_opacity(feature: &Feature) -> f32 {
        match style_of(feature) {
            Some(style) => alpha_or_opaque(style.circle_fill_color.as_ref()),
            None => UNBOUND_POINT_OPACITY,
        }
    }
}
