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

//! Defines the `RgbaColor` type used by style rules and the packing routine
//! that turns a color into a single shader-friendly float.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A color as written in style definitions: 0-255 RGB channels plus an
/// optional alpha channel in `[0, 1]`.
///
/// The alpha channel is optional because style documents in the wild carry
/// three-element arrays, or a fourth element that is not a number. Consumers
/// decide which default applies when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RgbaColor {
    /// The red channel, `0..=255`.
    pub r: f64,
    /// The green channel, `0..=255`.
    pub g: f64,
    /// The blue channel, `0..=255`.
    pub b: f64,
    /// The alpha channel, if the source provided a numeric one.
    pub a: Option<f64>,
}

/// The fallback color used when a feature has no style rule bound (`#006688`).
pub const DEFAULT_FEATURE_COLOR: RgbaColor = RgbaColor::rgb(0.0, 102.0, 136.0);

impl RgbaColor {
    /// Creates a color without an alpha channel.
    #[inline]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    /// Creates a color with an explicit alpha channel.
    #[inline]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: Some(a),
        }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`. Returns `None` on malformed input.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).ok().map(f64::from)
        };
        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if hex.len() == 8 {
            Some(channel(6..8)? / 255.0)
        } else {
            None
        };
        Some(Self { r, g, b, a })
    }

    /// Packs the RGB channels into one float: `r * 65536 + g * 256 + b`.
    ///
    /// Alpha is ignored; opacity travels as a separate attribute. Every
    /// 8-bit color fits exactly in the 24-bit mantissa of an `f32`.
    #[inline]
    pub fn packed(&self) -> f32 {
        (self.r * 65536.0 + self.g * 256.0 + self.b) as f32
    }
}

/// Free-function form of [`RgbaColor::packed`].
#[inline]
pub fn pack_color(color: &RgbaColor) -> f32 {
    color.packed()
}

/// Error returned when a style value cannot be read as a color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid color value: {}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl TryFrom<Value> for RgbaColor {
    type Error = ColorParseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match &value {
            Value::String(hex) => {
                Self::from_hex(hex).ok_or_else(|| ColorParseError(hex.clone()))
            }
            Value::Array(channels) if channels.len() >= 3 => {
                let rgb: Option<Vec<f64>> = channels[..3].iter().map(Value::as_f64).collect();
                let rgb = rgb.ok_or_else(|| ColorParseError(value.to_string()))?;
                Ok(Self {
                    r: rgb[0],
                    g: rgb[1],
                    b: rgb[2],
                    // A non-numeric fourth element is kept as "no alpha".
                    a: channels.get(3).and_then(Value::as_f64),
                })
            }
            _ => Err(ColorParseError(value.to_string())),
        }
    }
}

impl From<RgbaColor> for Value {
    fn from(color: RgbaColor) -> Self {
        let mut channels = vec![
            Value::from(color.r),
            Value::from(color.g),
            Value::from(color.b),
        ];
        if let Some(a) = color.a {
            channels.push(Value::from(a));
        }
        Value::Array(channels)
    }
}
