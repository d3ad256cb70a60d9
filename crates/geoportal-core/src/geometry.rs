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

//! Geometry helpers operating on GeoJSON geometry values.
//!
//! Features keep their geometry as a [`geojson::Value`] because loaded data
//! may carry a height component that only gets stripped during the transform
//! pipeline. Planar algorithms (region containment) go through `geo`.

use geo::Intersects;
use geo_types::{Coord, LineString, MultiPolygon, Polygon, Rect};
use geojson::Value;
use std::fmt;

/// The type tag of a feature geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    /// A single position.
    Point,
    /// A set of positions.
    MultiPoint,
    /// A polyline.
    LineString,
    /// A set of polylines.
    MultiLineString,
    /// A polygon with optional holes.
    Polygon,
    /// A set of polygons.
    MultiPolygon,
    /// A heterogeneous collection of geometries.
    GeometryCollection,
}

impl GeometryType {
    /// Returns the type tag of a GeoJSON geometry value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Point(_) => Self::Point,
            Value::MultiPoint(_) => Self::MultiPoint,
            Value::LineString(_) => Self::LineString,
            Value::MultiLineString(_) => Self::MultiLineString,
            Value::Polygon(_) => Self::Polygon,
            Value::MultiPolygon(_) => Self::MultiPolygon,
            Value::GeometryCollection(_) => Self::GeometryCollection,
        }
    }

    /// `true` for `Point` and `MultiPoint`, the types the point renderer handles.
    #[inline]
    pub fn is_point_like(self) -> bool {
        matches!(self, Self::Point | Self::MultiPoint)
    }

    /// The GeoJSON name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::MultiPoint => "MultiPoint",
            Self::LineString => "LineString",
            Self::MultiLineString => "MultiLineString",
            Self::Polygon => "Polygon",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visits every position of a geometry, in document order.
pub fn for_each_position(value: &Value, visit: &mut impl FnMut(&[f64])) {
    match value {
        Value::Point(p) => visit(p.as_slice()),
        Value::MultiPoint(line) | Value::LineString(line) => {
            line.iter().for_each(|p| visit(p.as_slice()))
        }
        Value::MultiLineString(rings) | Value::Polygon(rings) => {
            rings.iter().flatten().for_each(|p| visit(p.as_slice()))
        }
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .flatten()
            .for_each(|p| visit(p.as_slice())),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .for_each(|g| for_each_position(&g.value, visit)),
    }
}

/// Visits every position of `value`, recursing into collections.
fn for_each_position_mut(value: &mut Value, visit: &mut impl FnMut(&mut Vec<f64>)) {
    match value {
        Value::Point(p) => visit(p),
        Value::MultiPoint(line) | Value::LineString(line) => line.iter_mut().for_each(|p| visit(p)),
        Value::MultiLineString(rings) | Value::Polygon(rings) => {
            rings.iter_mut().flatten().for_each(|p| visit(p))
        }
        Value::MultiPolygon(polygons) => polygons
            .iter_mut()
            .flatten()
            .flatten()
            .for_each(|p| visit(p)),
        Value::GeometryCollection(geometries) => geometries
            .iter_mut()
            .for_each(|g| for_each_position_mut(&mut g.value, visit)),
    }
}

/// Truncates every position to its X/Y components. The geometry type is
/// left untouched. Returns the number of positions that lost components.
pub fn strip_to_xy(value: &mut Value) -> usize {
    let mut stripped = 0;
    for_each_position_mut(value, &mut |position| {
        if position.len() > 2 {
            position.truncate(2);
            stripped += 1;
        }
    });
    stripped
}

/// An axis-aligned bounding box `[min_x, min_y, max_x, max_y]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Minimum X.
    pub min_x: f64,
    /// Minimum Y.
    pub min_y: f64,
    /// Maximum X.
    pub max_x: f64,
    /// Maximum Y.
    pub max_y: f64,
}

impl Extent {
    /// Creates an extent from its corners.
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A zero-sized extent around a single coordinate.
    pub const fn from_coordinate(coordinate: [f64; 2]) -> Self {
        Self::new(coordinate[0], coordinate[1], coordinate[0], coordinate[1])
    }

    /// Computes the extent of a geometry. `None` when it has no usable position.
    pub fn of(value: &Value) -> Option<Self> {
        let mut extent: Option<Self> = None;
        for_each_position(value, &mut |position| {
            if let [x, y, ..] = position {
                match extent.as_mut() {
                    Some(e) => e.extend([*x, *y]),
                    None => extent = Some(Self::from_coordinate([*x, *y])),
                }
            }
        });
        extent
    }

    /// Grows the extent so it covers `coordinate`.
    pub fn extend(&mut self, coordinate: [f64; 2]) {
        self.min_x = self.min_x.min(coordinate[0]);
        self.min_y = self.min_y.min(coordinate[1]);
        self.max_x = self.max_x.max(coordinate[0]);
        self.max_y = self.max_y.max(coordinate[1]);
    }

    /// The center point of the extent.
    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        ]
    }

    /// Returns the extent grown by `distance` on every side.
    pub fn buffer(&self, distance: f64) -> Self {
        Self::new(
            self.min_x - distance,
            self.min_y - distance,
            self.max_x + distance,
            self.max_y + distance,
        )
    }

    /// Whether two extents overlap. Touching edges count as overlap.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Whether `coordinate` lies inside or on the boundary of the extent.
    pub fn contains_coordinate(&self, coordinate: [f64; 2]) -> bool {
        coordinate[0] >= self.min_x
            && coordinate[0] <= self.max_x
            && coordinate[1] >= self.min_y
            && coordinate[1] <= self.max_y
    }
}

/// Formats as `min_x,min_y,max_x,max_y`, the form WFS `bbox` parameters use.
impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// An error raised while building a [`BoundingRegion`].
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Only areal geometries can bound a region.
    Unsupported(GeometryType),
    /// The geometry has a ring without positions or a malformed position.
    Malformed(String),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Unsupported(kind) => {
                write!(f, "A {kind} geometry cannot be used as a bounding region")
            }
            GeometryError::Malformed(msg) => write!(f, "Malformed region geometry: {msg}"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// An areal geometry restricting which features are eligible for display.
///
/// Membership is tested on a single coordinate (a feature's extent center),
/// boundary inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingRegion {
    polygons: MultiPolygon<f64>,
    extent: Extent,
}

impl BoundingRegion {
    /// A rectangular region.
    pub fn from_extent(extent: Extent) -> Self {
        let rect = Rect::new(
            Coord {
                x: extent.min_x,
                y: extent.min_y,
            },
            Coord {
                x: extent.max_x,
                y: extent.max_y,
            },
        );
        Self {
            polygons: MultiPolygon::new(vec![rect.to_polygon()]),
            extent,
        }
    }

    /// Builds a region from a `Polygon` or `MultiPolygon` GeoJSON value.
    pub fn from_geojson(value: &Value) -> Result<Self, GeometryError> {
        let polygons = match value {
            Value::Polygon(rings) => vec![polygon_from_rings(rings)?],
            Value::MultiPolygon(parts) => parts
                .iter()
                .map(|rings| polygon_from_rings(rings))
                .collect::<Result<Vec<_>, _>>()?,
            other => return Err(GeometryError::Unsupported(GeometryType::of(other))),
        };
        let extent = Extent::of(value)
            .ok_or_else(|| GeometryError::Malformed("region has no positions".into()))?;
        Ok(Self {
            polygons: MultiPolygon::new(polygons),
            extent,
        })
    }

    /// The bounding box of the region.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Whether `coordinate` lies inside or on the boundary of the region.
    pub fn intersects_coordinate(&self, coordinate: [f64; 2]) -> bool {
        if !self.extent.contains_coordinate(coordinate) {
            return false;
        }
        let coord = Coord {
            x: coordinate[0],
            y: coordinate[1],
        };
        self.polygons.0.iter().any(|polygon| polygon.intersects(&coord))
    }
}

fn ring_from_positions(ring: &[Vec<f64>]) -> Result<LineString<f64>, GeometryError> {
    ring.iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            other => Err(GeometryError::Malformed(format!(
                "position with {} components",
                other.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// The first ring is the exterior, the rest are holes.
fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>, GeometryError> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or_else(|| GeometryError::Malformed("polygon without rings".into()))?;
    let interiors = interiors
        .iter()
        .map(|ring| ring_from_positions(ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(ring_from_positions(exterior)?, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Value {
        Value::Polygon(vec![vec![
            vec![min, min],
            vec![max, min],
            vec![max, max],
            vec![min, max],
            vec![min, min],
        ]])
    }

    #[test]
    fn test_geometry_type_point_like() {
        assert!(GeometryType::of(&Value::Point(vec![0.0, 0.0])).is_point_like());
        assert!(GeometryType::of(&Value::MultiPoint(vec![vec![0.0, 0.0]])).is_point_like());
        assert!(!GeometryType::of(&square(0.0, 1.0)).is_point_like());
    }

    #[test]
    fn test_extent_of_polygon() {
        let extent = Extent::of(&square(1.0, 2.0)).unwrap();
        assert_eq!(extent, Extent::new(1.0, 1.0, 2.0, 2.0));
        assert_eq!(extent.center(), [1.5, 1.5]);
        assert_eq!(extent.to_string(), "1,1,2,2");
    }

    #[test]
    fn test_extent_of_empty_geometry_is_none() {
        assert!(Extent::of(&Value::MultiPoint(vec![])).is_none());
    }

    #[test]
    fn test_strip_to_xy_keeps_type() {
        let mut value = Value::Polygon(vec![vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ]]);
        assert_eq!(strip_to_xy(&mut value), 5);
        assert_eq!(GeometryType::of(&value), GeometryType::Polygon);
        let mut dims = Vec::new();
        for_each_position(&value, &mut |p| dims.push(p.len()));
        assert!(dims.iter().all(|&d| d == 2));
        assert_eq!(strip_to_xy(&mut value), 0);
    }

    #[test]
    fn test_buffered_extents_intersect() {
        let hit = Extent::from_coordinate([0.0, 0.0]).buffer(1.0);
        assert!(hit.intersects(&Extent::new(0.5, 0.5, 3.0, 3.0)));
        assert!(hit.intersects(&Extent::new(1.0, 1.0, 3.0, 3.0)));
        assert!(!hit.intersects(&Extent::new(1.1, 1.1, 3.0, 3.0)));
    }

    #[test]
    fn test_region_contains_center_inclusive() {
        let region = BoundingRegion::from_geojson(&square(0.0, 1.0)).unwrap();
        assert!(region.intersects_coordinate([0.5, 0.5]));
        assert!(region.intersects_coordinate([1.0, 0.5]));
        assert!(!region.intersects_coordinate([1.5, 1.5]));
    }

    #[test]
    fn test_region_from_extent() {
        let region = BoundingRegion::from_extent(Extent::new(0.0, 0.0, 10.0, 5.0));
        assert!(region.intersects_coordinate([9.0, 4.0]));
        assert!(!region.intersects_coordinate([9.0, 6.0]));
    }

    #[test]
    fn test_region_rejects_points() {
        let err = BoundingRegion::from_geojson(&Value::Point(vec![0.0, 0.0])).unwrap_err();
        assert_eq!(err, GeometryError::Unsupported(GeometryType::Point));
    }
}
