// GeoJSON data model shared by the labeling and simplification code
use geo_types::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A `(x, y)` = `(longitude, latitude)` pair.
///
/// Decodes from any GeoJSON position array with at least two numbers; a third
/// (altitude) component is dropped. Encodes back as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Same point with the axes swapped, `(y, x)`.
    pub fn swapped(self) -> Self {
        Position { x: self.y, y: self.x }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [x, y, ..] => Ok(Position::new(*x, *y)),
            _ => Err(format!(
                "position needs at least 2 numbers, got {}",
                values.len()
            )),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position::new(x, y)
    }
}

impl From<Position> for Coord<f64> {
    fn from(p: Position) -> Self {
        Coord { x: p.x, y: p.y }
    }
}

impl From<Coord<f64>> for Position {
    fn from(c: Coord<f64>) -> Self {
        Position::new(c.x, c.y)
    }
}

/// Closed sequence of positions (first == last by convention).
pub type Ring = Vec<Position>;

/// Feature properties. Shared between a feature and anything derived from it.
pub type Properties = Arc<Map<String, Value>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    /// Exterior ring first, holes after.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// First position in document order, if the geometry has any.
    pub fn first_position(&self) -> Option<Position> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::MultiPoint(points) | Geometry::LineString(points) => points.first().copied(),
            Geometry::MultiLineString(lines) => lines.iter().flatten().next().copied(),
            Geometry::Polygon(rings) => rings.iter().flatten().next().copied(),
            Geometry::MultiPolygon(polygons) => polygons.iter().flatten().flatten().next().copied(),
        }
    }

    /// Every position of the geometry, rings and parts flattened.
    pub fn positions(&self) -> Box<dyn Iterator<Item = Position> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(*p)),
            Geometry::MultiPoint(points) | Geometry::LineString(points) => {
                Box::new(points.iter().copied())
            }
            Geometry::MultiLineString(lines) => Box::new(lines.iter().flatten().copied()),
            Geometry::Polygon(rings) => Box::new(rings.iter().flatten().copied()),
            Geometry::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten().copied())
            }
        }
    }

    pub fn point_count(&self) -> usize {
        self.positions().count()
    }
}

fn to_line_string(points: &[Position]) -> geo_types::LineString<f64> {
    points.iter().copied().map(Coord::from).collect()
}

fn to_polygon(rings: &[Ring]) -> geo_types::Polygon<f64> {
    match rings.split_first() {
        Some((exterior, holes)) => geo_types::Polygon::new(
            to_line_string(exterior),
            holes.iter().map(|h| to_line_string(h)).collect(),
        ),
        None => geo_types::Polygon::new(geo_types::LineString::new(Vec::new()), Vec::new()),
    }
}

impl From<&Geometry> for geo_types::Geometry<f64> {
    fn from(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Point(p) => geo_types::Point::from(Coord::from(*p)).into(),
            Geometry::MultiPoint(points) => geo_types::MultiPoint::from(
                points.iter().map(|p| geo_types::Point::from(Coord::from(*p))).collect::<Vec<_>>(),
            )
            .into(),
            Geometry::LineString(points) => to_line_string(points).into(),
            Geometry::MultiLineString(lines) => {
                geo_types::MultiLineString::new(lines.iter().map(|l| to_line_string(l)).collect())
                    .into()
            }
            Geometry::Polygon(rings) => to_polygon(rings).into(),
            Geometry::MultiPolygon(polygons) => {
                geo_types::MultiPolygon::new(polygons.iter().map(|p| to_polygon(p)).collect())
                    .into()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
    /// Any other members (e.g. `bbox`), carried through untouched.
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Feature {
            tag: FeatureTag::Feature,
            id: None,
            geometry: Some(geometry),
            properties: Some(Arc::new(properties)),
            foreign_members: Map::new(),
        }
    }

    /// Looks up a property, treating `null` like a missing key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties
            .as_ref()
            .and_then(|props| props.get(key))
            .filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    pub tag: FeatureCollectionTag,
    pub features: Vec<Feature>,
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            tag: FeatureCollectionTag::FeatureCollection,
            features,
            foreign_members: Map::new(),
        }
    }
}

/// Builds a ring from `(x, y)` tuples.
pub fn ring<I: IntoIterator<Item = (f64, f64)>>(points: I) -> Ring {
    points.into_iter().map(Position::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn position_drops_altitude() {
        let p: Position = serde_json::from_value(json!([139.7, 35.6, 12.0])).unwrap();
        assert_eq!(p, Position::new(139.7, 35.6));
        assert_eq!(serde_json::to_value(p).unwrap(), json!([139.7, 35.6]));
    }

    #[test]
    fn position_rejects_short_arrays() {
        assert!(serde_json::from_value::<Position>(json!([1.0])).is_err());
    }

    #[test]
    fn feature_decodes_polygon_and_keeps_foreign_members() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "bbox": [0, 0, 1, 1],
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
            },
            "properties": { "name": "a" }
        }))
        .unwrap();

        assert!(matches!(feature.geometry, Some(Geometry::Polygon(ref r)) if r[0].len() == 4));
        assert_eq!(feature.property("name"), Some(&json!("a")));
        assert!(feature.foreign_members.contains_key("bbox"));
    }

    #[test]
    fn null_geometry_and_properties_decode() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": null,
            "properties": null
        }))
        .unwrap();
        assert!(feature.geometry.is_none());
        assert!(feature.property("name").is_none());
    }

    #[test]
    fn first_position_walks_nested_parts() {
        let g = Geometry::MultiPolygon(vec![vec![], vec![ring([(3.0, 4.0), (5.0, 6.0)])]]);
        assert_eq!(g.first_position(), Some(Position::new(3.0, 4.0)));
        assert_eq!(g.point_count(), 2);
    }
}
