// Tolerance-driven simplification of polygon rings across a feature
// collection. Non-areal geometry passes through unchanged.
use geo::Simplify;
use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::models::{Feature, FeatureCollection, Geometry, Position, Ring};

/// Reduces a polyline to a subsequence of its points.
///
/// Implementations keep the first and last point, never add points, and
/// return the input unchanged when `tolerance` is not strictly positive. The
/// polyline is treated as open even when it is a closed ring, so keeping both
/// endpoints keeps the ring closed.
pub trait PolylineSimplifier {
    fn simplify_polyline(&self, points: &[Position], tolerance: f64) -> Vec<Position>;
}

fn is_reducible(points: &[Position], tolerance: f64) -> bool {
    points.len() > 2 && tolerance > 0.0
}

/// Ramer-Douglas-Peucker: a point survives only if it lies farther than
/// `tolerance` from the segment joining the kept points around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DouglasPeucker;

impl PolylineSimplifier for DouglasPeucker {
    fn simplify_polyline(&self, points: &[Position], tolerance: f64) -> Vec<Position> {
        if !is_reducible(points, tolerance) {
            return points.to_vec();
        }

        let line: LineString<f64> = points.iter().copied().map(Coord::from).collect();
        line.simplify(&tolerance)
            .into_iter()
            .map(Position::from)
            .collect()
    }
}

/// Drops every point within `tolerance` of the previously kept point. The
/// first and last points are always kept.
pub fn radial_distance(points: &[Position], tolerance: f64) -> Vec<Position> {
    if !is_reducible(points, tolerance) {
        return points.to_vec();
    }

    let tolerance_sq = tolerance * tolerance;
    let mut kept = Vec::with_capacity(points.len());
    let mut prev = points[0];
    kept.push(prev);

    for (i, &point) in points.iter().enumerate().skip(1) {
        let dist_sq = (point.x - prev.x).powi(2) + (point.y - prev.y).powi(2);
        if dist_sq > tolerance_sq {
            kept.push(point);
            prev = point;
        } else if i == points.len() - 1 {
            kept.push(point);
        }
    }

    kept
}

/// Radial-distance pre-pass followed by Douglas-Peucker. Cheaper on dense
/// input, slightly less faithful.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialThenDouglasPeucker;

impl PolylineSimplifier for RadialThenDouglasPeucker {
    fn simplify_polyline(&self, points: &[Position], tolerance: f64) -> Vec<Position> {
        DouglasPeucker.simplify_polyline(&radial_distance(points, tolerance), tolerance)
    }
}

/// The built-in strategies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Simplifier {
    #[default]
    HighQuality,
    Fast,
}

impl PolylineSimplifier for Simplifier {
    fn simplify_polyline(&self, points: &[Position], tolerance: f64) -> Vec<Position> {
        match self {
            Simplifier::HighQuality => DouglasPeucker.simplify_polyline(points, tolerance),
            Simplifier::Fast => RadialThenDouglasPeucker.simplify_polyline(points, tolerance),
        }
    }
}

fn simplify_rings<S: PolylineSimplifier + ?Sized>(rings: &[Ring], tolerance: f64, simplifier: &S) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| simplifier.simplify_polyline(ring, tolerance))
        .collect()
}

/// Simplifies every ring of a Polygon or MultiPolygon, keeping ring and part
/// order. Any other geometry comes back as an equal copy.
pub fn simplify_geometry<S: PolylineSimplifier + ?Sized>(
    geometry: &Geometry,
    tolerance: f64,
    simplifier: &S,
) -> Geometry {
    match geometry {
        Geometry::Polygon(rings) => Geometry::Polygon(simplify_rings(rings, tolerance, simplifier)),
        Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(
            polygons
                .iter()
                .map(|rings| simplify_rings(rings, tolerance, simplifier))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// New feature with simplified geometry. Properties are shared with the
/// source feature, not copied.
pub fn simplify_feature<S: PolylineSimplifier + ?Sized>(
    feature: &Feature,
    tolerance: f64,
    simplifier: &S,
) -> Feature {
    Feature {
        tag: feature.tag,
        id: feature.id.clone(),
        geometry: feature
            .geometry
            .as_ref()
            .map(|g| simplify_geometry(g, tolerance, simplifier)),
        properties: feature.properties.clone(),
        foreign_members: feature.foreign_members.clone(),
    }
}

pub fn simplify_with<S: PolylineSimplifier + ?Sized>(
    collection: &FeatureCollection,
    tolerance: f64,
    simplifier: &S,
) -> FeatureCollection {
    FeatureCollection {
        tag: collection.tag,
        features: collection
            .features
            .iter()
            .map(|f| simplify_feature(f, tolerance, simplifier))
            .collect(),
        foreign_members: collection.foreign_members.clone(),
    }
}

/// Simplifies a collection with Douglas-Peucker. The input is left untouched,
/// so it can be simplified again at another tolerance.
pub fn simplify(collection: &FeatureCollection, tolerance: f64) -> FeatureCollection {
    simplify_with(collection, tolerance, &DouglasPeucker)
}
