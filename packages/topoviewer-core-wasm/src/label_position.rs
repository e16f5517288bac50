// Label anchor placement: an approximate pole of inaccessibility found by a
// coarse grid scan over the exterior bounds and one finer scan that follows
// the best point as it moves.
use geo::BoundingRect;

use crate::models::{Feature, Geometry, Position, Ring};
use crate::polygon_ops::{point_in_polygon, point_to_boundary_distance, ring_bounds, ring_signed_area};

// Coarse cell = min(width, height) / GRID_DIVISIONS
const GRID_DIVISIONS: f64 = 20.0;
// Fine step = coarse cell / FINE_DIVISIONS
const FINE_DIVISIONS: f64 = 4.0;

const MIN_FONT_SIZE: f64 = 2.0;
const MAX_FONT_SIZE: f64 = 18.0;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist: f64,
    point: Option<Position>,
}

impl Candidate {
    // Scores `p` if it is inside; only a strictly larger distance replaces
    // the current point.
    fn consider(&mut self, p: Position, rings: &[Ring]) {
        if point_in_polygon(p, rings) {
            let dist = point_to_boundary_distance(p, rings);
            if dist > self.dist {
                self.dist = dist;
                self.point = Some(p);
            }
        }
    }
}

// Next grid coordinate, `None` once the step no longer moves it.
fn advance(value: f64, step: f64) -> Option<f64> {
    let next = value + step;
    (next != value).then_some(next)
}

// Walks x (outer) then y (inner) over the bounds inclusive, accumulating
// the step.
fn coarse_scan(rings: &[Ring], from: Position, to: Position, step: f64, best: &mut Candidate) {
    let mut x = from.x;
    while x <= to.x {
        let mut y = from.y;
        while y <= to.y {
            best.consider(Position::new(x, y), rings);
            let Some(next) = advance(y, step) else { break };
            y = next;
        }
        let Some(next) = advance(x, step) else { break };
        x = next;
    }
}

// Scans `cell` either side of the coarse winner. The window tracks the
// current best point: the x limit is re-read on every column, and each
// column's y range is taken from the best point at the time it starts and
// its y limit re-read on every row. Only the first column is pinned to the
// coarse winner.
fn fine_scan(rings: &[Ring], coarse: Position, cell: f64, best: &mut Candidate) {
    let step = cell / FINE_DIVISIONS;
    let anchor = |best: &Candidate| best.point.unwrap_or(coarse);

    let mut x = coarse.x - cell;
    while x <= anchor(best).x + cell {
        let mut y = anchor(best).y - cell;
        while y <= anchor(best).y + cell {
            best.consider(Position::new(x, y), rings);
            let Some(next) = advance(y, step) else { break };
            y = next;
        }
        let Some(next) = advance(x, step) else { break };
        x = next;
    }
}

/// Label position for a polygon given as GeoJSON rings (exterior first).
///
/// Returns `None` for a missing or short (< 3 points) exterior ring, for a
/// bounding box with no extent in its smaller dimension, and when no grid
/// point lands inside the polygon. The result is in `(lat, lon)` order, i.e.
/// `(y, x)` of the input coordinates.
pub fn label_position_for_polygon(rings: &[Ring]) -> Option<Position> {
    let exterior = rings.first().filter(|ring| ring.len() >= 3)?;
    let bounds = ring_bounds(exterior)?;

    let cell = bounds.width().min(bounds.height()) / GRID_DIVISIONS;
    if cell == 0.0 {
        return None;
    }

    let mut best = Candidate { dist: 0.0, point: None };
    coarse_scan(rings, bounds.min().into(), bounds.max().into(), cell, &mut best);
    let coarse = best.point?;

    fine_scan(rings, coarse, cell, &mut best);

    best.point.map(Position::swapped)
}

// Picks the part with the largest positive signed exterior area among parts
// that have a label position at all.
fn label_position_for_multi_polygon(polygons: &[Vec<Ring>]) -> Option<Position> {
    let mut max_area = 0.0;
    let mut best = None;

    for rings in polygons {
        let Some(position) = label_position_for_polygon(rings) else {
            continue;
        };
        let area = ring_signed_area(&rings[0]);
        if area > max_area {
            max_area = area;
            best = Some(position);
        }
    }

    best
}

/// Label position for a feature, `(lat, lon)` ordered.
///
/// Only areal geometry gets a label; points, lines and features without a
/// geometry return `None`.
pub fn label_position_for_feature(feature: &Feature) -> Option<Position> {
    match feature.geometry.as_ref()? {
        Geometry::Polygon(rings) => label_position_for_polygon(rings),
        Geometry::MultiPolygon(polygons) => label_position_for_multi_polygon(polygons),
        _ => None,
    }
}

/// Centre of the geometry's bounding rectangle, `(lat, lon)` ordered.
pub fn bounds_center(geometry: &Geometry) -> Option<Position> {
    let geometry: geo_types::Geometry<f64> = geometry.into();
    geometry
        .bounding_rect()
        .map(|rect| Position::from(rect.center()).swapped())
}

/// Where to draw a feature's label: the interior label position when there is
/// one, otherwise the centre of the feature's bounds.
pub fn label_anchor(feature: &Feature) -> Option<Position> {
    label_position_for_feature(feature)
        .or_else(|| feature.geometry.as_ref().and_then(bounds_center))
}

/// Label font size in pixels for a map zoom level.
pub fn font_size_for_zoom(zoom: f64) -> f64 {
    let t = ((zoom - 2.0) / 16.0).clamp(0.0, 1.0);
    (3.0 + 14.0 * t.powi(2)).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}
