// Point / polygon primitives used by label placement.
//
// Rings are GeoJSON rings: index 0 is the exterior, the rest are holes.
use geo_types::{coord, Rect};

use crate::models::{Position, Ring};

/// Even-odd ray casting against a single ring. The ring is treated as
/// implicitly closed, so an explicit closing point is optional.
pub fn ring_contains(point: Position, ring: &[Position]) -> bool {
    let (px, py) = (point.x, point.y);
    let n = ring.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);

        let crosses = ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi);
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Point-in-polygon with hole subtraction.
///
/// Inside the exterior ring and outside every hole. Points exactly on an edge
/// get whatever the ray casting arithmetic gives them.
pub fn point_in_polygon(point: Position, rings: &[Ring]) -> bool {
    let Some((exterior, holes)) = rings.split_first() else {
        return false;
    };

    ring_contains(point, exterior) && !holes.iter().any(|hole| ring_contains(point, hole))
}

/// Squared distance from `point` to the segment `a`-`b`.
pub fn point_to_segment_distance_sq(point: Position, a: Position, b: Position) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    // Zero-length segment: distance to the single point
    let t = if len_sq > 0.0 {
        (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let closest_x = a.x + t * dx;
    let closest_y = a.y + t * dy;
    (point.x - closest_x).powi(2) + (point.y - closest_y).powi(2)
}

/// Minimum distance from `point` to any segment of any ring.
///
/// Exterior and holes are all boundary here; the value is unsigned and only
/// meaningful as a score for points already known to be inside. Segments are
/// consecutive pairs, so a ring must be explicitly closed for its closing edge
/// to count. With no segments at all the result is `f64::INFINITY`.
pub fn point_to_boundary_distance(point: Position, rings: &[Ring]) -> f64 {
    rings
        .iter()
        .flat_map(|ring| ring.windows(2))
        .map(|seg| point_to_segment_distance_sq(point, seg[0], seg[1]))
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

/// Axis-aligned bounds of a ring, `None` when empty.
pub fn ring_bounds(ring: &[Position]) -> Option<Rect<f64>> {
    if ring.is_empty() {
        return None;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in ring {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y }))
}

/// Signed shoelace area of a ring.
///
/// Accumulates `(x_j + x_i) * (y_j - y_i)` over each edge from the previous
/// vertex `j` to vertex `i` (wrapping), then halves it. With this ordering a
/// clockwise ring (the TopoJSON exterior winding) comes out positive.
pub fn ring_signed_area(ring: &[Position]) -> f64 {
    let n = ring.len();
    if n == 0 {
        return 0.0;
    }

    let mut area = 0.0;
    let mut j = n - 1;
    for i in 0..n {
        area += (ring[j].x + ring[i].x) * (ring[j].y - ring[i].y);
        j = i;
    }
    area / 2.0
}
