//! Primitive bounding volumes and point/segment/polygon utilities
//!
//! Everything here is pure and allocation-free. Polygons are slices of
//! vertices in counter-clockwise order; the helpers tolerate either winding
//! where noted but never concave input.

use crate::foundation::math::{cross, dot, EPSILON, Vec2};
use super::shape::GeometryShape;

/// Axis-aligned bounding box in world coordinates
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Left edge
    pub min_x: f64,
    /// Top edge (smallest y)
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Bottom edge (largest y)
    pub max_y: f64,
}

impl Aabb {
    /// Create an AABB from its extremes
    ///
    /// # Panics
    /// Panics if a minimum is greater than its maximum.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        assert!(min_x <= max_x && min_y <= max_y, "invalid AABB: min > max");
        Self { min_x, min_y, max_x, max_y }
    }

    /// Builds the minimal AABB that contains all `points`.
    ///
    /// # Panics
    /// Panics if `points` is empty.
    pub fn from_points(points: &[Vec2]) -> Self {
        assert!(!points.is_empty(), "from_points requires at least one point");
        let mut aabb = Self {
            min_x: points[0].x,
            min_y: points[0].y,
            max_x: points[0].x,
            max_y: points[0].y,
        };
        for p in &points[1..] {
            aabb.min_x = aabb.min_x.min(p.x);
            aabb.min_y = aabb.min_y.min(p.y);
            aabb.max_x = aabb.max_x.max(p.x);
            aabb.max_y = aabb.max_y.max(p.y);
        }
        aabb
    }

    /// Bounding box of a world-space shape grown by `inflation` on every side.
    ///
    /// Never under-approximates, so the broad phase cannot miss a pair the
    /// narrow phase would accept. Negative inflation is treated as zero.
    pub fn from_geometry(shape: &GeometryShape, inflation: f64) -> Self {
        let inflation = inflation.max(0.0);
        match shape {
            GeometryShape::Circle { center, radius } => {
                let r = radius + inflation;
                Self {
                    min_x: center.x - r,
                    min_y: center.y - r,
                    max_x: center.x + r,
                    max_y: center.y + r,
                }
            }
            GeometryShape::Segment { a, b } => Self::from_points(&[*a, *b]).inflate(inflation),
            GeometryShape::Polygon { vertices } => Self::from_points(vertices).inflate(inflation),
        }
    }

    /// Grow the box by a uniform margin `m` in all directions
    pub fn inflate(&self, m: f64) -> Self {
        Self {
            min_x: self.min_x - m,
            min_y: self.min_y - m,
            max_x: self.max_x + m,
            max_y: self.max_y + m,
        }
    }

    /// Returns `true` if this AABB overlaps another (inclusive on edges)
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Check if this AABB contains a point (inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    /// Width of the box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Signed area of the triangle `(a, b, c)` times two; positive when counter-clockwise
#[inline]
pub fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    cross(b - a, c - a)
}

/// Projection parameter of `p` onto segment `ab`, clamped to `[0, 1]`
pub fn segment_parameter(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < EPSILON * EPSILON {
        return 0.0;
    }
    (dot(p - a, ab) / len_sq).clamp(0.0, 1.0)
}

/// Closest point to `p` on segment `ab`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    a + (b - a) * segment_parameter(p, a, b)
}

/// Distance from `p` to segment `ab`
pub fn distance_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    (p - closest_point_on_segment(p, a, b)).norm()
}

/// Whether `p` lies on segment `ab` within [`EPSILON`]
pub fn point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    distance_point_to_segment(p, a, b) <= EPSILON
}

/// Orientation-based segment intersection test, including collinear overlap
/// and endpoint touching.
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    let straddles = |u: f64, v: f64| (u > EPSILON && v < -EPSILON) || (u < -EPSILON && v > EPSILON);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1.abs() <= EPSILON && point_on_segment(p1, q1, q2))
        || (d2.abs() <= EPSILON && point_on_segment(p2, q1, q2))
        || (d3.abs() <= EPSILON && point_on_segment(q1, p1, p2))
        || (d4.abs() <= EPSILON && point_on_segment(q2, p1, p2))
        || point_on_segment(p1, q1, q2)
        || point_on_segment(p2, q1, q2)
        || point_on_segment(q1, p1, p2)
        || point_on_segment(q2, p1, p2)
}

/// A point shared by segments `p1p2` and `q1q2`, if they intersect.
///
/// Crossing segments report their crossing point; collinear overlaps report
/// the first overlapping endpoint in the order `q1, q2, p1, p2`.
pub fn segment_intersection_point(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> Option<Vec2> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = cross(r, s);

    if denom.abs() > EPSILON {
        let qp = q1 - p1;
        let t = cross(qp, s) / denom;
        let u = cross(qp, r) / denom;
        let range = -EPSILON..=1.0 + EPSILON;
        if range.contains(&t) && range.contains(&u) {
            return Some(p1 + r * t.clamp(0.0, 1.0));
        }
        // Near-parallel long segments can miss the parametric window but still touch
    }

    [(q1, p1, p2), (q2, p1, p2), (p1, q1, q2), (p2, q1, q2)]
        .into_iter()
        .find(|&(p, a, b)| point_on_segment(p, a, b))
        .map(|(p, _, _)| p)
}

/// Closest pair of points between segments `p1p2` and `q1q2`.
///
/// Returns `(point_on_p, point_on_q, distance)`. Intersecting segments yield
/// a shared point and zero distance; otherwise the globally closest of the
/// four endpoint-to-segment projections wins, first candidate on ties.
pub fn closest_points_between_segments(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> (Vec2, Vec2, f64) {
    if let Some(point) = segment_intersection_point(p1, p2, q1, q2) {
        return (point, point, 0.0);
    }

    let candidates = [
        (p1, closest_point_on_segment(p1, q1, q2)),
        (p2, closest_point_on_segment(p2, q1, q2)),
        (closest_point_on_segment(q1, p1, p2), q1),
        (closest_point_on_segment(q2, p1, p2), q2),
    ];

    let mut best = (candidates[0].0, candidates[0].1, (candidates[0].1 - candidates[0].0).norm());
    for &(on_p, on_q) in &candidates[1..] {
        let d = (on_q - on_p).norm();
        if d < best.2 {
            best = (on_p, on_q, d);
        }
    }
    best
}

/// Distance between two segments
pub fn distance_segment_to_segment(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> f64 {
    closest_points_between_segments(p1, p2, q1, q2).2
}

/// Vertex `index` of a polygon, wrapping around the end.
///
/// # Panics
/// Panics on an empty vertex list; that is malformed caller data.
#[inline]
pub fn wrapped_vertex(vertices: &[Vec2], index: usize) -> Vec2 {
    assert!(!vertices.is_empty(), "polygon has no vertices");
    vertices[index % vertices.len()]
}

/// Iterate the edges `(v[i], v[i+1])` of a closed polygon
pub fn polygon_edges(vertices: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    (0..vertices.len()).map(move |i| (vertices[i], wrapped_vertex(vertices, i + 1)))
}

/// Average of the polygon's vertices
///
/// # Panics
/// Panics on an empty vertex list.
pub fn polygon_centroid(vertices: &[Vec2]) -> Vec2 {
    assert!(!vertices.is_empty(), "polygon has no vertices");
    let sum = vertices.iter().fold(Vec2::zeros(), |acc, v| acc + v);
    sum / vertices.len() as f64
}

/// Signed area; positive for counter-clockwise winding
pub fn polygon_signed_area(vertices: &[Vec2]) -> f64 {
    polygon_edges(vertices).map(|(a, b)| cross(a, b)).sum::<f64>() * 0.5
}

/// Point-in-convex-polygon test with an inclusive [`EPSILON`] boundary.
///
/// Uses a consistent cross-product sign test around every edge, so either
/// winding is accepted. Zero-length edges are skipped.
pub fn point_in_convex_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    match vertices {
        [] => return false,
        [only] => return (point - only).norm() <= EPSILON,
        [a, b] => return point_on_segment(point, *a, *b),
        _ => {}
    }

    let mut has_positive = false;
    let mut has_negative = false;
    for (a, b) in polygon_edges(vertices) {
        let edge = b - a;
        let len = edge.norm();
        if len < EPSILON {
            continue;
        }
        // Signed distance of the point from the edge's supporting line
        let side = cross(edge, point - a) / len;
        if side > EPSILON {
            has_positive = true;
        } else if side < -EPSILON {
            has_negative = true;
        }
        if has_positive && has_negative {
            return false;
        }
    }
    true
}

/// Minimum distance from `point` to any polygon edge
pub fn distance_point_to_convex_polygon_edges(point: Vec2, vertices: &[Vec2]) -> f64 {
    closest_point_on_polygon_boundary(point, vertices).2
}

/// Closest boundary point of a polygon to `point`.
///
/// Returns `(point, edge_index, distance)` where edge `i` runs from vertex
/// `i` to vertex `i + 1`. The first edge wins ties.
///
/// # Panics
/// Panics on an empty vertex list.
pub fn closest_point_on_polygon_boundary(point: Vec2, vertices: &[Vec2]) -> (Vec2, usize, f64) {
    assert!(!vertices.is_empty(), "polygon has no vertices");
    let mut best = (vertices[0], 0, f64::INFINITY);
    for (i, (a, b)) in polygon_edges(vertices).enumerate() {
        let q = closest_point_on_segment(point, a, b);
        let d = (point - q).norm();
        if d < best.2 {
            best = (q, i, d);
        }
    }
    best
}

/// Outward unit normal of edge `ab` for a counter-clockwise polygon.
///
/// Returns the zero vector for a degenerate edge.
pub fn outward_normal(a: Vec2, b: Vec2) -> Vec2 {
    let edge = b - a;
    let len = edge.norm();
    if len < EPSILON {
        return Vec2::zeros();
    }
    Vec2::new(edge.y, -edge.x) / len
}
