//! Boolean overlap tests for every pair of shape kinds
//!
//! Segments are tested as capsules of the supplied radius. Every test treats
//! shapes within [`EPSILON`] of touching as overlapping, matching the
//! manifold generator so that `intersects` and `manifold.is_some()` agree.

use crate::foundation::math::{dot, EPSILON, Vec2};
use super::primitives::{
    distance_point_to_convex_polygon_edges, distance_point_to_segment, distance_segment_to_segment,
    outward_normal, point_in_convex_polygon, polygon_edges, segments_intersect,
};
use super::shape::GeometryShape;

/// Interval of a shape projected onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Minimum projected value
    pub min: f64,
    /// Maximum projected value
    pub max: f64,
}

impl Projection {
    /// Project a polygon onto `axis`
    ///
    /// # Panics
    /// Panics on an empty vertex list.
    pub fn project(vertices: &[Vec2], axis: Vec2) -> Self {
        assert!(!vertices.is_empty(), "polygon has no vertices");
        let first = dot(vertices[0], axis);
        vertices[1..].iter().fold(Self { min: first, max: first }, |acc, v| {
            let p = dot(*v, axis);
            Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            }
        })
    }

    /// Signed overlap with another interval; negative when separated
    pub fn overlap(&self, other: &Self) -> f64 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// Whether the intervals are apart by more than [`EPSILON`]
    pub fn separated(&self, other: &Self) -> bool {
        self.overlap(other) < -EPSILON
    }
}

/// Unit edge normals of a polygon, skipping degenerate edges
pub fn edge_axes(vertices: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    polygon_edges(vertices)
        .map(|(a, b)| outward_normal(a, b))
        .filter(|n| n.norm_squared() > 0.0)
}

/// Circle–circle overlap
pub fn circles_intersect(center_a: Vec2, radius_a: f64, center_b: Vec2, radius_b: f64) -> bool {
    (center_b - center_a).norm() <= radius_a + radius_b + EPSILON
}

/// Capsule–circle overlap
pub fn segment_circle_intersect(a: Vec2, b: Vec2, capsule_radius: f64, center: Vec2, radius: f64) -> bool {
    distance_point_to_segment(center, a, b) <= radius + capsule_radius + EPSILON
}

/// Convex polygon overlap by the Separating Axis Theorem
///
/// The union of both polygons' edge normals is tested; the shapes overlap
/// only if their projections overlap on every axis.
pub fn polygons_intersect(vertices_a: &[Vec2], vertices_b: &[Vec2]) -> bool {
    edge_axes(vertices_a).chain(edge_axes(vertices_b)).all(|axis| {
        let pa = Projection::project(vertices_a, axis);
        let pb = Projection::project(vertices_b, axis);
        !pa.separated(&pb)
    })
}

/// Capsule–polygon overlap
pub fn segment_polygon_intersect(a: Vec2, b: Vec2, vertices: &[Vec2], capsule_radius: f64) -> bool {
    if polygon_edges(vertices).any(|(p, q)| segments_intersect(a, b, p, q)) {
        return true;
    }
    if point_in_convex_polygon(a, vertices) || point_in_convex_polygon(b, vertices) {
        return true;
    }
    polygon_edges(vertices)
        .any(|(p, q)| distance_segment_to_segment(a, b, p, q) <= capsule_radius + EPSILON)
}

/// Circle–polygon overlap
pub fn circle_polygon_intersect(center: Vec2, radius: f64, vertices: &[Vec2]) -> bool {
    point_in_convex_polygon(center, vertices)
        || distance_point_to_convex_polygon_edges(center, vertices) <= radius + EPSILON
}

/// Capsule–capsule overlap; both capsules share `capsule_radius`
pub fn segments_intersect_capsule(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2, capsule_radius: f64) -> bool {
    segments_intersect(p1, p2, q1, q2)
        || distance_segment_to_segment(p1, p2, q1, q2) <= 2.0 * capsule_radius + EPSILON
}

/// Test if two world-space shapes overlap, segments inflated by `line_radius`
pub fn shapes_intersect(shape_a: &GeometryShape, shape_b: &GeometryShape, line_radius: f64) -> bool {
    use GeometryShape::{Circle, Polygon, Segment};

    match (shape_a, shape_b) {
        (Circle { center: ca, radius: ra }, Circle { center: cb, radius: rb }) => {
            circles_intersect(*ca, *ra, *cb, *rb)
        }
        (Segment { a, b }, Circle { center, radius }) | (Circle { center, radius }, Segment { a, b }) => {
            segment_circle_intersect(*a, *b, line_radius, *center, *radius)
        }
        (Circle { center, radius }, Polygon { vertices })
        | (Polygon { vertices }, Circle { center, radius }) => {
            circle_polygon_intersect(*center, *radius, vertices)
        }
        (Segment { a: p1, b: p2 }, Segment { a: q1, b: q2 }) => {
            segments_intersect_capsule(*p1, *p2, *q1, *q2, line_radius)
        }
        (Segment { a, b }, Polygon { vertices }) | (Polygon { vertices }, Segment { a, b }) => {
            segment_polygon_intersect(*a, *b, vertices, line_radius)
        }
        (Polygon { vertices: va }, Polygon { vertices: vb }) => polygons_intersect(va, vb),
    }
}
