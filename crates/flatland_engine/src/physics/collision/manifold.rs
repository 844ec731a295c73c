//! Narrow-phase contact manifolds
//!
//! Every pair is evaluated in a canonical orientation (segment before circle
//! before polygon, lower entity id first for equal kinds) and inverted when
//! the caller asked for the other order. This makes `manifold(a, b)` and
//! `manifold(b, a)` exact mirrors of each other, down to the last bit.

use crate::core::config::CollisionConfig;
use crate::foundation::math::{dot, perp, EPSILON, Vec2};
use super::contact::{
    polygon_support_center, polygon_support_feature, refine_triangle_feature, segment_endpoint_feature,
    SupportFeature,
};
use super::intersection::{edge_axes, Projection};
use super::primitives::{
    closest_point_on_polygon_boundary, closest_points_between_segments, closest_point_on_segment,
    outward_normal, point_in_convex_polygon, polygon_centroid, polygon_edges, wrapped_vertex,
};
use super::shape::GeometryShape;
use super::EntityId;

/// Contact description for one overlapping pair
///
/// `normal` is a unit vector pointing from A toward B: translating B along it
/// by `penetration` separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionManifold {
    /// Unit separation direction from A to B
    pub normal: Vec2,
    /// Overlap depth along the normal, never negative
    pub penetration: f64,
    /// World-space contact point
    pub contact_point: Vec2,
    /// Feature of A in contact
    pub feature_a: SupportFeature,
    /// Feature of B in contact
    pub feature_b: SupportFeature,
    /// Approach speed along the normal; zero until velocities are applied
    pub closing_speed: f64,
}

impl CollisionManifold {
    /// The same contact seen from B
    pub fn inverted(&self) -> Self {
        Self {
            normal: -self.normal,
            penetration: self.penetration,
            contact_point: self.contact_point,
            feature_a: self.feature_b,
            feature_b: self.feature_a,
            closing_speed: self.closing_speed,
        }
    }

    /// Fill in `closing_speed` from the bodies' velocities
    pub fn with_closing_speed(mut self, velocity_a: Vec2, velocity_b: Vec2) -> Self {
        self.closing_speed = dot(velocity_a - velocity_b, self.normal).max(0.0);
        self
    }
}

/// Per-pair inputs of the manifold generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifoldContext {
    /// Entity owning shape A
    pub id_a: EntityId,
    /// Entity owning shape B
    pub id_b: EntityId,
    /// Capsule radius of segments
    pub line_radius: f64,
    /// Support-point tolerance, scaled by shape size
    pub support_epsilon: f64,
}

impl ManifoldContext {
    /// Context for the pair `(id_a, id_b)` using the configured tolerances
    pub fn new(id_a: EntityId, id_b: EntityId, config: &CollisionConfig) -> Self {
        Self {
            id_a,
            id_b,
            line_radius: config.line_radius,
            support_epsilon: config.support_epsilon,
        }
    }

    fn swapped(&self) -> Self {
        Self {
            id_a: self.id_b,
            id_b: self.id_a,
            ..*self
        }
    }
}

/// Compute the contact manifold of two world-space shapes.
///
/// Returns `None` when the shapes do not overlap (segments are capsules of
/// `ctx.line_radius`). Shapes within [`EPSILON`] of touching produce a
/// manifold with zero penetration.
pub fn compute_manifold(
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Option<CollisionManifold> {
    use GeometryShape::{Circle, Polygon, Segment};

    let reversed = || compute_manifold(shape_b, shape_a, &ctx.swapped()).map(|m| m.inverted());

    match (shape_a, shape_b) {
        (Segment { a: p1, b: p2 }, Segment { a: q1, b: q2 }) => {
            if ctx.id_a <= ctx.id_b {
                segment_segment(*p1, *p2, *q1, *q2, shape_a, shape_b, ctx)
            } else {
                reversed()
            }
        }
        (Segment { a, b }, Circle { center, radius }) => {
            segment_circle(*a, *b, *center, *radius, shape_a, shape_b, ctx)
        }
        (Segment { a, b }, Polygon { vertices }) => segment_polygon(*a, *b, vertices, shape_a, shape_b, ctx),
        (Circle { center: ca, radius: ra }, Circle { center: cb, radius: rb }) => {
            if ctx.id_a <= ctx.id_b {
                circle_circle(*ca, *ra, *cb, *rb, shape_a, shape_b, ctx)
            } else {
                reversed()
            }
        }
        (Circle { center, radius }, Polygon { vertices }) => {
            circle_polygon(*center, *radius, vertices, shape_a, shape_b, ctx)
        }
        (Polygon { vertices: va }, Polygon { vertices: vb }) => {
            if ctx.id_a <= ctx.id_b {
                polygon_polygon(va, vb, shape_a, shape_b, ctx)
            } else {
                reversed()
            }
        }
        (Circle { .. }, Segment { .. }) | (Polygon { .. }, Segment { .. }) | (Polygon { .. }, Circle { .. }) => {
            reversed()
        }
    }
}

/// Normal used when the geometry gives no direction (coincident centers, zero distance).
///
/// Tries centroid to centroid, then the perpendicular of a segment oriented
/// toward the other shape, then ±X decided by entity id.
fn fallback_normal(shape_a: &GeometryShape, shape_b: &GeometryShape, ctx: &ManifoldContext) -> Vec2 {
    let between = shape_b.centroid() - shape_a.centroid();
    let len = between.norm();
    if len > EPSILON {
        return between / len;
    }

    let segment_axis = match (shape_a, shape_b) {
        (GeometryShape::Segment { a, b }, _) | (_, GeometryShape::Segment { a, b }) => Some(b - a),
        _ => None,
    };
    if let Some(axis) = segment_axis.filter(|axis| axis.norm() > EPSILON) {
        let n = perp(axis).normalize();
        return if dot(n, between) < 0.0 { -n } else { n };
    }

    log::trace!(
        "Degenerate contact between {} and {}, using fixed axis",
        ctx.id_a,
        ctx.id_b
    );
    if ctx.id_a <= ctx.id_b {
        Vec2::new(1.0, 0.0)
    } else {
        Vec2::new(-1.0, 0.0)
    }
}

/// Unit direction of `delta`, or the fallback when it is too short
fn direction_or_fallback(
    delta: Vec2,
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Vec2 {
    let len = delta.norm();
    if len > EPSILON {
        delta / len
    } else {
        fallback_normal(shape_a, shape_b, ctx)
    }
}

/// Polygon feature facing `direction`, refined for triangle tips
fn polygon_feature(vertices: &[Vec2], direction: Vec2, contact_point: Vec2, ctx: &ManifoldContext) -> SupportFeature {
    let feature = polygon_support_feature(vertices, direction, ctx.support_epsilon);
    refine_triangle_feature(vertices, feature, contact_point)
}

fn circle_circle(
    center_a: Vec2,
    radius_a: f64,
    center_b: Vec2,
    radius_b: f64,
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Option<CollisionManifold> {
    let delta = center_b - center_a;
    let dist = delta.norm();
    if dist > radius_a + radius_b + EPSILON {
        return None;
    }

    let normal = direction_or_fallback(delta, shape_a, shape_b, ctx);
    let surface_a = center_a + normal * radius_a;
    let surface_b = center_b - normal * radius_b;

    Some(CollisionManifold {
        normal,
        penetration: (radius_a + radius_b - dist).max(0.0),
        contact_point: (surface_a + surface_b) * 0.5,
        feature_a: SupportFeature::Circle,
        feature_b: SupportFeature::Circle,
        closing_speed: 0.0,
    })
}

fn segment_circle(
    a: Vec2,
    b: Vec2,
    center: Vec2,
    radius: f64,
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Option<CollisionManifold> {
    let r = ctx.line_radius;
    let q = closest_point_on_segment(center, a, b);
    let dist = (center - q).norm();
    if dist > r + radius + EPSILON {
        return None;
    }

    let normal = direction_or_fallback(center - q, shape_a, shape_b, ctx);
    let contact_point = ((q + normal * r) + (center - normal * radius)) * 0.5;

    Some(CollisionManifold {
        normal,
        penetration: (r + radius - dist).max(0.0),
        contact_point,
        feature_a: segment_endpoint_feature(a, b, contact_point),
        feature_b: SupportFeature::Circle,
        closing_speed: 0.0,
    })
}

fn segment_segment(
    p1: Vec2,
    p2: Vec2,
    q1: Vec2,
    q2: Vec2,
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Option<CollisionManifold> {
    let r = ctx.line_radius;
    let (on_p, on_q, dist) = closest_points_between_segments(p1, p2, q1, q2);
    if dist > 2.0 * r + EPSILON {
        return None;
    }

    let normal = direction_or_fallback(on_q - on_p, shape_a, shape_b, ctx);
    let contact_point = ((on_p + normal * r) + (on_q - normal * r)) * 0.5;

    Some(CollisionManifold {
        normal,
        penetration: (2.0 * r - dist).max(0.0),
        contact_point,
        feature_a: segment_endpoint_feature(p1, p2, contact_point),
        feature_b: segment_endpoint_feature(q1, q2, contact_point),
        closing_speed: 0.0,
    })
}

fn segment_polygon(
    a: Vec2,
    b: Vec2,
    vertices: &[Vec2],
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Option<CollisionManifold> {
    let r = ctx.line_radius;

    // Deepest endpoint buried in the polygon, endpoint 0 on ties
    let mut buried: Option<(Vec2, usize, f64)> = None;
    for endpoint in [a, b] {
        if !point_in_convex_polygon(endpoint, vertices) {
            continue;
        }
        let (_, edge, depth) = closest_point_on_polygon_boundary(endpoint, vertices);
        if buried.map_or(true, |(_, _, best)| depth > best) {
            buried = Some((endpoint, edge, depth));
        }
    }

    if let Some((endpoint, edge, depth)) = buried {
        let edge_normal = outward_normal(vertices[edge], wrapped_vertex(vertices, edge + 1));
        let normal = if edge_normal.norm() > 0.0 {
            -edge_normal
        } else {
            fallback_normal(shape_a, shape_b, ctx)
        };
        return Some(CollisionManifold {
            normal,
            penetration: depth + r,
            contact_point: endpoint,
            feature_a: segment_endpoint_feature(a, b, endpoint),
            feature_b: polygon_feature(vertices, -normal, endpoint, ctx),
            closing_speed: 0.0,
        });
    }

    let mut closest: Option<(Vec2, Vec2, f64)> = None;
    for (p, q) in polygon_edges(vertices) {
        let candidate = closest_points_between_segments(a, b, p, q);
        if closest.map_or(true, |(_, _, best)| candidate.2 < best) {
            closest = Some(candidate);
        }
    }
    let (on_segment, on_polygon, dist) = closest?;
    if dist > r + EPSILON {
        return None;
    }

    let normal = direction_or_fallback(on_polygon - on_segment, shape_a, shape_b, ctx);
    let contact_point = ((on_segment + normal * r) + on_polygon) * 0.5;

    Some(CollisionManifold {
        normal,
        penetration: (r - dist).max(0.0),
        contact_point,
        feature_a: segment_endpoint_feature(a, b, contact_point),
        feature_b: polygon_feature(vertices, -normal, contact_point, ctx),
        closing_speed: 0.0,
    })
}

fn circle_polygon(
    center: Vec2,
    radius: f64,
    vertices: &[Vec2],
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Option<CollisionManifold> {
    let (q, edge, dist) = closest_point_on_polygon_boundary(center, vertices);

    if point_in_convex_polygon(center, vertices) {
        let edge_normal = outward_normal(vertices[edge], wrapped_vertex(vertices, edge + 1));
        let normal = if edge_normal.norm() > 0.0 {
            -edge_normal
        } else {
            fallback_normal(shape_a, shape_b, ctx)
        };
        return Some(CollisionManifold {
            normal,
            penetration: radius + dist,
            contact_point: q,
            feature_a: SupportFeature::Circle,
            feature_b: polygon_feature(vertices, -normal, q, ctx),
            closing_speed: 0.0,
        });
    }

    if dist > radius + EPSILON {
        return None;
    }

    let normal = direction_or_fallback(q - center, shape_a, shape_b, ctx);
    let contact_point = ((center + normal * radius) + q) * 0.5;

    Some(CollisionManifold {
        normal,
        penetration: (radius - dist).max(0.0),
        contact_point,
        feature_a: SupportFeature::Circle,
        feature_b: polygon_feature(vertices, -normal, contact_point, ctx),
        closing_speed: 0.0,
    })
}

fn polygon_polygon(
    vertices_a: &[Vec2],
    vertices_b: &[Vec2],
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    ctx: &ManifoldContext,
) -> Option<CollisionManifold> {
    // Minimum-overlap axis over both polygons' edge normals; first axis wins ties
    let mut best: Option<(Vec2, f64)> = None;
    for axis in edge_axes(vertices_a).chain(edge_axes(vertices_b)) {
        let pa = Projection::project(vertices_a, axis);
        let pb = Projection::project(vertices_b, axis);
        if pa.separated(&pb) {
            return None;
        }
        let overlap = pa.overlap(&pb);
        if best.map_or(true, |(_, smallest)| overlap < smallest) {
            best = Some((axis, overlap));
        }
    }

    let (axis, overlap) = match best {
        Some(found) => found,
        None => (fallback_normal(shape_a, shape_b, ctx), 0.0),
    };
    let towards_b = polygon_centroid(vertices_b) - polygon_centroid(vertices_a);
    let normal = if dot(axis, towards_b) < 0.0 { -axis } else { axis };

    let support_a = polygon_support_feature(vertices_a, normal, ctx.support_epsilon);
    let support_b = polygon_support_feature(vertices_b, -normal, ctx.support_epsilon);
    let contact_point = match (support_a, support_b) {
        (SupportFeature::Vertex(i), feature) if !matches!(feature, SupportFeature::Vertex(_)) => vertices_a[i],
        (feature, SupportFeature::Vertex(j)) if !matches!(feature, SupportFeature::Vertex(_)) => vertices_b[j],
        _ => {
            let center_a = polygon_support_center(vertices_a, normal, ctx.support_epsilon);
            let center_b = polygon_support_center(vertices_b, -normal, ctx.support_epsilon);
            (center_a + center_b) * 0.5
        }
    };

    Some(CollisionManifold {
        normal,
        penetration: overlap.max(0.0),
        contact_point,
        feature_a: refine_triangle_feature(vertices_a, support_a, contact_point),
        feature_b: refine_triangle_feature(vertices_b, support_b, contact_point),
        closing_speed: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ctx(id_a: EntityId, id_b: EntityId) -> ManifoldContext {
        ManifoldContext {
            id_a,
            id_b,
            line_radius: 1.0,
            support_epsilon: 1e-3,
        }
    }

    fn circle(x: f64, y: f64, radius: f64) -> GeometryShape {
        GeometryShape::Circle { center: Vec2::new(x, y), radius }
    }

    fn square(x: f64, y: f64, size: f64) -> GeometryShape {
        GeometryShape::Polygon {
            vertices: vec![
                Vec2::new(x, y),
                Vec2::new(x + size, y),
                Vec2::new(x + size, y + size),
                Vec2::new(x, y + size),
            ],
        }
    }

    fn segment(ax: f64, ay: f64, bx: f64, by: f64) -> GeometryShape {
        GeometryShape::Segment { a: Vec2::new(ax, ay), b: Vec2::new(bx, by) }
    }

    #[test]
    fn test_circle_circle_overlap() {
        let m = compute_manifold(&circle(0.0, 0.0, 10.0), &circle(15.0, 0.0, 10.0), &ctx(1, 2)).unwrap();
        assert_relative_eq!(m.penetration, 5.0, epsilon = EPSILON);
        assert_relative_eq!(m.normal.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(m.normal.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(m.contact_point.x, 7.5, epsilon = EPSILON);
        assert_eq!(m.feature_a, SupportFeature::Circle);

        assert!(compute_manifold(&circle(0.0, 0.0, 10.0), &circle(30.0, 0.0, 10.0), &ctx(1, 2)).is_none());
    }

    #[test]
    fn test_touching_gives_zero_penetration() {
        let m = compute_manifold(&circle(0.0, 0.0, 10.0), &circle(20.0, 0.0, 10.0), &ctx(1, 2)).unwrap();
        assert_relative_eq!(m.penetration, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_coincident_circles_use_id_axis() {
        let m = compute_manifold(&circle(5.0, 5.0, 3.0), &circle(5.0, 5.0, 3.0), &ctx(1, 2)).unwrap();
        assert_eq!(m.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(m.penetration, 6.0, epsilon = EPSILON);

        let flipped = compute_manifold(&circle(5.0, 5.0, 3.0), &circle(5.0, 5.0, 3.0), &ctx(2, 1)).unwrap();
        assert_eq!(flipped.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_circle_on_segment_uses_centroid_direction() {
        let line = segment(-10.0, 0.0, 10.0, 0.0);
        let ball = circle(4.0, 0.0, 2.0);

        let m = compute_manifold(&line, &ball, &ctx(1, 2)).unwrap();
        assert_eq!(m.normal, Vec2::new(1.0, 0.0));
        assert_relative_eq!(m.penetration, 3.0, epsilon = EPSILON);

        let reversed = compute_manifold(&ball, &line, &ctx(2, 1)).unwrap();
        assert_eq!(reversed.normal, Vec2::new(-1.0, 0.0));
        assert_eq!(reversed, m.inverted());
    }

    #[test]
    fn test_circle_on_segment_midpoint_uses_perpendicular() {
        let line = segment(-10.0, 0.0, 10.0, 0.0);
        let ball = circle(0.0, 0.0, 2.0);

        let m = compute_manifold(&line, &ball, &ctx(1, 2)).unwrap();
        assert_eq!(m.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(m.penetration, 3.0, epsilon = EPSILON);

        let reversed = compute_manifold(&ball, &line, &ctx(2, 1)).unwrap();
        assert_eq!(reversed.normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_crossing_segments_use_perpendicular_of_lower_id() {
        let horizontal = segment(-5.0, 0.0, 5.0, 0.0);
        let vertical = segment(0.0, -5.0, 0.0, 5.0);

        let m = compute_manifold(&horizontal, &vertical, &ctx(1, 2)).unwrap();
        assert_eq!(m.normal, Vec2::new(0.0, 1.0));
        assert_relative_eq!(m.penetration, 2.0, epsilon = EPSILON);

        let reversed = compute_manifold(&vertical, &horizontal, &ctx(2, 1)).unwrap();
        assert_eq!(reversed.normal, Vec2::new(0.0, -1.0));
        assert_eq!(reversed, m.inverted());

        // Lower id owns the vertical segment: its perpendicular points to -x
        let m = compute_manifold(&vertical, &horizontal, &ctx(1, 2)).unwrap();
        assert_eq!(m.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_circle_inside_polygon() {
        let m = compute_manifold(&circle(9.0, 5.0, 2.0), &square(0.0, 0.0, 10.0), &ctx(1, 2)).unwrap();
        // Nearest edge is x = 10; B has to move left for A to escape through it
        assert_relative_eq!(m.normal.x, -1.0, epsilon = EPSILON);
        assert_relative_eq!(m.penetration, 3.0, epsilon = EPSILON);
        assert_relative_eq!(m.contact_point.x, 10.0, epsilon = EPSILON);
        assert_eq!(m.feature_b, SupportFeature::Edge);
    }

    #[test]
    fn test_circle_outside_polygon_corner() {
        let m = compute_manifold(&circle(12.0, 12.0, 3.0), &square(0.0, 0.0, 10.0), &ctx(1, 2)).unwrap();
        let diag = -Vec2::new(1.0, 1.0).normalize();
        assert_relative_eq!(m.normal.x, diag.x, epsilon = EPSILON);
        assert_relative_eq!(m.normal.y, diag.y, epsilon = EPSILON);
        assert_relative_eq!(m.penetration, 3.0 - 8.0_f64.sqrt(), epsilon = EPSILON);
        assert_eq!(m.feature_b, SupportFeature::Vertex(2));
    }

    #[test]
    fn test_polygon_polygon_min_axis() {
        let m = compute_manifold(&square(0.0, 0.0, 10.0), &square(8.0, 2.0, 10.0), &ctx(1, 2)).unwrap();
        assert_relative_eq!(m.penetration, 2.0, epsilon = EPSILON);
        assert_relative_eq!(m.normal.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(m.normal.y, 0.0, epsilon = EPSILON);
        assert_eq!(m.feature_a, SupportFeature::Edge);
        assert_eq!(m.feature_b, SupportFeature::Edge);
        // Midpoint of the two supporting edge centers
        assert_relative_eq!(m.contact_point.x, 9.0, epsilon = EPSILON);
        assert_relative_eq!(m.contact_point.y, 6.0, epsilon = EPSILON);

        assert!(compute_manifold(&square(0.0, 0.0, 10.0), &square(11.0, 0.0, 10.0), &ctx(1, 2)).is_none());
    }

    #[test]
    fn test_polygon_vertex_into_edge() {
        let diamond = GeometryShape::Polygon {
            vertices: vec![
                Vec2::new(14.0, 5.0),
                Vec2::new(19.0, 0.0),
                Vec2::new(24.0, 5.0),
                Vec2::new(19.0, 10.0),
            ],
        };
        assert!(compute_manifold(&square(0.0, 0.0, 10.0), &diamond, &ctx(1, 2)).is_none());

        let closer = GeometryShape::Polygon {
            vertices: vec![
                Vec2::new(9.0, 5.0),
                Vec2::new(14.0, 0.0),
                Vec2::new(19.0, 5.0),
                Vec2::new(14.0, 10.0),
            ],
        };
        let m = compute_manifold(&square(0.0, 0.0, 10.0), &closer, &ctx(1, 2)).unwrap();
        assert_eq!(m.feature_b, SupportFeature::Vertex(0));
        assert_eq!(m.contact_point, Vec2::new(9.0, 5.0));
        assert_relative_eq!(m.normal.x, 1.0, epsilon = EPSILON);
        assert_relative_eq!(m.penetration, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_segment_circle_capsule() {
        let m = compute_manifold(&segment(-10.0, 0.0, 0.0, 0.0), &circle(10.5, 0.0, 10.0), &ctx(1, 2)).unwrap();
        assert_relative_eq!(m.penetration, 0.5, epsilon = EPSILON);
        assert_relative_eq!(m.contact_point.x, 0.75, epsilon = EPSILON);
        assert_eq!(m.feature_a, SupportFeature::Endpoint(1));

        assert!(compute_manifold(&segment(-10.0, 0.0, 0.0, 0.0), &circle(11.5, 0.0, 10.0), &ctx(1, 2)).is_none());
    }

    #[test]
    fn test_segment_endpoint_buried_in_polygon() {
        let m = compute_manifold(&segment(9.0, 5.0, 20.0, 5.0), &square(0.0, 0.0, 10.0), &ctx(1, 2)).unwrap();
        assert_relative_eq!(m.normal.x, -1.0, epsilon = EPSILON);
        assert_relative_eq!(m.penetration, 2.0, epsilon = EPSILON);
        assert_eq!(m.contact_point, Vec2::new(9.0, 5.0));
        assert_eq!(m.feature_a, SupportFeature::Endpoint(0));
    }

    #[test]
    fn test_segment_segment_parallel() {
        let m = compute_manifold(&segment(0.0, 0.0, 10.0, 0.0), &segment(0.0, 1.5, 10.0, 1.5), &ctx(1, 2)).unwrap();
        assert_relative_eq!(m.normal.y, 1.0, epsilon = EPSILON);
        assert_relative_eq!(m.penetration, 0.5, epsilon = EPSILON);
        assert!(compute_manifold(&segment(0.0, 0.0, 10.0, 0.0), &segment(0.0, 2.5, 10.0, 2.5), &ctx(1, 2)).is_none());
    }

    #[test]
    fn test_swapped_arguments_mirror_exactly() {
        let shapes = [
            circle(0.0, 0.0, 10.0),
            circle(12.0, 3.0, 5.0),
            square(5.0, -4.0, 8.0),
            square(9.0, 1.0, 6.0),
            segment(-3.0, 2.0, 14.0, 6.0),
            segment(2.0, -8.0, 4.0, 9.0),
        ];
        for (i, a) in shapes.iter().enumerate() {
            for (j, b) in shapes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let (ia, ib) = (i as EntityId, j as EntityId);
                let forward = compute_manifold(a, b, &ctx(ia, ib));
                let backward = compute_manifold(b, a, &ctx(ib, ia));
                assert_eq!(forward.is_some(), backward.is_some(), "pair ({}, {})", i, j);
                if let (Some(f), Some(r)) = (forward, backward) {
                    assert_eq!(f.normal, -r.normal);
                    assert_eq!(f.penetration, r.penetration);
                    assert_eq!(f.contact_point, r.contact_point);
                    assert_eq!(f.feature_a, r.feature_b);
                    assert_eq!(f.feature_b, r.feature_a);
                }
            }
        }
    }

    #[test]
    fn test_closing_speed() {
        let m = compute_manifold(&circle(0.0, 0.0, 10.0), &circle(15.0, 0.0, 10.0), &ctx(1, 2)).unwrap();
        let approaching = m.with_closing_speed(Vec2::new(3.0, 0.0), Vec2::new(-1.0, 0.0));
        assert_relative_eq!(approaching.closing_speed, 4.0, epsilon = EPSILON);
        let leaving = m.with_closing_speed(Vec2::new(-3.0, 0.0), Vec2::zeros());
        assert_eq!(leaving.closing_speed, 0.0);
        assert_eq!(approaching.inverted().closing_speed, approaching.closing_speed);
    }
}
