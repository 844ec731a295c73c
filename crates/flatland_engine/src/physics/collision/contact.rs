//! Contact features and blunt/sharp contact classification
//!
//! The narrow phase tags each side of a manifold with the feature in
//! contact. Classification turns those tags into a [`ContactKind`] and the
//! per-side vertex angle that wear and lethality rules consume.

use crate::foundation::math::{cross, dot, Vec2};
use super::manifold::CollisionManifold;
use super::primitives::{polygon_centroid, wrapped_vertex};
use super::shape::GeometryShape;

/// Ratio under which an edge contact on a triangle is promoted to its nearest tip.
///
/// SAT tends to report a grazing edge when a triangle's tip is what actually
/// struck; if the contact point is closer to one vertex than this fraction of
/// the distance to the next-nearest vertex, the tip wins.
pub const TRIANGLE_TIP_RATIO: f64 = 0.35;

/// Geometric feature of a shape taking part in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportFeature {
    /// A single polygon vertex
    Vertex(usize),
    /// A polygon edge (two or more vertices share the support)
    Edge,
    /// Segment endpoint 0 (`a`) or 1 (`b`)
    Endpoint(u8),
    /// The circle itself
    Circle,
}

/// Blunt versus sharp contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// No side presents a sharp feature at the contact
    Touch,
    /// At least one side strikes with a vertex or segment tip
    Vertex,
}

/// Classification of a single contact, oriented like its manifold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactClassification {
    /// Blunt or sharp
    pub kind: ContactKind,
    /// Interior angle of A's striking vertex (0 for a segment tip)
    pub vertex_angle_a: Option<f64>,
    /// Interior angle of B's striking vertex (0 for a segment tip)
    pub vertex_angle_b: Option<f64>,
}

impl ContactClassification {
    /// Smallest striking angle on either side
    pub fn sharpest_angle(&self) -> Option<f64> {
        match (self.vertex_angle_a, self.vertex_angle_b) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Same classification seen from the other body
    pub fn swapped(&self) -> Self {
        Self {
            kind: self.kind,
            vertex_angle_a: self.vertex_angle_b,
            vertex_angle_b: self.vertex_angle_a,
        }
    }
}

/// Support tolerance for a polygon: `support_epsilon` scaled by its size
fn support_tolerance(vertices: &[Vec2], support_epsilon: f64) -> f64 {
    let c = polygon_centroid(vertices);
    let size = vertices.iter().map(|v| (v - c).norm()).fold(0.0, f64::max);
    support_epsilon * size
}

/// Indices of the vertices maximizing `dot(v, direction)` within the scaled tolerance
pub fn polygon_support_indices(vertices: &[Vec2], direction: Vec2, support_epsilon: f64) -> Vec<usize> {
    let tolerance = support_tolerance(vertices, support_epsilon);
    let best = vertices
        .iter()
        .map(|v| dot(*v, direction))
        .fold(f64::NEG_INFINITY, f64::max);
    (0..vertices.len())
        .filter(|&i| dot(vertices[i], direction) >= best - tolerance)
        .collect()
}

/// Vertex if exactly one vertex supports `direction`, otherwise edge
pub fn polygon_support_feature(vertices: &[Vec2], direction: Vec2, support_epsilon: f64) -> SupportFeature {
    match polygon_support_indices(vertices, direction, support_epsilon).as_slice() {
        [only] => SupportFeature::Vertex(*only),
        _ => SupportFeature::Edge,
    }
}

/// Average of the supporting vertices; the middle of a supporting edge
pub fn polygon_support_center(vertices: &[Vec2], direction: Vec2, support_epsilon: f64) -> Vec2 {
    let indices = polygon_support_indices(vertices, direction, support_epsilon);
    let sum = indices.iter().fold(Vec2::zeros(), |acc, &i| acc + vertices[i]);
    sum / indices.len() as f64
}

/// Promote an edge contact on a triangle to the tip the contact point hugs
pub fn refine_triangle_feature(vertices: &[Vec2], feature: SupportFeature, contact_point: Vec2) -> SupportFeature {
    if vertices.len() != 3 || feature != SupportFeature::Edge {
        return feature;
    }

    let mut distances: Vec<(f64, usize)> = vertices
        .iter()
        .enumerate()
        .map(|(i, v)| ((v - contact_point).norm(), i))
        .collect();
    distances.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));

    let (nearest, index) = distances[0];
    let (runner_up, _) = distances[1];
    if nearest < TRIANGLE_TIP_RATIO * runner_up {
        SupportFeature::Vertex(index)
    } else {
        SupportFeature::Edge
    }
}

/// Endpoint of segment `ab` nearest the contact point (endpoint 0 on ties)
pub fn segment_endpoint_feature(a: Vec2, b: Vec2, contact_point: Vec2) -> SupportFeature {
    if (contact_point - a).norm() <= (contact_point - b).norm() {
        SupportFeature::Endpoint(0)
    } else {
        SupportFeature::Endpoint(1)
    }
}

/// Interior angle of a convex polygon at vertex `index`, in radians
pub fn interior_angle(vertices: &[Vec2], index: usize) -> f64 {
    let n = vertices.len();
    let here = wrapped_vertex(vertices, index);
    let to_prev = wrapped_vertex(vertices, index + n - 1) - here;
    let to_next = wrapped_vertex(vertices, index + 1) - here;
    cross(to_prev, to_next).abs().atan2(dot(to_prev, to_next))
}

/// Striking angle for one side, if its feature is a vertex close enough to the contact
fn side_angle(
    shape: &GeometryShape,
    feature: SupportFeature,
    contact_point: Vec2,
    reach: f64,
    line_radius: f64,
) -> Option<f64> {
    match (shape, feature) {
        (GeometryShape::Polygon { vertices }, SupportFeature::Vertex(index)) => {
            let vertex = wrapped_vertex(vertices, index);
            ((contact_point - vertex).norm() <= reach).then(|| interior_angle(vertices, index))
        }
        (GeometryShape::Segment { a, b }, SupportFeature::Endpoint(end)) => {
            let tip = if end == 0 { *a } else { *b };
            // A capsule's tip sits `line_radius` behind its surface
            ((contact_point - tip).norm() <= reach + line_radius).then_some(0.0)
        }
        _ => None,
    }
}

/// Classify a manifold as blunt or sharp.
///
/// A polygon vertex or segment endpoint only strikes when the contact point
/// lies within `penetration + vertex_contact_epsilon` of it (plus the capsule
/// radius for segments); otherwise that side is blunt.
pub fn classify_contact(
    manifold: &CollisionManifold,
    shape_a: &GeometryShape,
    shape_b: &GeometryShape,
    line_radius: f64,
    vertex_contact_epsilon: f64,
) -> ContactClassification {
    let reach = manifold.penetration + vertex_contact_epsilon;
    let vertex_angle_a = side_angle(shape_a, manifold.feature_a, manifold.contact_point, reach, line_radius);
    let vertex_angle_b = side_angle(shape_b, manifold.feature_b, manifold.contact_point, reach, line_radius);

    let kind = if vertex_angle_a.is_some() || vertex_angle_b.is_some() {
        ContactKind::Vertex
    } else {
        ContactKind::Touch
    };

    ContactClassification {
        kind,
        vertex_angle_a,
        vertex_angle_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::FRAC_PI_2, EPSILON};
    use approx::assert_relative_eq;

    fn triangle() -> Vec<Vec2> {
        vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)]
    }

    #[test]
    fn test_support_feature_vertex_and_edge() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert_eq!(
            polygon_support_feature(&square, Vec2::new(1.0, 0.0), 1e-3),
            SupportFeature::Edge
        );
        assert_eq!(
            polygon_support_feature(&square, Vec2::new(1.0, 1.0).normalize(), 1e-3),
            SupportFeature::Vertex(2)
        );
        assert_eq!(
            polygon_support_center(&square, Vec2::new(1.0, 0.0), 1e-3),
            Vec2::new(10.0, 5.0)
        );
    }

    #[test]
    fn test_support_tolerance_scales_with_size() {
        // Nearly flat top: two vertices differ by 0.01 along +y
        let poly = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 50.0),
            Vec2::new(0.0, 50.01),
        ];
        let up = Vec2::new(0.0, 1.0);
        assert_eq!(polygon_support_feature(&poly, up, 1e-6), SupportFeature::Vertex(3));
        assert_eq!(polygon_support_feature(&poly, up, 1e-3), SupportFeature::Edge);
    }

    #[test]
    fn test_triangle_edge_promoted_to_tip() {
        let tri = triangle();
        // Contact hugging vertex 1 along the hypotenuse
        let near_tip = Vec2::new(9.0, 1.0);
        assert_eq!(
            refine_triangle_feature(&tri, SupportFeature::Edge, near_tip),
            SupportFeature::Vertex(1)
        );
        // Mid-edge contact stays an edge
        let mid = Vec2::new(5.0, 5.0);
        assert_eq!(refine_triangle_feature(&tri, SupportFeature::Edge, mid), SupportFeature::Edge);
        // Only edges are reconsidered
        assert_eq!(
            refine_triangle_feature(&tri, SupportFeature::Vertex(0), near_tip),
            SupportFeature::Vertex(0)
        );
    }

    #[test]
    fn test_triangle_ratio_threshold() {
        let tri = triangle();
        // Along the bottom edge from vertex 0: distances x and 10 - x to vertices 0 and 1,
        // and sqrt(x^2 + 100) to vertex 2. Ratio x / (10 - x) crosses 0.35 near x = 2.59.
        assert_eq!(
            refine_triangle_feature(&tri, SupportFeature::Edge, Vec2::new(2.5, 0.0)),
            SupportFeature::Vertex(0)
        );
        assert_eq!(
            refine_triangle_feature(&tri, SupportFeature::Edge, Vec2::new(2.7, 0.0)),
            SupportFeature::Edge
        );
    }

    #[test]
    fn test_segment_endpoint_feature() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(segment_endpoint_feature(a, b, Vec2::new(2.0, 1.0)), SupportFeature::Endpoint(0));
        assert_eq!(segment_endpoint_feature(a, b, Vec2::new(8.0, 1.0)), SupportFeature::Endpoint(1));
        assert_eq!(segment_endpoint_feature(a, b, Vec2::new(5.0, 1.0)), SupportFeature::Endpoint(0));
    }

    #[test]
    fn test_interior_angles() {
        let tri = triangle();
        assert_relative_eq!(interior_angle(&tri, 0), FRAC_PI_2, epsilon = EPSILON);
        assert_relative_eq!(interior_angle(&tri, 1), FRAC_PI_2 / 2.0, epsilon = EPSILON);
        assert_relative_eq!(interior_angle(&tri, 2), FRAC_PI_2 / 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_classification_reach() {
        let shape_a = GeometryShape::Polygon { vertices: triangle() };
        let shape_b = GeometryShape::Circle { center: Vec2::new(20.0, 0.0), radius: 10.0 };
        let mut manifold = CollisionManifold {
            normal: Vec2::new(1.0, 0.0),
            penetration: 0.0,
            contact_point: Vec2::new(10.0, 0.0),
            feature_a: SupportFeature::Vertex(1),
            feature_b: SupportFeature::Circle,
            closing_speed: 0.0,
        };

        let sharp = classify_contact(&manifold, &shape_a, &shape_b, 1.0, 0.5);
        assert_eq!(sharp.kind, ContactKind::Vertex);
        assert_relative_eq!(sharp.vertex_angle_a.unwrap(), FRAC_PI_2 / 2.0, epsilon = EPSILON);
        assert_eq!(sharp.vertex_angle_b, None);
        assert_eq!(sharp.sharpest_angle(), sharp.vertex_angle_a);
        assert_eq!(sharp.swapped().vertex_angle_b, sharp.vertex_angle_a);

        manifold.contact_point = Vec2::new(8.0, 0.0);
        let blunt = classify_contact(&manifold, &shape_a, &shape_b, 1.0, 0.5);
        assert_eq!(blunt.kind, ContactKind::Touch);
        assert_eq!(blunt.sharpest_angle(), None);
    }
}
