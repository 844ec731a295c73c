//! High-level collision shape abstractions
//!
//! Shapes are stored in model space as a [`ShapeDescriptor`] and transformed
//! into a world-space [`GeometryShape`] snapshot once per tick. Geometry
//! routines only ever see the snapshot.

use crate::foundation::math::{constants::TAU, cross, Transform2, Vec2, EPSILON};
use super::primitives::{polygon_centroid, polygon_edges, polygon_signed_area, Aabb};

/// Shape validation errors, raised when a descriptor is built
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Polygon without any vertex
    #[error("polygon has no vertices")]
    EmptyPolygon,

    /// Polygon with fewer than three vertices
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// Polygon enclosing (almost) no area
    #[error("polygon encloses no area")]
    DegeneratePolygon,

    /// Polygon that is concave or self-intersecting
    #[error("polygon is not convex and simple")]
    NotConvex,

    /// Circle radius that is not strictly positive
    #[error("invalid radius: {0}")]
    InvalidRadius(f64),

    /// Segment length that is negative or not finite
    #[error("invalid segment length: {0}")]
    InvalidLength(f64),
}

/// Discriminant of a shape, ordered by canonical pair orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeKind {
    /// Line segment (capsule of the configured line radius)
    Segment,
    /// Circle
    Circle,
    /// Convex polygon
    Polygon,
}

/// Model-space shape attached to an entity
///
/// Position and rotation come from the entity's [`Transform2`] at snapshot
/// time. Construct through the validating constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDescriptor {
    /// Circle centred on the entity position
    Circle {
        /// Radius
        radius: f64,
    },
    /// Segment centred on the entity position along its local x axis
    Segment {
        /// Full length
        length: f64,
    },
    /// Convex polygon with counter-clockwise local vertices
    Polygon {
        /// Local vertices
        vertices: Vec<Vec2>,
    },
}

impl ShapeDescriptor {
    /// Creates a circle descriptor
    pub fn circle(radius: f64) -> Result<Self, ShapeError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(ShapeError::InvalidRadius(radius));
        }
        Ok(Self::Circle { radius })
    }

    /// Creates a segment descriptor; a zero length is allowed and behaves as a dot
    pub fn segment(length: f64) -> Result<Self, ShapeError> {
        if !(length >= 0.0 && length.is_finite()) {
            return Err(ShapeError::InvalidLength(length));
        }
        Ok(Self::Segment { length })
    }

    /// Creates a convex polygon descriptor.
    ///
    /// Clockwise input is reversed into counter-clockwise order. Concave,
    /// self-intersecting or zero-area input is rejected.
    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        let vertices = normalize_convex_polygon(vertices)?;
        Ok(Self::Polygon { vertices })
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`,
    /// the first vertex on the local +x axis
    pub fn regular_polygon(sides: usize, radius: f64) -> Result<Self, ShapeError> {
        if sides < 3 {
            return Err(ShapeError::TooFewVertices(sides));
        }
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(ShapeError::InvalidRadius(radius));
        }
        let vertices = (0..sides)
            .map(|i| {
                let angle = TAU * i as f64 / sides as f64;
                Vec2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::polygon(vertices)
    }

    /// Shape discriminant
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Segment { .. } => ShapeKind::Segment,
            Self::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Transform this shape to world space
    pub fn to_world_space(&self, transform: &Transform2) -> GeometryShape {
        match self {
            Self::Circle { radius } => GeometryShape::Circle {
                center: transform.position,
                radius: *radius,
            },
            Self::Segment { length } => {
                let half = Vec2::new(length * 0.5, 0.0);
                GeometryShape::Segment {
                    a: transform.apply(-half),
                    b: transform.apply(half),
                }
            }
            Self::Polygon { vertices } => GeometryShape::Polygon {
                vertices: vertices.iter().map(|v| transform.apply(*v)).collect(),
            },
        }
    }
}

/// Check convexity and simplicity, returning the vertices in CCW order
fn normalize_convex_polygon(mut vertices: Vec<Vec2>) -> Result<Vec<Vec2>, ShapeError> {
    match vertices.len() {
        0 => return Err(ShapeError::EmptyPolygon),
        n if n < 3 => return Err(ShapeError::TooFewVertices(n)),
        _ => {}
    }

    let area = polygon_signed_area(&vertices);
    if area.abs() < EPSILON {
        return Err(ShapeError::DegeneratePolygon);
    }
    if area < 0.0 {
        vertices.reverse();
    }

    // Every turn must bend left and the turns must add up to exactly one revolution;
    // a pentagram turns left everywhere but winds twice.
    let n = vertices.len();
    let mut total_turn = 0.0;
    for i in 0..n {
        let prev = vertices[(i + n - 1) % n];
        let here = vertices[i];
        let next = vertices[(i + 1) % n];
        let incoming = here - prev;
        let outgoing = next - here;
        if incoming.norm() < EPSILON || outgoing.norm() < EPSILON {
            return Err(ShapeError::DegeneratePolygon);
        }
        let turn = cross(incoming, outgoing);
        if turn < -EPSILON {
            return Err(ShapeError::NotConvex);
        }
        total_turn += turn.atan2(incoming.dot(&outgoing));
    }
    if (total_turn - TAU).abs() > 1e-3 {
        return Err(ShapeError::NotConvex);
    }

    Ok(vertices)
}

/// World-space shape snapshot, rebuilt every tick
///
/// Polygons are convex, simple and counter-clockwise when produced through
/// [`ShapeDescriptor`]; other producers must keep that invariant.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryShape {
    /// World-space circle
    Circle {
        /// Center
        center: Vec2,
        /// Radius
        radius: f64,
    },
    /// World-space segment; its capsule radius is supplied by the caller
    Segment {
        /// First endpoint (endpoint 0)
        a: Vec2,
        /// Second endpoint (endpoint 1)
        b: Vec2,
    },
    /// World-space convex polygon
    Polygon {
        /// Vertices in counter-clockwise order
        vertices: Vec<Vec2>,
    },
}

impl GeometryShape {
    /// Shape discriminant
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Segment { .. } => ShapeKind::Segment,
            Self::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Representative center: circle center, segment midpoint, polygon vertex average
    pub fn centroid(&self) -> Vec2 {
        match self {
            Self::Circle { center, .. } => *center,
            Self::Segment { a, b } => (a + b) * 0.5,
            Self::Polygon { vertices } => polygon_centroid(vertices),
        }
    }

    /// Largest distance from the centroid to the shape's outline
    pub fn bounding_radius(&self) -> f64 {
        match self {
            Self::Circle { radius, .. } => *radius,
            Self::Segment { a, b } => (b - a).norm() * 0.5,
            Self::Polygon { vertices } => {
                let c = polygon_centroid(vertices);
                vertices.iter().map(|v| (v - c).norm()).fold(0.0, f64::max)
            }
        }
    }

    /// Bounding box grown by `inflation`
    pub fn aabb(&self, inflation: f64) -> Aabb {
        Aabb::from_geometry(self, inflation)
    }

    /// Polygon vertices, if this is a polygon
    pub fn vertices(&self) -> Option<&[Vec2]> {
        match self {
            Self::Polygon { vertices } => Some(vertices),
            _ => None,
        }
    }

    /// Number of polygon edges (zero for other kinds)
    pub fn edge_count(&self) -> usize {
        match self {
            Self::Polygon { vertices } => polygon_edges(vertices).count(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::FRAC_PI_2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_clockwise_polygon_is_reversed() {
        let cw = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
        ];
        let shape = ShapeDescriptor::polygon(cw).unwrap();
        let ShapeDescriptor::Polygon { vertices } = shape else {
            panic!("expected polygon");
        };
        assert!(polygon_signed_area(&vertices) > 0.0);
        assert_eq!(vertices[0], Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_invalid_polygons_rejected() {
        assert_eq!(ShapeDescriptor::polygon(vec![]), Err(ShapeError::EmptyPolygon));
        assert_eq!(
            ShapeDescriptor::polygon(vec![Vec2::zeros(), Vec2::new(1.0, 0.0)]),
            Err(ShapeError::TooFewVertices(2))
        );
        assert_eq!(
            ShapeDescriptor::polygon(vec![Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]),
            Err(ShapeError::DegeneratePolygon)
        );
        // Dart (concave)
        let dart = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(3.0, 5.0),
        ];
        assert_eq!(ShapeDescriptor::polygon(dart), Err(ShapeError::NotConvex));
    }

    #[test]
    fn test_pentagram_rejected() {
        let star: Vec<Vec2> = (0..5)
            .map(|i| {
                let angle = TAU * (2 * i) as f64 / 5.0;
                Vec2::new(angle.cos(), angle.sin()) * 10.0
            })
            .collect();
        assert!(ShapeDescriptor::polygon(star).is_err());
    }

    #[test]
    fn test_radius_and_length_validation() {
        assert_eq!(ShapeDescriptor::circle(0.0), Err(ShapeError::InvalidRadius(0.0)));
        assert!(ShapeDescriptor::segment(-1.0).is_err());
        assert!(ShapeDescriptor::segment(0.0).is_ok());
        assert_eq!(ShapeDescriptor::regular_polygon(2, 1.0), Err(ShapeError::TooFewVertices(2)));
    }

    #[test]
    fn test_segment_to_world_space() {
        let shape = ShapeDescriptor::segment(10.0).unwrap();
        let world = shape.to_world_space(&Transform2::new(Vec2::new(5.0, 5.0), FRAC_PI_2));
        let GeometryShape::Segment { a, b } = world else {
            panic!("expected segment");
        };
        assert_abs_diff_eq!(a, Vec2::new(5.0, 0.0), epsilon = EPSILON);
        assert_abs_diff_eq!(b, Vec2::new(5.0, 10.0), epsilon = EPSILON);
    }

    #[test]
    fn test_regular_polygon_geometry() {
        let hexagon = ShapeDescriptor::regular_polygon(6, 4.0).unwrap();
        assert_eq!(hexagon.kind(), ShapeKind::Polygon);
        let world = hexagon.to_world_space(&Transform2::from_position(Vec2::new(1.0, 1.0)));
        assert_eq!(world.edge_count(), 6);
        assert_abs_diff_eq!(world.centroid(), Vec2::new(1.0, 1.0), epsilon = EPSILON);
        assert_abs_diff_eq!(world.bounding_radius(), 4.0, epsilon = EPSILON);
        let aabb = world.aabb(0.0);
        assert_abs_diff_eq!(aabb.max_x, 5.0, epsilon = EPSILON);
        assert_abs_diff_eq!(aabb.min_x, -3.0, epsilon = EPSILON);
    }

    #[test]
    fn test_kind_ordering_is_canonical() {
        assert!(ShapeKind::Segment < ShapeKind::Circle);
        assert!(ShapeKind::Circle < ShapeKind::Polygon);
    }
}
