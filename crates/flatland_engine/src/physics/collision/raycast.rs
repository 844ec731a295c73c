//! Ray casts against shapes and the world boundary
//!
//! All casts normalize the direction, so a returned `t` is a distance along
//! the ray. A zero direction never hits anything.

use crate::foundation::math::{cross, dot, perp, EPSILON, Vec2};
use super::primitives::polygon_edges;
use super::shape::GeometryShape;

/// A ray for casting in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec2,
    /// Unit direction of the ray
    pub direction: Vec2,
}

impl Ray {
    /// Ray from `origin` along `direction`, or `None` for a zero direction
    pub fn new(origin: Vec2, direction: Vec2) -> Option<Self> {
        let len = direction.norm();
        (len >= EPSILON).then(|| Self {
            origin,
            direction: direction / len,
        })
    }

    /// Point at distance `t` along the ray
    pub fn point_at(&self, t: f64) -> Vec2 {
        self.origin + self.direction * t
    }
}

/// Distance to the first crossing of a circle; the exit point when starting inside
pub fn raycast_circle(origin: Vec2, direction: Vec2, center: Vec2, radius: f64) -> Option<f64> {
    let ray = Ray::new(origin, direction)?;
    let oc = ray.origin - center;
    let b = dot(oc, ray.direction);
    let c = dot(oc, oc) - radius * radius;

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let t1 = -b - root;
    let t2 = -b + root;
    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Nearest non-negative hit on segment `ab`
///
/// A ray running along a collinear segment hits its nearer endpoint, or
/// reports zero when it starts on the segment.
pub fn raycast_segment(origin: Vec2, direction: Vec2, a: Vec2, b: Vec2) -> Option<f64> {
    let ray = Ray::new(origin, direction)?;
    let d = ray.direction;
    let edge = b - a;
    let w = a - ray.origin;
    let denom = cross(d, edge);

    if denom.abs() < EPSILON {
        // Parallel: only a collinear segment can be hit
        if cross(w, d).abs() > EPSILON {
            return None;
        }
        let ta = dot(w, d);
        let tb = dot(b - ray.origin, d);
        if ta.min(tb) <= 0.0 && ta.max(tb) >= 0.0 {
            return Some(0.0);
        }
        return [ta, tb].into_iter().filter(|t| *t >= 0.0).reduce(f64::min);
    }

    let t = cross(w, edge) / denom;
    let u = cross(w, d) / denom;
    (t >= 0.0 && (-EPSILON..=1.0 + EPSILON).contains(&u)).then_some(t)
}

/// Nearest hit over all edges of a convex polygon
pub fn raycast_convex_polygon(origin: Vec2, direction: Vec2, vertices: &[Vec2]) -> Option<f64> {
    polygon_edges(vertices)
        .filter_map(|(a, b)| raycast_segment(origin, direction, a, b))
        .reduce(f64::min)
}

/// Hit on segment `ab` inflated to a capsule of `radius`
///
/// The capsule is its side quad plus two end-cap circles; a zero-length
/// segment degenerates to a single circle.
pub fn raycast_segment_capsule(origin: Vec2, direction: Vec2, a: Vec2, b: Vec2, radius: f64) -> Option<f64> {
    let edge = b - a;
    let len = edge.norm();
    if len < EPSILON {
        return raycast_circle(origin, direction, a, radius);
    }

    let offset = perp(edge / len) * radius;
    let quad = [a - offset, b - offset, b + offset, a + offset];
    [
        raycast_convex_polygon(origin, direction, &quad),
        raycast_circle(origin, direction, a, radius),
        raycast_circle(origin, direction, b, radius),
    ]
    .into_iter()
    .flatten()
    .reduce(f64::min)
}

/// Cast against any world-space shape, segments as capsules of `line_radius`
pub fn raycast_shape(origin: Vec2, direction: Vec2, shape: &GeometryShape, line_radius: f64) -> Option<f64> {
    match shape {
        GeometryShape::Circle { center, radius } => raycast_circle(origin, direction, *center, *radius),
        GeometryShape::Segment { a, b } => raycast_segment_capsule(origin, direction, *a, *b, line_radius),
        GeometryShape::Polygon { vertices } => raycast_convex_polygon(origin, direction, vertices),
    }
}

/// One wall of the rectangular world
///
/// Variant order is the tie-break priority for rays that hit a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WallSide {
    /// The `min_y` wall (y grows downward)
    North,
    /// The `max_x` wall
    East,
    /// The `max_y` wall
    South,
    /// The `min_x` wall
    West,
}

impl WallSide {
    /// All walls in priority order
    pub const ALL: [WallSide; 4] = [WallSide::North, WallSide::East, WallSide::South, WallSide::West];
}

/// Axis-aligned rectangle enclosing the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    /// Left edge
    pub min_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Bottom edge
    pub max_y: f64,
}

impl WorldBounds {
    /// Create bounds from two corners
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Whether a point lies inside or on the boundary
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    fn wall_hit(&self, ray: &Ray, side: WallSide) -> Option<f64> {
        let (o, d) = (ray.origin, ray.direction);
        let (plane, along_x, speed, start) = match side {
            WallSide::North => (self.min_y, true, d.y, o.y),
            WallSide::South => (self.max_y, true, d.y, o.y),
            WallSide::East => (self.max_x, false, d.x, o.x),
            WallSide::West => (self.min_x, false, d.x, o.x),
        };
        if speed.abs() < EPSILON {
            return None;
        }
        let t = (plane - start) / speed;
        if t < 0.0 {
            return None;
        }
        let hit = ray.point_at(t);
        let within = if along_x {
            hit.x >= self.min_x - EPSILON && hit.x <= self.max_x + EPSILON
        } else {
            hit.y >= self.min_y - EPSILON && hit.y <= self.max_y + EPSILON
        };
        within.then_some(t)
    }
}

/// Nearest wall hit from inside or outside the boundary.
///
/// Distance ties (corner hits) resolve by [`WallSide`] priority.
pub fn raycast_world_bounds(origin: Vec2, direction: Vec2, bounds: &WorldBounds) -> Option<(f64, WallSide)> {
    let ray = Ray::new(origin, direction)?;
    let mut best: Option<(f64, WallSide)> = None;
    for side in WallSide::ALL {
        if let Some(t) = bounds.wall_hit(&ray, side) {
            if best.map_or(true, |(best_t, _)| t < best_t - EPSILON) {
                best = Some((t, side));
            }
        }
    }
    best
}
