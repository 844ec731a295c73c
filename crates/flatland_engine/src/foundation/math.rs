//! Math utilities and types
//!
//! Provides the 2D vector type and the scalar helpers every geometry routine
//! shares. All comparisons downstream use [`EPSILON`].

pub use nalgebra::Vector2;

/// 2D vector type (positions and directions share the same representation)
pub type Vec2 = Vector2<f64>;

/// Shared tolerance for geometric comparisons
pub const EPSILON: f64 = 1e-6;

/// Common math constants
pub mod constants {
    pub use std::f64::consts::{FRAC_PI_2, PI, TAU};
}

/// Component-wise sum
#[inline]
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

/// Component-wise difference `a - b`
#[inline]
pub fn sub(a: Vec2, b: Vec2) -> Vec2 {
    a - b
}

/// Scale a vector by a scalar
#[inline]
pub fn mul(v: Vec2, s: f64) -> Vec2 {
    v * s
}

/// Dot product
#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f64 {
    a.dot(&b)
}

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Euclidean length
#[inline]
pub fn length(v: Vec2) -> f64 {
    v.norm()
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (b - a).norm()
}

/// Unit vector in the direction of `v`.
///
/// A vector shorter than [`EPSILON`] normalizes to the zero vector; callers
/// must check for that instead of relying on a division by zero.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.norm();
    if len < EPSILON {
        Vec2::zeros()
    } else {
        v / len
    }
}

/// Counter-clockwise perpendicular `(-y, x)`
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Rotate `v` counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Clamp `value` into `[min, max]`
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Wrap `value` into `[0, max)`; used for toroidal coordinates and angles
#[inline]
pub fn wrap(value: f64, max: f64) -> f64 {
    let wrapped = value.rem_euclid(max);
    // rem_euclid can round up to `max` for tiny negative inputs
    if wrapped >= max {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector pointing along `angle` (radians, measured from +x)
#[inline]
pub fn angle_to_vector(angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos, sin)
}

/// Position and orientation of an entity in the plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2 {
    /// World-space position
    pub position: Vec2,
    /// Rotation in radians (counter-clockwise)
    pub rotation: f64,
}

impl Default for Transform2 {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
        }
    }
}

impl Transform2 {
    /// Create a transform from a position and rotation
    pub fn new(position: Vec2, rotation: f64) -> Self {
        Self { position, rotation }
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Map a model-space point into world space
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.rotation)
    }

    /// Forward direction of this transform
    pub fn heading(&self) -> Vec2 {
        angle_to_vector(self.rotation)
    }
}
