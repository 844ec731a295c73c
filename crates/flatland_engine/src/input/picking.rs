//! Point picking against world-space shapes
//!
//! The hit tests are pure and stateless: a point hits a shape when it lies
//! inside it or within `tolerance` of its boundary.

use crate::foundation::math::Vec2;
use crate::physics::collision::{EntityId, GeometryShape};
use crate::physics::collision_system::CollisionFrame;

pub use crate::physics::collision::primitives::{
    distance_point_to_convex_polygon_edges, distance_point_to_segment, point_in_convex_polygon,
};

/// Whether `point` is inside a circle or within `tolerance` of its rim
pub fn hit_test_circle(point: Vec2, center: Vec2, radius: f64, tolerance: f64) -> bool {
    (point - center).norm() <= radius + tolerance
}

/// Whether `point` lies within `tolerance` of segment `ab`
pub fn hit_test_segment(point: Vec2, a: Vec2, b: Vec2, tolerance: f64) -> bool {
    distance_point_to_segment(point, a, b) <= tolerance
}

/// Whether `point` is inside a convex polygon or within `tolerance` of an edge
pub fn hit_test_polygon(point: Vec2, vertices: &[Vec2], tolerance: f64) -> bool {
    point_in_convex_polygon(point, vertices) || distance_point_to_convex_polygon_edges(point, vertices) <= tolerance
}

/// Distance from `point` to a shape's outline, zero inside.
///
/// Segments are measured as capsules of `line_radius`.
pub fn boundary_distance(shape: &GeometryShape, point: Vec2, line_radius: f64) -> f64 {
    match shape {
        GeometryShape::Circle { center, radius } => ((point - center).norm() - radius).max(0.0),
        GeometryShape::Segment { a, b } => (distance_point_to_segment(point, *a, *b) - line_radius).max(0.0),
        GeometryShape::Polygon { vertices } => {
            if point_in_convex_polygon(point, vertices) {
                0.0
            } else {
                distance_point_to_convex_polygon_edges(point, vertices)
            }
        }
    }
}

/// Result of a successful pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// The picked entity
    pub entity: EntityId,
    /// Distance from the point to its outline (zero inside)
    pub distance: f64,
}

/// Entity under `point`, with its boundary distance
///
/// Among all shapes the point hits, the one with the smallest boundary
/// distance wins; exact ties go to the lowest id.
pub fn pick(frame: &CollisionFrame, point: Vec2, tolerance: f64) -> Option<PickHit> {
    let line_radius = frame.line_radius();
    let mut best: Option<PickHit> = None;
    for (&entity, shape) in frame.geometries() {
        let hit = match shape {
            GeometryShape::Circle { center, radius } => hit_test_circle(point, *center, *radius, tolerance),
            GeometryShape::Segment { a, b } => hit_test_segment(point, *a, *b, line_radius + tolerance),
            GeometryShape::Polygon { vertices } => hit_test_polygon(point, vertices, tolerance),
        };
        if !hit {
            continue;
        }
        let distance = boundary_distance(shape, point, line_radius);
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(PickHit { entity, distance });
        }
    }
    if let Some(hit) = best {
        log::debug!("Picked entity {} at {:?} (distance {:.3})", hit.entity, point, hit.distance);
    }
    best
}

/// Id of the entity under `point`, if any
pub fn pick_entity(frame: &CollisionFrame, point: Vec2, tolerance: f64) -> Option<EntityId> {
    pick(frame, point, tolerance).map(|hit| hit.entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CollisionConfig;
    use crate::foundation::math::{Transform2, EPSILON};
    use crate::physics::collision::ShapeDescriptor;
    use crate::physics::collision_system::{AcceptAll, CollisionBody, CollisionPipeline};

    #[test]
    fn test_segment_tolerance_is_inclusive() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!(hit_test_segment(Vec2::new(5.0, 2.0), a, b, 2.0));
        assert!(!hit_test_segment(Vec2::new(5.0, 2.0 + EPSILON), a, b, 2.0));
        // Past the end cap
        assert!(hit_test_segment(Vec2::new(12.0, 0.0), a, b, 2.0));
        assert!(!hit_test_segment(Vec2::new(12.5, 0.0), a, b, 2.0));
    }

    #[test]
    fn test_circle_and_polygon_hits() {
        assert!(hit_test_circle(Vec2::new(13.0, 0.0), Vec2::zeros(), 10.0, 3.0));
        assert!(!hit_test_circle(Vec2::new(13.5, 0.0), Vec2::zeros(), 10.0, 3.0));

        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(hit_test_polygon(Vec2::new(5.0, 5.0), &square, 0.0));
        assert!(hit_test_polygon(Vec2::new(11.0, 5.0), &square, 1.0));
        assert!(!hit_test_polygon(Vec2::new(11.5, 5.0), &square, 1.0));
    }

    fn frame(bodies: Vec<CollisionBody>) -> CollisionFrame {
        let mut pipeline = CollisionPipeline::new(CollisionConfig::default()).unwrap();
        pipeline.run(&bodies, &AcceptAll).unwrap()
    }

    #[test]
    fn test_pick_prefers_closest_outline() {
        let frame = frame(vec![
            CollisionBody::new(
                4,
                Transform2::from_position(Vec2::new(0.0, 0.0)),
                ShapeDescriptor::circle(10.0).unwrap(),
            ),
            CollisionBody::new(
                2,
                Transform2::from_position(Vec2::new(13.0, 0.0)),
                ShapeDescriptor::circle(2.0).unwrap(),
            ),
        ]);
        // Between the two rims: the nearer outline wins over the lower id
        assert_eq!(pick_entity(&frame, Vec2::new(10.3, 0.0), 1.0), Some(4));
        assert_eq!(pick_entity(&frame, Vec2::new(10.8, 0.0), 1.0), Some(2));
        assert_eq!(pick_entity(&frame, Vec2::new(0.0, 0.0), 0.5), Some(4));
        assert_eq!(pick_entity(&frame, Vec2::new(13.0, 0.0), 0.5), Some(2));
        assert_eq!(pick_entity(&frame, Vec2::new(50.0, 50.0), 0.5), None);
    }

    #[test]
    fn test_pick_tie_goes_to_lowest_id() {
        let circle = ShapeDescriptor::circle(5.0).unwrap();
        let frame = frame(vec![
            CollisionBody::new(9, Transform2::from_position(Vec2::new(-5.0, 0.0)), circle.clone()),
            CollisionBody::new(3, Transform2::from_position(Vec2::new(5.0, 0.0)), circle),
        ]);
        let hit = pick(&frame, Vec2::new(0.0, 0.0), 0.1).unwrap();
        assert_eq!(hit.entity, 3);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_pick_segment_uses_line_radius() {
        let frame = frame(vec![CollisionBody::new(
            1,
            Transform2::from_position(Vec2::new(0.0, 0.0)),
            ShapeDescriptor::segment(20.0).unwrap(),
        )]);
        // Default line radius is 1.0
        assert_eq!(pick_entity(&frame, Vec2::new(3.0, 1.5), 0.5), Some(1));
        assert_eq!(pick_entity(&frame, Vec2::new(3.0, 1.6), 0.5), None);
        let hit = pick(&frame, Vec2::new(3.0, 0.5), 0.5).unwrap();
        assert_eq!(hit.distance, 0.0);
    }
}
