//! Line-of-sight queries over a collision frame
//!
//! Vision cones sample the frame with rays to find nearby agents; the
//! flatlander view casts one ray per screen column for the panoramic
//! renderer. World walls stop every ray that hits nothing nearer.

use std::collections::BTreeMap;

use crate::core::config::VisionConfig;
use crate::foundation::math::{angle_to_vector, Vec2};
use crate::physics::collision::{raycast_shape, raycast_world_bounds, EntityId, WallSide, WorldBounds};
use crate::physics::collision_system::CollisionFrame;

/// What a sight ray stopped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SightTarget {
    /// An entity's shape
    Entity(EntityId),
    /// One of the world walls
    Wall(WallSide),
}

impl SightTarget {
    /// Flat id for consumers keyed by integers: entity ids as-is, walls negative
    pub fn raw_id(&self) -> i64 {
        match self {
            Self::Entity(id) => i64::from(*id),
            Self::Wall(WallSide::North) => -1,
            Self::Wall(WallSide::East) => -2,
            Self::Wall(WallSide::South) => -3,
            Self::Wall(WallSide::West) => -4,
        }
    }
}

/// Kind of feature a sight ray hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SightFeature {
    /// Entity outline
    Entity,
    /// World boundary
    Boundary,
}

/// Nearest hit along a sight ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightHit {
    /// What was hit
    pub target: SightTarget,
    /// Distance from the ray origin
    pub distance: f64,
    /// Entity or boundary
    pub feature: SightFeature,
}

/// Cast a sight ray through the frame.
///
/// The nearest entity within `max_distance` wins, lowest id on ties; a wall
/// is reported only when no entity is at least as near. `exclude` skips the
/// viewer's own shape.
pub fn cast_sight_ray(
    frame: &CollisionFrame,
    bounds: &WorldBounds,
    origin: Vec2,
    direction: Vec2,
    max_distance: f64,
    exclude: Option<EntityId>,
) -> Option<SightHit> {
    let line_radius = frame.line_radius();
    let mut nearest: Option<(f64, EntityId)> = None;
    for (&id, shape) in frame.geometries() {
        if Some(id) == exclude {
            continue;
        }
        let Some(t) = raycast_shape(origin, direction, shape, line_radius) else {
            continue;
        };
        if t <= max_distance && nearest.map_or(true, |(best, _)| t < best) {
            nearest = Some((t, id));
        }
    }

    let wall = raycast_world_bounds(origin, direction, bounds).filter(|(t, _)| *t <= max_distance);

    match (nearest, wall) {
        (Some((t, id)), Some((wall_t, _))) if t <= wall_t => Some(entity_hit(id, t)),
        (Some((t, id)), None) => Some(entity_hit(id, t)),
        (_, Some((wall_t, side))) => Some(SightHit {
            target: SightTarget::Wall(side),
            distance: wall_t,
            feature: SightFeature::Boundary,
        }),
        (None, None) => None,
    }
}

fn entity_hit(id: EntityId, distance: f64) -> SightHit {
    SightHit {
        target: SightTarget::Entity(id),
        distance,
        feature: SightFeature::Entity,
    }
}

/// Evenly spaced angles across `field_of_view`, both edges included
fn cone_angles(heading: f64, field_of_view: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        field_of_view / (count - 1) as f64
    } else {
        0.0
    };
    let start = if count > 1 { heading - field_of_view * 0.5 } else { heading };
    (0..count).map(move |i| start + step * i as f64)
}

/// A viewer's field of vision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionCone {
    /// Eye position
    pub origin: Vec2,
    /// Facing angle in radians
    pub heading: f64,
    /// Total aperture in radians
    pub field_of_view: f64,
    /// Maximum sight distance
    pub range: f64,
    /// Sample rays across the aperture
    pub ray_count: usize,
}

impl VisionCone {
    /// Cone at `origin` facing `heading`, shaped by the vision config
    pub fn from_config(origin: Vec2, heading: f64, config: &VisionConfig) -> Self {
        Self {
            origin,
            heading,
            field_of_view: config.field_of_view,
            range: config.range,
            ray_count: config.ray_count,
        }
    }

    /// Entities seen by at least one sample ray, nearest first (ties by id)
    pub fn perceive(&self, frame: &CollisionFrame, bounds: &WorldBounds, exclude: Option<EntityId>) -> Vec<SightHit> {
        let mut seen: BTreeMap<EntityId, SightHit> = BTreeMap::new();
        for angle in cone_angles(self.heading, self.field_of_view, self.ray_count) {
            let hit = cast_sight_ray(frame, bounds, self.origin, angle_to_vector(angle), self.range, exclude);
            if let Some(hit @ SightHit { target: SightTarget::Entity(id), .. }) = hit {
                seen.entry(id)
                    .and_modify(|best| {
                        if hit.distance < best.distance {
                            *best = hit;
                        }
                    })
                    .or_insert(hit);
            }
        }

        let mut hits: Vec<SightHit> = seen.into_values().collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.target.raw_id().cmp(&b.target.raw_id()))
        });
        log::trace!("Vision cone at {:?} sees {} entities", self.origin, hits.len());
        hits
    }
}

/// One sight hit per screen column, left to right.
///
/// Columns sample the centre of equal slices of `field_of_view`. With y
/// growing downward, left of the viewer is the smaller angle.
pub fn flatlander_view(
    frame: &CollisionFrame,
    bounds: &WorldBounds,
    origin: Vec2,
    heading: f64,
    field_of_view: f64,
    columns: usize,
    exclude: Option<EntityId>,
) -> Vec<Option<SightHit>> {
    if columns == 0 {
        return Vec::new();
    }
    let slice = field_of_view / columns as f64;
    let left = heading - field_of_view * 0.5;
    (0..columns)
        .map(|column| {
            let angle = left + slice * (column as f64 + 0.5);
            cast_sight_ray(frame, bounds, origin, angle_to_vector(angle), f64::INFINITY, exclude)
        })
        .collect()
}
