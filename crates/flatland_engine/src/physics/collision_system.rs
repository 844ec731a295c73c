//! Per-tick collision pipeline
//!
//! Splits detection into a broad phase (spatial hash over inflated AABBs)
//! and a narrow phase (exact manifolds), then publishes everything as one
//! [`CollisionFrame`]. Nothing carries over between ticks.
//!
//! The pipeline never hardcodes domain rules: callers decide which pairs are
//! worth testing through a [`PairFilter`].

use std::collections::BTreeMap;
use std::fmt;

use crate::config::ConfigError;
use crate::core::config::CollisionConfig;
use crate::foundation::math::{Transform2, Vec2, EPSILON};
use crate::physics::collision::{
    classify_contact, compute_manifold, Aabb, CollisionManifold, ContactClassification, EntityId, GeometryShape,
    ManifoldContext, ShapeDescriptor,
};
use crate::spatial::{BroadPhase, SpatialHashGrid};

/// Collision pipeline errors
#[derive(thiserror::Error, Debug)]
pub enum CollisionError {
    /// Two bodies submitted with the same id in one tick
    #[error("entity {0} submitted more than once")]
    DuplicateEntity(EntityId),

    /// Collision configuration rejected
    #[error("invalid collision configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Collision pair with the smaller entity id first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollisionPair {
    /// Lower id
    pub entity_a: EntityId,
    /// Higher id
    pub entity_b: EntityId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller id first)
    pub fn new(entity_a: EntityId, entity_b: EntityId) -> Self {
        if entity_a <= entity_b {
            Self { entity_a, entity_b }
        } else {
            Self {
                entity_a: entity_b,
                entity_b: entity_a,
            }
        }
    }

    /// Whether `id` is one of the two entities
    pub fn involves(&self, id: EntityId) -> bool {
        self.entity_a == id || self.entity_b == id
    }

    /// The entity paired with `id`
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// Decides whether a broad-phase pair goes on to the narrow phase
pub trait PairFilter {
    /// `true` to keep the pair `(id_a, id_b)`, with `id_a < id_b`
    fn accept(&self, id_a: EntityId, id_b: EntityId) -> bool;
}

impl<F> PairFilter for F
where
    F: Fn(EntityId, EntityId) -> bool,
{
    fn accept(&self, id_a: EntityId, id_b: EntityId) -> bool {
        self(id_a, id_b)
    }
}

/// Filter keeping every pair
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PairFilter for AcceptAll {
    fn accept(&self, _id_a: EntityId, _id_b: EntityId) -> bool {
        true
    }
}

/// One body's input for a tick
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBody {
    /// Owning entity
    pub id: EntityId,
    /// World transform this tick
    pub transform: Transform2,
    /// Model-space shape
    pub shape: ShapeDescriptor,
    /// Velocity used for closing speeds
    pub velocity: Vec2,
}

impl CollisionBody {
    /// Body at rest
    pub fn new(id: EntityId, transform: Transform2, shape: ShapeDescriptor) -> Self {
        Self {
            id,
            transform,
            shape,
            velocity: Vec2::zeros(),
        }
    }

    /// Builder for the velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// A confirmed contact, oriented from `pair.entity_a` to `pair.entity_b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// The colliding pair
    pub pair: CollisionPair,
    /// Normal points from `pair.entity_a` toward `pair.entity_b`
    pub manifold: CollisionManifold,
    /// Blunt/sharp classification
    pub classification: ContactClassification,
}

impl Contact {
    /// Manifold and classification as seen from `id` (its side is A)
    pub fn oriented_for(&self, id: EntityId) -> Option<(CollisionManifold, ContactClassification)> {
        if id == self.pair.entity_a {
            Some((self.manifold, self.classification))
        } else if id == self.pair.entity_b {
            Some((self.manifold.inverted(), self.classification.swapped()))
        } else {
            None
        }
    }
}

/// Write-once snapshot of one tick's collision state
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionFrame {
    geometries: BTreeMap<EntityId, GeometryShape>,
    candidate_pairs: Vec<CollisionPair>,
    collision_pairs: Vec<CollisionPair>,
    contacts: Vec<Contact>,
    line_radius: f64,
}

impl CollisionFrame {
    /// World-space shapes by entity
    pub fn geometries(&self) -> &BTreeMap<EntityId, GeometryShape> {
        &self.geometries
    }

    /// World-space shape of one entity
    pub fn geometry(&self, id: EntityId) -> Option<&GeometryShape> {
        self.geometries.get(&id)
    }

    /// Broad-phase pairs that passed the filter, sorted
    pub fn candidate_pairs(&self) -> &[CollisionPair] {
        &self.candidate_pairs
    }

    /// Narrow-phase confirmed pairs, sorted
    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.collision_pairs
    }

    /// Contacts in the same order as [`Self::collision_pairs`]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Contacts involving `id`
    pub fn contacts_for(&self, id: EntityId) -> impl Iterator<Item = &Contact> + '_ {
        self.contacts.iter().filter(move |c| c.pair.involves(id))
    }

    /// Contact between two entities, in stored orientation
    pub fn contact_between(&self, id_a: EntityId, id_b: EntityId) -> Option<&Contact> {
        let pair = CollisionPair::new(id_a, id_b);
        self.contacts
            .binary_search_by(|c| c.pair.cmp(&pair))
            .ok()
            .map(|index| &self.contacts[index])
    }

    /// Whether two entities collide this tick
    pub fn is_colliding(&self, id_a: EntityId, id_b: EntityId) -> bool {
        self.contact_between(id_a, id_b).is_some()
    }

    /// Capsule radius used for segments this tick
    pub fn line_radius(&self) -> f64 {
        self.line_radius
    }
}

/// Pipeline stage, advanced once per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Between ticks
    Idle,
    /// Transforming descriptors into world-space geometry
    RebuildGeometry,
    /// Finding candidate pairs
    BroadPhase,
    /// Computing manifolds
    NarrowPhase,
    /// Assembling the frame
    Publish,
}

/// Collision pipeline (broad phase + narrow phase)
pub struct CollisionPipeline {
    config: CollisionConfig,
    broad_phase: Box<dyn BroadPhase>,
    stage: PipelineStage,
}

impl fmt::Debug for CollisionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionPipeline")
            .field("config", &self.config)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl CollisionPipeline {
    /// Create a pipeline using a spatial hash broad phase
    pub fn new(config: CollisionConfig) -> Result<Self, CollisionError> {
        config.validate()?;
        let grid = SpatialHashGrid::new(config.spatial_hash_cell_size);
        Ok(Self::with_broad_phase(config, Box::new(grid)))
    }

    /// Create a pipeline with a custom broad phase
    pub fn with_broad_phase(config: CollisionConfig, broad_phase: Box<dyn BroadPhase>) -> Self {
        Self {
            config,
            broad_phase,
            stage: PipelineStage::Idle,
        }
    }

    /// Current stage
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Configuration in use
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    fn enter(&mut self, stage: PipelineStage) {
        log::trace!("Collision pipeline: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    /// Run one tick over `bodies` and publish the frame
    pub fn run<F>(&mut self, bodies: &[CollisionBody], filter: &F) -> Result<CollisionFrame, CollisionError>
    where
        F: PairFilter + ?Sized,
    {
        self.enter(PipelineStage::RebuildGeometry);
        let mut geometries = BTreeMap::new();
        let mut velocities = BTreeMap::new();
        for body in bodies {
            if geometries
                .insert(body.id, body.shape.to_world_space(&body.transform))
                .is_some()
            {
                self.enter(PipelineStage::Idle);
                return Err(CollisionError::DuplicateEntity(body.id));
            }
            velocities.insert(body.id, body.velocity);
        }

        self.enter(PipelineStage::BroadPhase);
        // Boxes cover the capsule radius plus the narrow phase's touch tolerance
        let line_radius = self.config.line_radius;
        let inflation = line_radius + EPSILON;
        let items: Vec<(EntityId, Aabb)> = geometries
            .iter()
            .map(|(id, shape)| (*id, shape.aabb(inflation)))
            .collect();
        let candidate_pairs: Vec<CollisionPair> = self
            .broad_phase
            .find_pairs(&items)
            .into_iter()
            .filter(|&(a, b)| filter.accept(a, b))
            .map(|(a, b)| CollisionPair::new(a, b))
            .collect();

        self.enter(PipelineStage::NarrowPhase);
        let mut collision_pairs = Vec::new();
        let mut contacts = Vec::new();
        for &pair in &candidate_pairs {
            let (Some(shape_a), Some(shape_b)) = (geometries.get(&pair.entity_a), geometries.get(&pair.entity_b))
            else {
                continue;
            };

            let ctx = ManifoldContext::new(pair.entity_a, pair.entity_b, &self.config);
            let Some(manifold) = compute_manifold(shape_a, shape_b, &ctx) else {
                continue;
            };

            let velocity_a = velocities.get(&pair.entity_a).copied().unwrap_or_else(Vec2::zeros);
            let velocity_b = velocities.get(&pair.entity_b).copied().unwrap_or_else(Vec2::zeros);
            let manifold = manifold.with_closing_speed(velocity_a, velocity_b);
            let classification = classify_contact(
                &manifold,
                shape_a,
                shape_b,
                line_radius,
                self.config.vertex_contact_epsilon,
            );

            collision_pairs.push(pair);
            contacts.push(Contact {
                pair,
                manifold,
                classification,
            });
        }

        self.enter(PipelineStage::Publish);
        log::debug!(
            "Collision tick: {} bodies, {} candidates, {} contacts",
            geometries.len(),
            candidate_pairs.len(),
            contacts.len()
        );
        let frame = CollisionFrame {
            geometries,
            candidate_pairs,
            collision_pairs,
            contacts,
            line_radius,
        };

        self.enter(PipelineStage::Idle);
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::EPSILON;
    use crate::physics::collision::ContactKind;
    use crate::physics::collision_layers::{CollisionLayers, LayerFilter};
    use approx::assert_relative_eq;

    fn circle_body(id: EntityId, x: f64, y: f64, radius: f64) -> CollisionBody {
        CollisionBody::new(
            id,
            Transform2::from_position(Vec2::new(x, y)),
            ShapeDescriptor::circle(radius).unwrap(),
        )
    }

    fn pipeline() -> CollisionPipeline {
        CollisionPipeline::new(CollisionConfig::default()).unwrap()
    }

    #[test]
    fn test_collision_detection() {
        let mut system = pipeline();
        let bodies = vec![circle_body(1, 0.0, 0.0, 10.0), circle_body(2, 15.0, 0.0, 10.0)];
        let frame = system.run(&bodies, &AcceptAll).unwrap();

        assert_eq!(frame.collision_pairs(), &[CollisionPair::new(1, 2)]);
        let contact = frame.contact_between(2, 1).unwrap();
        assert_relative_eq!(contact.manifold.penetration, 5.0, epsilon = EPSILON);
        assert_relative_eq!(contact.manifold.normal.x, 1.0, epsilon = EPSILON);
        assert_eq!(system.stage(), PipelineStage::Idle);
    }

    #[test]
    fn test_separated_bodies() {
        let mut system = pipeline();
        let bodies = vec![circle_body(1, 0.0, 0.0, 10.0), circle_body(2, 30.0, 0.0, 10.0)];
        let frame = system.run(&bodies, &AcceptAll).unwrap();
        assert!(frame.collision_pairs().is_empty());
        assert!(frame.contacts().is_empty());
    }

    #[test]
    fn test_near_touching_without_line_radius() {
        let config = CollisionConfig {
            line_radius: 0.0,
            ..CollisionConfig::default()
        };
        let mut system = CollisionPipeline::new(config).unwrap();
        // Gap smaller than the touch tolerance
        let bodies = vec![circle_body(1, 0.0, 0.0, 10.0), circle_body(2, 20.000_000_5, 0.0, 10.0)];
        let frame = system.run(&bodies, &AcceptAll).unwrap();

        assert_eq!(frame.candidate_pairs(), &[CollisionPair::new(1, 2)]);
        assert_eq!(frame.contacts().len(), 1);
        assert_relative_eq!(frame.contacts()[0].manifold.penetration, 0.0);

        let apart = vec![circle_body(1, 0.0, 0.0, 10.0), circle_body(2, 20.01, 0.0, 10.0)];
        assert!(system.run(&apart, &AcceptAll).unwrap().contacts().is_empty());
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut system = pipeline();
        let bodies = vec![circle_body(4, 0.0, 0.0, 1.0), circle_body(4, 1.0, 0.0, 1.0)];
        let result = system.run(&bodies, &AcceptAll);
        assert!(matches!(result, Err(CollisionError::DuplicateEntity(4))));
        assert_eq!(system.stage(), PipelineStage::Idle);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CollisionConfig {
            spatial_hash_cell_size: -1.0,
            ..CollisionConfig::default()
        };
        assert!(matches!(CollisionPipeline::new(config), Err(CollisionError::Config(_))));
    }

    #[test]
    fn test_closure_filter() {
        let mut system = pipeline();
        let bodies = vec![
            circle_body(1, 0.0, 0.0, 10.0),
            circle_body(2, 15.0, 0.0, 10.0),
            circle_body(3, 5.0, 5.0, 10.0),
        ];
        let skip_one_two = |a: EntityId, b: EntityId| !(a == 1 && b == 2);
        let frame = system.run(&bodies, &skip_one_two).unwrap();

        assert!(!frame.candidate_pairs().contains(&CollisionPair::new(1, 2)));
        assert_eq!(
            frame.collision_pairs(),
            &[CollisionPair::new(1, 3), CollisionPair::new(2, 3)]
        );
        assert_eq!(frame.contacts_for(3).count(), 2);
        assert_eq!(frame.contacts_for(1).count(), 1);
    }

    #[test]
    fn test_layer_filter() {
        let mut system = pipeline();
        let bodies = vec![circle_body(1, 0.0, 0.0, 10.0), circle_body(2, 8.0, 0.0, 5.0)];
        let filter = LayerFilter::new()
            .with(1, CollisionLayers::AGENT, CollisionLayers::AGENT)
            .with(2, CollisionLayers::SENSOR, CollisionLayers::ALL);
        let frame = system.run(&bodies, &filter).unwrap();
        assert!(frame.collision_pairs().is_empty());
    }

    #[test]
    fn test_closing_speed_and_orientation() {
        let mut system = pipeline();
        let bodies = vec![
            circle_body(1, 0.0, 0.0, 10.0).with_velocity(Vec2::new(2.0, 0.0)),
            circle_body(2, 15.0, 0.0, 10.0).with_velocity(Vec2::new(-3.0, 0.0)),
        ];
        let frame = system.run(&bodies, &AcceptAll).unwrap();
        let contact = frame.contacts()[0];
        assert_relative_eq!(contact.manifold.closing_speed, 5.0, epsilon = EPSILON);

        let (from_two, _) = contact.oriented_for(2).unwrap();
        assert_relative_eq!(from_two.normal.x, -1.0, epsilon = EPSILON);
        assert!(contact.oriented_for(3).is_none());
    }

    #[test]
    fn test_segment_tip_is_sharp() {
        let mut system = pipeline();
        let needle = CollisionBody::new(
            1,
            Transform2::from_position(Vec2::new(-5.0, 0.0)),
            ShapeDescriptor::segment(10.0).unwrap(),
        );
        let bodies = vec![needle, circle_body(2, 10.5, 0.0, 10.0)];
        let frame = system.run(&bodies, &AcceptAll).unwrap();

        let contact = frame.contact_between(1, 2).unwrap();
        assert_eq!(contact.classification.kind, ContactKind::Vertex);
        assert_eq!(contact.classification.vertex_angle_a, Some(0.0));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let bodies = vec![
            circle_body(5, 0.0, 0.0, 10.0),
            circle_body(2, 12.0, 3.0, 6.0),
            CollisionBody::new(
                9,
                Transform2::new(Vec2::new(6.0, -8.0), 0.7),
                ShapeDescriptor::regular_polygon(3, 8.0).unwrap(),
            ),
            CollisionBody::new(
                1,
                Transform2::new(Vec2::new(4.0, 6.0), 1.2),
                ShapeDescriptor::segment(20.0).unwrap(),
            ),
        ];
        let mut reversed = bodies.clone();
        reversed.reverse();

        let mut system = pipeline();
        let forward = system.run(&bodies, &AcceptAll).unwrap();
        let backward = system.run(&reversed, &AcceptAll).unwrap();
        assert_eq!(forward, backward);
    }
}
