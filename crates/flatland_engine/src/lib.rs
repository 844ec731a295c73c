//! # Flatland Engine
//!
//! 2D geometry and collision engine for a world of shaped agents: circles,
//! line segments and convex polygons that bump, pierce and look at each other.
//!
//! ## Features
//!
//! - **Shape Geometry**: model-space descriptors snapshotted into world space every tick
//! - **Broad Phase**: deterministic spatial hash over inflated bounding boxes
//! - **Narrow Phase**: contact manifolds with support features, symmetric under argument order
//! - **Contact Classification**: blunt touches versus sharp vertex strikes
//! - **Perception**: ray casts, vision cones and a panoramic flatlander view
//! - **Picking**: point-under-cursor selection with tolerance
//!
//! ## Quick Start
//!
//! ```rust
//! use flatland_engine::prelude::*;
//!
//! let mut pipeline = CollisionPipeline::new(CollisionConfig::default())?;
//! let bodies = vec![
//!     CollisionBody::new(1, Transform2::from_position(Vec2::new(0.0, 0.0)), ShapeDescriptor::circle(10.0)?),
//!     CollisionBody::new(2, Transform2::from_position(Vec2::new(15.0, 0.0)), ShapeDescriptor::circle(10.0)?),
//! ];
//! let frame = pipeline.run(&bodies, &AcceptAll)?;
//! assert_eq!(frame.contacts().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{CollisionConfig, FlatlandConfig, VisionConfig, WorldConfig},
        foundation::math::{Transform2, Vec2, EPSILON},
        input::picking::pick_entity,
        physics::{
            cast_sight_ray, flatlander_view, AcceptAll, CollisionBody, CollisionError, CollisionFrame,
            CollisionLayers, CollisionManifold, CollisionPair, CollisionPipeline, Contact, ContactKind,
            EntityId, GeometryShape, LayerFilter, PairFilter, ShapeDescriptor, SightHit, SightTarget,
            SupportFeature, VisionCone,
        },
        physics::collision::{ShapeError, WallSide, WorldBounds},
        spatial::{BroadPhase, SpatialHashGrid},
    };
}
