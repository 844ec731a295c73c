//! Physics module for collision detection and perception
//!
//! Provides shape geometry, broad-phase culling through the spatial hash,
//! narrow-phase manifolds with contact classification, and the ray-based
//! sight queries built on top of a tick's [`CollisionFrame`].

pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod sight;

#[cfg(test)]
mod tests;

pub use collision::{
    CollisionManifold,
    ContactClassification,
    ContactKind,
    EntityId,
    GeometryShape,
    ShapeDescriptor,
    SupportFeature,
};
pub use collision_layers::{CollisionLayers, LayerFilter};
pub use collision_system::{
    AcceptAll,
    CollisionBody,
    CollisionError,
    CollisionFrame,
    CollisionPair,
    CollisionPipeline,
    Contact,
    PairFilter,
    PipelineStage,
};
pub use sight::{cast_sight_ray, flatlander_view, SightFeature, SightHit, SightTarget, VisionCone};
