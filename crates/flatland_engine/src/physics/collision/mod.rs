//! Geometry and narrow-phase collision for shaped agents
//!
//! Everything here is 2D and operates on world-space snapshots.
//!
//! # Architecture
//!
//! - **Model Space Storage**: entities carry a [`ShapeDescriptor`]
//! - **Snapshot Per Tick**: descriptors are transformed once into [`GeometryShape`]
//! - **Canonical Pairs**: manifolds are computed in a fixed orientation and mirrored
//!
//! # Module Organization
//!
//! - [`primitives`] - AABBs, segment and polygon helpers
//! - [`shape`] - Shape descriptors and world-space geometry
//! - [`intersection`] - Boolean overlap tests (SAT for polygons)
//! - [`manifold`] - Contact normal, depth, point and features
//! - [`contact`] - Support features and blunt/sharp classification
//! - [`raycast`] - Ray casts against shapes and the world boundary

pub mod contact;
pub mod intersection;
pub mod manifold;
pub mod primitives;
pub mod raycast;
pub mod shape;

/// Identifier of an entity owning a shape
pub type EntityId = u32;

pub use contact::{classify_contact, ContactClassification, ContactKind, SupportFeature};
pub use intersection::shapes_intersect;
pub use manifold::{compute_manifold, CollisionManifold, ManifoldContext};
pub use primitives::Aabb;
pub use raycast::{raycast_shape, raycast_world_bounds, Ray, WallSide, WorldBounds};
pub use shape::{GeometryShape, ShapeDescriptor, ShapeError, ShapeKind};
