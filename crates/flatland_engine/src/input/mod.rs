//! Pointer input helpers
//!
//! Picking maps a point in world space onto the entity under it.

pub mod picking;

pub use picking::{pick_entity, PickHit};
