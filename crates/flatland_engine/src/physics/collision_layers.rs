//! Collision layers for filtering candidate pairs
//!
//! Each body sits on one or more layers and carries a mask of the layers it
//! collides with. A pair survives only if each side's layer is in the other's
//! mask.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::collision::EntityId;
use super::collision_system::PairFilter;

bitflags! {
    /// Collision layer definitions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionLayers: u32 {
        /// Moving Flatland inhabitants
        const AGENT = 1 << 0;
        /// House walls and doors
        const HOUSE = 1 << 1;
        /// Static world walls
        const WALL = 1 << 2;
        /// Thrown or fired shapes
        const PROJECTILE = 1 << 3;
        /// Non-physical probes (no response expected)
        const SENSOR = 1 << 4;
        /// All collision layers
        const ALL = u32::MAX;
    }
}

impl CollisionLayers {
    /// Check if two bodies should collide based on their layers and masks
    ///
    /// ```
    /// use flatland_engine::physics::CollisionLayers;
    ///
    /// let agent_mask = CollisionLayers::AGENT | CollisionLayers::WALL;
    /// let wall_mask = CollisionLayers::AGENT;
    /// assert!(CollisionLayers::should_collide(
    ///     CollisionLayers::AGENT, agent_mask,
    ///     CollisionLayers::WALL, wall_mask,
    /// ));
    /// ```
    pub fn should_collide(layer_a: Self, mask_a: Self, layer_b: Self, mask_b: Self) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}

/// Layer and mask of a single body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMembership {
    /// Layers the body is on
    pub layer: CollisionLayers,
    /// Layers the body collides with
    pub mask: CollisionLayers,
}

impl Default for LayerMembership {
    fn default() -> Self {
        Self {
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
        }
    }
}

/// Pair filter backed by a per-entity layer lookup
///
/// Entities without an entry use [`LayerMembership::default`].
#[derive(Debug, Clone, Default)]
pub struct LayerFilter {
    memberships: std::collections::BTreeMap<EntityId, LayerMembership>,
}

impl LayerFilter {
    /// Empty filter: everything collides
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a layer and mask to an entity
    pub fn set(&mut self, id: EntityId, layer: CollisionLayers, mask: CollisionLayers) {
        self.memberships.insert(id, LayerMembership { layer, mask });
    }

    /// Builder form of [`LayerFilter::set`]
    pub fn with(mut self, id: EntityId, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.set(id, layer, mask);
        self
    }

    /// Membership of an entity
    pub fn membership(&self, id: EntityId) -> LayerMembership {
        self.memberships.get(&id).copied().unwrap_or_default()
    }
}

impl PairFilter for LayerFilter {
    fn accept(&self, id_a: EntityId, id_b: EntityId) -> bool {
        let a = self.membership(id_a);
        let b = self.membership(id_b);
        CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask)
    }
}
