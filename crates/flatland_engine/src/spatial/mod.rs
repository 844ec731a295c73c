//! Spatial partitioning for the broad phase
//!
//! A broad phase culls pairs that cannot possibly collide. Implementations
//! must be deterministic: identical item sets yield identical pair lists no
//! matter the input order.

mod spatial_hash;

pub use spatial_hash::{brute_force_pairs, SpatialHashGrid, MAX_CELLS_PER_ITEM};

use crate::physics::collision::{Aabb, EntityId};

/// Broad-phase candidate pair search
pub trait BroadPhase {
    /// Candidate pairs `(low, high)` with overlapping boxes, sorted and unique
    fn find_pairs(&self, items: &[(EntityId, Aabb)]) -> Vec<(EntityId, EntityId)>;
}
