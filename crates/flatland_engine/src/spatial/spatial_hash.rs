//! Uniform spatial hash grid

use std::collections::{BTreeMap, BTreeSet};

use crate::physics::collision::{Aabb, EntityId};
use super::BroadPhase;

type CellKey = (i64, i64);

/// Items spanning more cells than this skip the grid and are tested against
/// every other box directly
pub const MAX_CELLS_PER_ITEM: i64 = 4096;

/// Spatial hash grid broad phase for O(n) average-case pair detection.
///
/// Buckets live in ordered maps so iteration order never depends on hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialHashGrid {
    cell_size: f64,
}

impl SpatialHashGrid {
    /// Create a grid with square cells of `cell_size`
    ///
    /// # Panics
    /// Panics unless `cell_size` is positive and finite.
    pub fn new(cell_size: f64) -> Self {
        assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "cell size must be positive, got {}",
            cell_size
        );
        Self { cell_size }
    }

    /// Edge length of a cell
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Cell coordinates containing a point
    #[inline]
    fn cell_coords(&self, x: f64, y: f64) -> CellKey {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    /// Every cell a box touches, or `None` when that exceeds [`MAX_CELLS_PER_ITEM`]
    fn covered_cells(&self, aabb: &Aabb) -> Option<impl Iterator<Item = CellKey>> {
        let (min_cx, min_cy) = self.cell_coords(aabb.min_x, aabb.min_y);
        let (max_cx, max_cy) = self.cell_coords(aabb.max_x, aabb.max_y);
        let columns = max_cx.saturating_sub(min_cx).saturating_add(1);
        let rows = max_cy.saturating_sub(min_cy).saturating_add(1);
        if columns.saturating_mul(rows) > MAX_CELLS_PER_ITEM {
            return None;
        }
        Some((min_cx..=max_cx).flat_map(move |cx| (min_cy..=max_cy).map(move |cy| (cx, cy))))
    }
}

impl BroadPhase for SpatialHashGrid {
    fn find_pairs(&self, items: &[(EntityId, Aabb)]) -> Vec<(EntityId, EntityId)> {
        let mut cells: BTreeMap<CellKey, Vec<usize>> = BTreeMap::new();
        let mut oversized = Vec::new();
        for (index, (_, aabb)) in items.iter().enumerate() {
            match self.covered_cells(aabb) {
                Some(keys) => {
                    for key in keys {
                        cells.entry(key).or_default().push(index);
                    }
                }
                None => oversized.push(index),
            }
        }

        let mut pairs = BTreeSet::new();
        for &index in &oversized {
            let (id_a, aabb_a) = &items[index];
            for (id_b, aabb_b) in items {
                if id_a != id_b && aabb_a.overlaps(aabb_b) {
                    pairs.insert((*id_a.min(id_b), *id_a.max(id_b)));
                }
            }
        }
        for members in cells.values_mut() {
            members.sort_by_key(|&index| items[index].0);
            for (i, &first) in members.iter().enumerate() {
                for &second in &members[i + 1..] {
                    let (id_a, aabb_a) = &items[first];
                    let (id_b, aabb_b) = &items[second];
                    if id_a == id_b {
                        continue;
                    }
                    if aabb_a.overlaps(aabb_b) {
                        pairs.insert((*id_a.min(id_b), *id_a.max(id_b)));
                    }
                }
            }
        }

        log::trace!(
            "Spatial hash: {} items, {} cells, {} oversized, {} pairs",
            items.len(),
            cells.len(),
            oversized.len(),
            pairs.len()
        );
        pairs.into_iter().collect()
    }
}

/// Reference O(n²) pair search with the same output contract
pub fn brute_force_pairs(items: &[(EntityId, Aabb)]) -> Vec<(EntityId, EntityId)> {
    let mut pairs = BTreeSet::new();
    for (i, (id_a, aabb_a)) in items.iter().enumerate() {
        for (id_b, aabb_b) in &items[i + 1..] {
            if id_a != id_b && aabb_a.overlaps(aabb_b) {
                pairs.insert((*id_a.min(id_b), *id_a.max(id_b)));
            }
        }
    }
    pairs.into_iter().collect()
}
