//! Drag-selection state machine
//!
//! A gesture starts with [`SelectionEngine::begin`], grows or rewinds on
//! every pointer move through [`SelectionEngine::process_selection`], and
//! ends with [`SelectionEngine::finalize`]. Illegal continuations (wrong
//! color, not a Voronoi neighbor) are ignored, never reported as errors.
//!
//! Adjacency is checked once, when a tile is appended. Links are not
//! re-validated if physics later pulls the tiles apart.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::adjacency::is_adjacent;
use super::field::Field;
use super::inventory::LevelInventory;
use super::tile::{TileId, TileStore};
use crate::settings::RefillConfig;

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    /// No chain
    Idle,
    /// Chain holds at least one tile
    Active,
}

/// What a pointer move did to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Nothing happened (same tile, wrong color, not adjacent, or no chain)
    Unchanged,
    Appended(TileId),
    /// Rewound to the given tile; the count of dropped entries
    Backtracked { to: TileId, dropped: usize },
}

/// A committed match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub color: u32,
    /// Removed tiles in chain order
    pub removed: Vec<TileId>,
    /// Exact removed area added to the area debt
    pub area: f64,
    /// Replacement tiles spawned by the refill
    pub spawned: usize,
}

/// Ordered chain of tile handles forming the drag path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionEngine {
    chain: Vec<TileId>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    pub fn state(&self) -> SelectionState {
        if self.chain.is_empty() {
            SelectionState::Idle
        } else {
            SelectionState::Active
        }
    }

    pub fn chain(&self) -> &[TileId] {
        &self.chain
    }

    pub fn last(&self) -> Option<TileId> {
        self.chain.last().copied()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Start a chain at `tile`. Any previous chain is discarded and unhighlighted.
    pub fn begin(&mut self, store: &mut TileStore, tile: TileId) {
        self.clear(store);
        let Some(t) = store.get_mut(tile) else {
            return;
        };
        t.highlighted = true;
        self.chain.push(tile);
    }

    /// Extend or rewind the chain as the pointer moves from `prev` onto `curr`.
    /// `prev` has to be the chain's last tile; anything else is ignored.
    pub fn process_selection(
        &mut self,
        store: &mut TileStore,
        prev: TileId,
        curr: TileId,
    ) -> SelectionChange {
        if curr == prev || self.last() != Some(prev) {
            return SelectionChange::Unchanged;
        }

        let (Some(p), Some(c)) = (store.get(prev), store.get(curr)) else {
            return SelectionChange::Unchanged;
        };
        if p.color != c.color || !is_adjacent(store, prev, curr) {
            log::trace!("Rejected {:?} -> {:?}", prev, curr);
            return SelectionChange::Unchanged;
        }

        match self.chain.iter().position(|&id| id == curr) {
            None => {
                if let Some(t) = store.get_mut(curr) {
                    t.highlighted = true;
                }
                self.chain.push(curr);
                SelectionChange::Appended(curr)
            }
            Some(idx) => {
                let dropped = self.chain.split_off(idx + 1);
                for id in &dropped {
                    if let Some(t) = store.get_mut(*id) {
                        t.highlighted = false;
                    }
                }
                SelectionChange::Backtracked {
                    to: curr,
                    dropped: dropped.len(),
                }
            }
        }
    }

    /// Pointer move onto `curr`, continuing from the chain's last tile
    pub fn drag_to(&mut self, store: &mut TileStore, curr: TileId) -> SelectionChange {
        match self.last() {
            Some(prev) => self.process_selection(store, prev, curr),
            None => SelectionChange::Unchanged,
        }
    }

    /// Drop the chain without committing it
    pub fn clear(&mut self, store: &mut TileStore) {
        for id in self.chain.drain(..) {
            if let Some(t) = store.get_mut(id) {
                t.highlighted = false;
            }
        }
    }

    /// End the gesture. Chains of two or more tiles are removed from the
    /// store, folded into the inventory, and followed by one refill pass.
    pub fn finalize(
        &mut self,
        store: &mut TileStore,
        inventory: &mut LevelInventory,
        field: &Field,
        refill: &RefillConfig,
        rng: &mut impl Rng,
    ) -> Option<MatchOutcome> {
        if self.chain.len() < 2 {
            self.clear(store);
            return None;
        }

        let chain = std::mem::take(&mut self.chain);
        let mut removed = store.remove_many(&chain);
        for tile in &mut removed {
            tile.highlighted = false;
        }
        let color = removed.first().map(|t| t.color)?;

        let debt_before = inventory.area_debt;
        inventory.record_removed(&removed);
        let area = inventory.area_debt - debt_before;

        log::info!(
            "Matched {} tiles of color {} (area {:.1})",
            removed.len(),
            color,
            area
        );

        let spawned = inventory.refill(store, field, refill, rng);

        // Report in drag order
        let removed_ids = chain
            .into_iter()
            .filter(|id| removed.iter().any(|t| t.id == *id))
            .collect();

        Some(MatchOutcome {
            color,
            removed: removed_ids,
            area,
            spawned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::BTreeMap;

    use crate::circle_area;

    struct Fixture {
        store: TileStore,
        inventory: LevelInventory,
        field: Field,
        refill: RefillConfig,
        rng: Pcg32,
        engine: SelectionEngine,
    }

    impl Fixture {
        fn new(required: &[(u32, u32)]) -> Self {
            Self {
                store: TileStore::new(),
                inventory: LevelInventory {
                    required: required.iter().copied().collect::<BTreeMap<_, _>>(),
                    ..Default::default()
                },
                field: Field::new(400.0, 400.0),
                refill: RefillConfig::default(),
                rng: Pcg32::seed_from_u64(1),
                engine: SelectionEngine::new(),
            }
        }

        fn spawn(&mut self, x: f64, y: f64, color: u32) -> TileId {
            self.store.spawn(DVec2::new(x, y), 10.0, color)
        }

        fn finalize(&mut self) -> Option<MatchOutcome> {
            self.engine.finalize(
                &mut self.store,
                &mut self.inventory,
                &self.field,
                &self.refill,
                &mut self.rng,
            )
        }

        fn highlighted(&self, id: TileId) -> bool {
            self.store.get(id).is_some_and(|t| t.highlighted)
        }
    }

    #[test]
    fn test_begin_highlights_and_activates() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        assert_eq!(f.engine.state(), SelectionState::Idle);
        f.engine.begin(&mut f.store, a);
        assert_eq!(f.engine.state(), SelectionState::Active);
        assert_eq!(f.engine.chain(), &[a]);
        assert!(f.highlighted(a));
    }

    #[test]
    fn test_same_tile_is_noop() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        f.engine.begin(&mut f.store, a);
        assert_eq!(
            f.engine.process_selection(&mut f.store, a, a),
            SelectionChange::Unchanged
        );
        assert_eq!(f.engine.len(), 1);
    }

    #[test]
    fn test_wrong_color_ignored() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 2);
        f.engine.begin(&mut f.store, a);
        assert_eq!(f.engine.drag_to(&mut f.store, b), SelectionChange::Unchanged);
        assert!(!f.highlighted(b));
    }

    #[test]
    fn test_non_adjacent_ignored() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        let _blocker = f.spawn(10.0, 0.0, 2);
        let c = f.spawn(20.0, 0.0, 1);
        f.engine.begin(&mut f.store, a);
        assert_eq!(f.engine.drag_to(&mut f.store, c), SelectionChange::Unchanged);
        assert_eq!(f.engine.chain(), &[a]);
    }

    #[test]
    fn test_backtrack_truncates_and_unhighlights() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 1);
        let c = f.spawn(12.5, 50.0, 1);
        f.engine.begin(&mut f.store, a);
        assert_eq!(f.engine.process_selection(&mut f.store, a, b), SelectionChange::Appended(b));
        assert_eq!(f.engine.process_selection(&mut f.store, b, c), SelectionChange::Appended(c));
        assert_eq!(f.engine.chain(), &[a, b, c]);

        let change = f.engine.process_selection(&mut f.store, c, b);
        assert_eq!(change, SelectionChange::Backtracked { to: b, dropped: 1 });
        assert_eq!(f.engine.chain(), &[a, b]);
        assert!(!f.highlighted(c));
        assert!(f.highlighted(a) && f.highlighted(b));
    }

    #[test]
    fn test_backtrack_to_start_keeps_first_tile() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 1);
        let c = f.spawn(12.5, 50.0, 1);
        f.engine.begin(&mut f.store, a);
        f.engine.drag_to(&mut f.store, b);
        f.engine.drag_to(&mut f.store, c);
        // c touches a directly
        let change = f.engine.drag_to(&mut f.store, a);
        assert_eq!(change, SelectionChange::Backtracked { to: a, dropped: 2 });
        assert_eq!(f.engine.chain(), &[a]);
    }

    #[test]
    fn test_finalize_empty_is_noop() {
        let mut f = Fixture::new(&[(1, 3)]);
        f.spawn(0.0, 0.0, 1);
        assert!(f.finalize().is_none());
        assert_eq!(f.store.len(), 1);
    }

    #[test]
    fn test_finalize_single_tile_deselects() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        f.engine.begin(&mut f.store, a);
        assert!(f.finalize().is_none());
        assert!(!f.highlighted(a));
        assert!(f.engine.is_empty());
        assert_eq!(f.inventory.collected(1), 0);
        assert_eq!(f.inventory.area_debt, 0.0);
        assert_eq!(f.store.len(), 1);
    }

    #[test]
    fn test_concrete_three_tile_match() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 1);
        let c = f.spawn(12.5, 50.0, 1);
        assert!(is_adjacent(&f.store, a, b));

        f.engine.begin(&mut f.store, a);
        f.engine.process_selection(&mut f.store, a, b);
        f.engine.process_selection(&mut f.store, b, c);
        let outcome = f.finalize().expect("three-tile chain commits");

        assert_eq!(outcome.color, 1);
        assert_eq!(outcome.removed, vec![a, b, c]);
        assert_eq!(f.inventory.collected(1), 3);
        assert!(f.inventory.is_won());
        assert!(f.engine.is_empty());
        for id in [a, b, c] {
            assert!(!f.store.contains(id));
        }
        // Debt grew by exactly the removed area, then the refill paid it
        assert!((outcome.area - 3.0 * circle_area(10.0)).abs() < 1e-9);
        assert!(outcome.spawned > 0);
        assert_eq!(f.store.len(), outcome.spawned);
        assert!(f.inventory.area_debt <= 0.0);
        assert!(f.store.iter().all(|t| !t.highlighted));
    }

    #[test]
    fn test_stale_prev_cannot_extend_chain() {
        let mut f = Fixture::new(&[(1, 3), (2, 2)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 1);
        let x = f.spawn(300.0, 300.0, 2);
        let y = f.spawn(325.0, 300.0, 2);
        assert!(is_adjacent(&f.store, x, y));

        f.engine.begin(&mut f.store, a);
        assert_eq!(f.engine.process_selection(&mut f.store, a, b), SelectionChange::Appended(b));
        // x -> y is a legal step on its own, but x is not the chain's tail
        assert_eq!(f.engine.process_selection(&mut f.store, x, y), SelectionChange::Unchanged);
        // Neither is a tile already behind the tail
        assert_eq!(f.engine.process_selection(&mut f.store, a, b), SelectionChange::Unchanged);
        assert_eq!(f.engine.chain(), &[a, b]);
        assert!(!f.highlighted(y));

        let outcome = f.finalize().unwrap();
        assert_eq!(outcome.color, 1);
        assert_eq!(outcome.removed, vec![a, b]);
    }

    #[test]
    fn test_process_without_chain_is_noop() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 1);
        assert_eq!(f.engine.process_selection(&mut f.store, a, b), SelectionChange::Unchanged);
        assert!(f.engine.is_empty());
        assert!(!f.highlighted(b));
    }

    #[test]
    fn test_begin_replaces_previous_chain() {
        let mut f = Fixture::new(&[(1, 3)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 1);
        f.engine.begin(&mut f.store, a);
        f.engine.begin(&mut f.store, b);
        assert_eq!(f.engine.chain(), &[b]);
        assert!(!f.highlighted(a));
    }

    #[test]
    fn test_untouched_tiles_survive_match() {
        let mut f = Fixture::new(&[(1, 2), (2, 1)]);
        let a = f.spawn(0.0, 0.0, 1);
        let b = f.spawn(25.0, 0.0, 1);
        let other = f.spawn(12.5, 50.0, 2);
        f.engine.begin(&mut f.store, a);
        f.engine.drag_to(&mut f.store, b);
        let outcome = f.finalize().unwrap();
        assert_eq!(outcome.removed.len(), 2);
        assert!(f.store.contains(other));
        assert_eq!(f.inventory.collected(2), 0);
    }
}
