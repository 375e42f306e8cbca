//! Game session state
//!
//! Owns the field, the tiles, the gesture and the inventory for one level
//! and exposes the frame loop plus pointer handlers. Everything runs on the
//! caller's thread: physics for a frame finishes before the next pointer
//! event reads tile positions.

use std::collections::BTreeMap;

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::hit::tile_at;
use super::inventory::LevelInventory;
use super::layout::{LayoutReport, scatter};
use super::physics;
use super::selection::{MatchOutcome, SelectionChange, SelectionEngine};
use super::tile::{TileId, TileStore};
use crate::level::Level;
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting gestures
    Playing,
    /// Every requirement met; input is ignored
    Won,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub field: Field,
    pub store: TileStore,
    pub selection: SelectionEngine,
    pub inventory: LevelInventory,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Frames simulated so far
    pub frame: u64,
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
}

impl GameState {
    /// Start a level. Levels without a tile list get a scattered layout
    /// topped up to the target density by the refill.
    pub fn new(level: &Level, settings: Settings, seed: u64) -> Self {
        let field = Field::new(level.width, level.height);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut store = TileStore::new();
        for spec in &level.tiles {
            store.spawn(DVec2::new(spec.x, spec.y), spec.radius, spec.color);
        }

        let mut inventory = LevelInventory::new(level.required.clone(), &field, &settings.refill);

        if store.is_empty() {
            // Scatter a loose resting layout, then drop the rest in from above
            inventory.area_debt = settings.layout.density * field.area();
            let LayoutReport { placed, exhausted, .. } = scatter(
                &mut store,
                &mut inventory,
                &field,
                &settings.refill,
                &settings.layout,
                &mut rng,
            );
            if exhausted {
                log::warn!("Level layout under-filled with {} tiles", placed);
            }
            inventory.area_debt = settings.refill.density * field.area() - store.total_area();
            inventory.refill(&mut store, &field, &settings.refill, &mut rng);
        } else {
            // A supplied tile list is the level's starting state
            inventory.area_debt = 0.0;
        }

        log::info!(
            "Level start: {} tiles on {}x{}, required {:?}",
            store.len(),
            field.width,
            field.height,
            inventory.required
        );

        let phase = if inventory.is_won() {
            GamePhase::Won
        } else {
            GamePhase::Playing
        };

        Self {
            field,
            store,
            selection: SelectionEngine::new(),
            inventory,
            settings,
            phase,
            frame: 0,
            seed,
            rng,
        }
    }

    /// Advance physics by one rendering frame
    pub fn tick(&mut self) {
        physics::step(
            self.store.tiles_mut(),
            self.field.width,
            self.field.height,
            &self.settings.physics,
        );
        self.frame += 1;
    }

    /// Every tile below the configured settle threshold
    pub fn is_settled(&self) -> bool {
        physics::settled(self.store.tiles(), self.settings.settle_threshold)
    }

    /// Pointer pressed: start a chain at the tile under the pointer
    pub fn pointer_down(&mut self, point: DVec2) -> Option<TileId> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let hit = tile_at(&self.store, point)?;
        self.selection.begin(&mut self.store, hit);
        Some(hit)
    }

    /// Pointer dragged: try to extend or rewind the chain
    pub fn pointer_move(&mut self, point: DVec2) -> SelectionChange {
        if self.phase != GamePhase::Playing {
            return SelectionChange::Unchanged;
        }
        let Some(prev) = self.selection.last() else {
            return SelectionChange::Unchanged;
        };
        let Some(curr) = tile_at(&self.store, point) else {
            return SelectionChange::Unchanged;
        };
        self.selection.process_selection(&mut self.store, prev, curr)
    }

    /// Pointer released: commit the chain if it forms a match
    pub fn pointer_up(&mut self) -> Option<MatchOutcome> {
        if self.phase != GamePhase::Playing {
            self.selection.clear(&mut self.store);
            return None;
        }
        let outcome = self.selection.finalize(
            &mut self.store,
            &mut self.inventory,
            &self.field,
            &self.settings.refill,
            &mut self.rng,
        );
        if outcome.is_some() && self.inventory.is_won() {
            self.phase = GamePhase::Won;
            log::info!("Level won after {} frames", self.frame);
        }
        outcome
    }

    pub fn is_won(&self) -> bool {
        self.inventory.is_won()
    }

    pub fn collected(&self) -> &BTreeMap<u32, u32> {
        &self.inventory.collected
    }

    pub fn required(&self) -> &BTreeMap<u32, u32> {
        &self.inventory.required
    }

    /// `(color, collected, required)` rows for a HUD
    pub fn progress(&self) -> Vec<(u32, u32, u32)> {
        self.inventory.progress()
    }
}
