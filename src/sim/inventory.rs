//! Level progress and area-debt refill
//!
//! Removing tiles adds their exact area to `area_debt`; the refill pays it
//! back by dropping new tiles in from above the field. Total tile area on
//! the field therefore trends back to the configured density instead of
//! drifting.

use std::collections::BTreeMap;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::tile::{Tile, TileStore};
use crate::circle_area;
use crate::settings::RefillConfig;

/// Required vs collected counts per color plus outstanding area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelInventory {
    pub required: BTreeMap<u32, u32>,
    pub collected: BTreeMap<u32, u32>,
    /// Circle area owed to the field
    pub area_debt: f64,
}

impl LevelInventory {
    /// Inventory for a fresh level. The debt starts at the target density of the field.
    pub fn new(required: BTreeMap<u32, u32>, field: &Field, refill: &RefillConfig) -> Self {
        Self {
            required,
            collected: BTreeMap::new(),
            area_debt: refill.density * field.area(),
        }
    }

    /// Fold removed tiles into the counts and the debt
    pub fn record_removed(&mut self, removed: &[Tile]) {
        for tile in removed {
            *self.collected.entry(tile.color).or_insert(0) += 1;
            self.area_debt += tile.area();
        }
    }

    pub fn collected(&self, color: u32) -> u32 {
        self.collected.get(&color).copied().unwrap_or(0)
    }

    pub fn required(&self, color: u32) -> u32 {
        self.required.get(&color).copied().unwrap_or(0)
    }

    /// Tiles of `color` still needed
    pub fn remaining(&self, color: u32) -> u32 {
        self.required(color).saturating_sub(self.collected(color))
    }

    /// Every required color collected at least as often as required
    pub fn is_won(&self) -> bool {
        self.required
            .iter()
            .all(|(&color, &needed)| self.collected(color) >= needed)
    }

    /// `(color, collected, required)` rows for a HUD, in color order
    pub fn progress(&self) -> Vec<(u32, u32, u32)> {
        self.required
            .iter()
            .map(|(&color, &needed)| (color, self.collected(color), needed))
            .collect()
    }

    /// Draw a color uniformly from the required set
    pub fn random_color(&self, rng: &mut impl Rng) -> Option<u32> {
        if self.required.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.required.len());
        self.required.keys().nth(index).copied()
    }

    /// Spawn tiles above the field until the debt is paid. Returns the number spawned.
    pub fn refill(
        &mut self,
        store: &mut TileStore,
        field: &Field,
        config: &RefillConfig,
        rng: &mut impl Rng,
    ) -> usize {
        if self.area_debt <= 0.0 {
            return 0;
        }
        if self.required.is_empty() {
            log::warn!(
                "Refill skipped: no required colors (area debt {:.1} left unpaid)",
                self.area_debt
            );
            return 0;
        }

        let (min_r, max_r) = config.radius_range(field.diagonal());
        if !(min_r > 0.0) {
            log::warn!("Refill skipped: non-positive radius range for field {:?}", field);
            return 0;
        }

        let mut spawned = 0;
        while self.area_debt > 0.0 {
            let Some(color) = self.random_color(rng) else {
                break;
            };
            let radius = random_radius(rng, min_r, max_r);
            let x = random_x(rng, field.width, radius);
            let y = -(radius + rng.random::<f64>() * config.spawn_band_fraction * field.height);
            store.spawn(DVec2::new(x, y), radius, color);
            self.area_debt -= circle_area(radius);
            spawned += 1;
        }

        log::debug!(
            "Refill spawned {} tiles (debt now {:.1})",
            spawned,
            self.area_debt
        );
        spawned
    }
}

pub(crate) fn random_radius(rng: &mut impl Rng, min_r: f64, max_r: f64) -> f64 {
    if max_r > min_r {
        rng.random_range(min_r..=max_r)
    } else {
        min_r
    }
}

/// Uniform x keeping the tile inside the walls when it fits
pub(crate) fn random_x(rng: &mut impl Rng, width: f64, radius: f64) -> f64 {
    if width > 2.0 * radius {
        rng.random_range(radius..=width - radius)
    } else {
        width * 0.5
    }
}
