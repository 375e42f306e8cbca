//! Initial non-overlapping layout by rejection sampling
//!
//! Used when a level ships no tile list. Candidates that overlap an
//! existing tile are rejected; the attempt budget bounds the work so a
//! crowded field ends under-filled instead of hanging.

use glam::DVec2;
use rand::Rng;

use super::field::Field;
use super::inventory::{LevelInventory, random_radius, random_x};
use super::tile::TileStore;
use crate::circle_area;
use crate::settings::{LayoutConfig, RefillConfig};

/// Summary of one scatter pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutReport {
    pub placed: usize,
    pub attempts: u32,
    /// Budget ran out before the area debt was paid
    pub exhausted: bool,
}

/// Place tiles inside the field until the inventory's area debt is paid
pub fn scatter(
    store: &mut TileStore,
    inventory: &mut LevelInventory,
    field: &Field,
    refill: &RefillConfig,
    layout: &LayoutConfig,
    rng: &mut impl Rng,
) -> LayoutReport {
    let mut report = LayoutReport {
        placed: 0,
        attempts: 0,
        exhausted: false,
    };

    if inventory.required.is_empty() {
        log::warn!("Layout skipped: no required colors");
        return report;
    }

    let (min_r, max_r) = refill.radius_range(field.diagonal());

    while inventory.area_debt > 0.0 {
        if report.attempts >= layout.max_attempts {
            report.exhausted = true;
            log::warn!(
                "Layout stopped after {} attempts: placed {} tiles, {:.1} area unfilled",
                report.attempts,
                report.placed,
                inventory.area_debt
            );
            break;
        }
        report.attempts += 1;

        let radius = random_radius(rng, min_r, max_r);
        if 2.0 * radius > field.width || 2.0 * radius > field.height {
            continue;
        }
        let x = random_x(rng, field.width, radius);
        let y = rng.random_range(radius..=field.height - radius);
        let pos = DVec2::new(x, y);

        let overlaps = store
            .iter()
            .any(|t| t.pos.distance_squared(pos) < (t.radius() + radius).powi(2));
        if overlaps {
            continue;
        }

        let Some(color) = inventory.random_color(rng) else {
            break;
        };
        store.spawn(pos, radius, color);
        inventory.area_debt -= circle_area(radius);
        report.placed += 1;
    }

    log::debug!("Layout placed {} tiles in {} attempts", report.placed, report.attempts);
    report
}
