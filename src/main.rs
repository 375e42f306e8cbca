//! Voronoi Mosaic headless driver
//!
//! Loads (or generates) a level and lets a simple auto-player clear it:
//! wait for the field to settle, pick an adjacent same-colored chain,
//! replay it as pointer events, repeat.
//!
//! Usage: `voronoi-mosaic [level.json] [settings.json]`

use std::collections::BTreeMap;

use glam::DVec2;

use voronoi_mosaic::render::{TileInstance, write_instances};
use voronoi_mosaic::sim::physics::max_speed;
use voronoi_mosaic::sim::{GamePhase, GameState, TileId, TileStore, neighbors};
use voronoi_mosaic::{Level, Settings};

/// Frames the demo may run before giving up
const FRAME_BUDGET: u64 = 60 * 600;
/// Frames to wait for a settle before moving anyway
const MAX_SETTLE_FRAMES: u32 = 180;
/// Longest chain the auto-player will try to build
const MAX_CHAIN: usize = 6;

fn demo_level() -> Level {
    Level {
        width: 480.0,
        height: 720.0,
        tiles: Vec::new(),
        required: BTreeMap::from([(0, 12), (1, 12), (2, 12), (3, 12)]),
    }
}

/// Greedy walk over same-colored Voronoi neighbors starting at `start`
fn plan_chain(store: &TileStore, start: TileId) -> Vec<TileId> {
    let Some(color) = store.get(start).map(|t| t.color) else {
        return Vec::new();
    };
    let mut chain = vec![start];
    while chain.len() < MAX_CHAIN {
        let Some(&last) = chain.last() else {
            break;
        };
        let next = neighbors(store, last)
            .into_iter()
            .find(|id| !chain.contains(id) && store.get(*id).is_some_and(|t| t.color == color));
        match next {
            Some(id) => chain.push(id),
            None => break,
        }
    }
    chain
}

/// Best chain on the field, preferring colors that still need collecting
fn pick_chain(state: &GameState) -> Option<Vec<TileId>> {
    state
        .store
        .iter()
        .filter(|t| state.inventory.remaining(t.color) > 0)
        .map(|t| plan_chain(&state.store, t.id))
        .filter(|chain| chain.len() >= 2)
        .max_by_key(|chain| chain.len())
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => match Level::load(&path) {
            Ok(level) => level,
            Err(e) => {
                log::error!("Failed to load level {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => demo_level(),
    };
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Voronoi Mosaic (native) starting, seed {}", seed);

    let mut state = GameState::new(&level, settings, seed);
    let mut instances: Vec<TileInstance> = Vec::with_capacity(state.store.len());

    while state.phase == GamePhase::Playing && state.frame < FRAME_BUDGET {
        let mut waited = 0;
        while !state.is_settled() && waited < MAX_SETTLE_FRAMES {
            state.tick();
            waited += 1;
        }
        if waited == MAX_SETTLE_FRAMES {
            log::debug!("Field still moving (max speed {:.1})", max_speed(state.store.tiles()));
        }
        write_instances(&state.store, &mut instances);

        let Some(chain) = pick_chain(&state) else {
            log::warn!("No legal move left on a field of {} tiles", instances.len());
            break;
        };

        // Replay the chain as pointer events over tile centers
        let points: Vec<DVec2> = chain
            .iter()
            .filter_map(|id| state.store.get(*id).map(|t| t.pos))
            .collect();
        let Some((&first, rest)) = points.split_first() else {
            break;
        };
        state.pointer_down(first);
        for &p in rest {
            state.pointer_move(p);
        }
        if state.pointer_up().is_none() {
            // Hit test disagreed with the plan; let physics move things along
            state.tick();
        }

        for (color, collected, required) in state.progress() {
            log::debug!("color {}: {}/{}", color, collected, required);
        }
    }

    match state.phase {
        GamePhase::Won => println!("Won in {} frames", state.frame),
        GamePhase::Playing => println!("Stopped after {} frames", state.frame),
    }
    for (color, collected, required) in state.progress() {
        println!("  color {:>3}: {:>3}/{:<3}", color, collected, required);
    }
}
