//! Simulation core
//!
//! All gameplay logic lives here. This module must stay synchronous and
//! renderer-free:
//! - Physics completes for a frame before any adjacency query reads positions
//! - Seeded RNG only
//! - Tiles are referenced by `TileId`, never by value

pub mod adjacency;
pub mod field;
pub mod hit;
pub mod inventory;
pub mod layout;
pub mod physics;
pub mod selection;
pub mod state;
pub mod tile;

pub use adjacency::{bisector_survives, has_legal_move, is_adjacent, neighbors};
pub use field::Field;
pub use hit::{tile_at, tile_at_within};
pub use inventory::LevelInventory;
pub use layout::{LayoutReport, scatter};
pub use physics::{settled, step};
pub use selection::{MatchOutcome, SelectionChange, SelectionEngine, SelectionState};
pub use state::{GamePhase, GameState};
pub use tile::{Tile, TileId, TileStore};
