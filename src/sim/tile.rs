//! Tiles and the store that owns them
//!
//! Tiles live in a dense array ordered by id. Everything else (selection
//! chain, render snapshot) refers to tiles through `TileId` handles, so
//! identity is a handle comparison and never a value comparison.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::circle_area;

/// Stable handle to a tile. Allocated monotonically, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A circular puzzle piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub pos: DVec2,
    pub vel: DVec2,
    /// Fixed at creation
    radius: f64,
    /// Collision mass factor
    pub weight: f64,
    /// Opaque palette key
    pub color: u32,
    /// Part of the active selection chain
    pub highlighted: bool,
}

impl Tile {
    pub fn new(id: TileId, pos: DVec2, radius: f64, color: u32) -> Self {
        Self {
            id,
            pos,
            vel: DVec2::ZERO,
            radius,
            weight: radius,
            color,
            highlighted: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn area(&self) -> f64 {
        circle_area(self.radius)
    }
}

/// Owns every tile on the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileStore {
    /// Sorted by id
    tiles: Vec<Tile>,
    next_id: u32,
}

impl TileStore {
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a tile at rest and return its handle
    pub fn spawn(&mut self, pos: DVec2, radius: f64, color: u32) -> TileId {
        let id = TileId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.tiles.push(Tile::new(id, pos, radius, color));
        id
    }

    /// Dense index of a tile in `tiles()`
    pub fn index_of(&self, id: TileId) -> Option<usize> {
        self.tiles.binary_search_by_key(&id, |t| t.id).ok()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.index_of(id).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.index_of(id).map(move |i| &mut self.tiles[i])
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        self.index_of(id).map(|i| self.tiles.remove(i))
    }

    /// Remove a batch of tiles in one pass, returning the removed tiles in id order.
    /// Unknown ids are ignored.
    pub fn remove_many(&mut self, ids: &[TileId]) -> Vec<Tile> {
        let mut removed = Vec::with_capacity(ids.len());
        let mut kept = Vec::with_capacity(self.tiles.len());
        for tile in self.tiles.drain(..) {
            if ids.contains(&tile.id) {
                removed.push(tile);
            } else {
                kept.push(tile);
            }
        }
        self.tiles = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Mutable view for the integrator. The slice cannot grow or shrink.
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Sum of tile areas currently on the field
    pub fn total_area(&self) -> f64 {
        self.tiles.iter().map(Tile::area).sum()
    }

    pub fn clear_highlights(&mut self) {
        for tile in &mut self.tiles {
            tile.highlighted = false;
        }
    }
}
