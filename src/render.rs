//! Renderer-facing tile snapshot
//!
//! The Voronoi shader consumes one instance per tile. The snapshot is
//! read-only: building it never touches the store.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Tile, TileStore};

/// Per-tile GPU instance (center, size, palette key, highlight)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TileInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub color: u32,
    /// 1 while part of the selection chain
    pub highlighted: u32,
    pub _pad: [u32; 3],
}

impl TileInstance {
    pub fn from_tile(tile: &Tile) -> Self {
        Self {
            center: [tile.pos.x as f32, tile.pos.y as f32],
            radius: tile.radius() as f32,
            color: tile.color,
            highlighted: tile.highlighted as u32,
            _pad: [0; 3],
        }
    }
}

/// Refill `out` with one instance per tile in id order, reusing its allocation
pub fn write_instances(store: &TileStore, out: &mut Vec<TileInstance>) {
    out.clear();
    out.extend(store.iter().map(TileInstance::from_tile));
}

/// Instance data as bytes for a GPU upload
pub fn as_bytes(instances: &[TileInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
