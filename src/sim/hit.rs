//! Pointer hit-testing
//!
//! Distances are normalized by tile radius so a tap favors the
//! proportionally closest tile, not whichever big tile reaches furthest.

use glam::DVec2;

use super::tile::{TileId, TileStore};

/// Tile minimizing `distance / radius` together with that normalized distance
fn nearest_normalized(store: &TileStore, point: DVec2) -> Option<(TileId, f64)> {
    store
        .iter()
        .map(|t| (t.id, point.distance(t.pos) / t.radius()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// General hit test with no cutoff. Always returns a tile for a non-empty store.
pub fn tile_at(store: &TileStore, point: DVec2) -> Option<TileId> {
    nearest_normalized(store, point).map(|(id, _)| id)
}

/// Strict variant for placement/removal tooling: the point must lie inside
/// the winning tile's own radius.
pub fn tile_at_within(store: &TileStore, point: DVec2) -> Option<TileId> {
    nearest_normalized(store, point)
        .filter(|&(_, normalized)| normalized < 1.0)
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_misses() {
        let store = TileStore::new();
        assert_eq!(tile_at(&store, DVec2::ZERO), None);
        assert_eq!(tile_at_within(&store, DVec2::ZERO), None);
    }

    #[test]
    fn test_far_point_still_hits_in_general_test() {
        let mut store = TileStore::new();
        let a = store.spawn(DVec2::new(0.0, 0.0), 10.0, 0);
        assert_eq!(tile_at(&store, DVec2::new(1000.0, 1000.0)), Some(a));
        assert_eq!(tile_at_within(&store, DVec2::new(1000.0, 1000.0)), None);
    }

    #[test]
    fn test_size_normalized_metric() {
        let mut store = TileStore::new();
        let big = store.spawn(DVec2::new(0.0, 0.0), 50.0, 0);
        let small = store.spawn(DVec2::new(60.0, 0.0), 10.0, 0);
        // 45 from the big center (0.9 radii), 15 from the small one (1.5 radii)
        let p = DVec2::new(45.0, 0.0);
        assert_eq!(tile_at(&store, p), Some(big));
        // 52 from big (1.04), 8 from small (0.8): geometric and normalized agree
        let p = DVec2::new(52.0, 0.0);
        assert_eq!(tile_at(&store, p), Some(small));
        // 40 from big (0.8), 20 from small (2.0): normalized favors big
        assert_eq!(tile_at(&store, DVec2::new(40.0, 0.0)), Some(big));
    }

    #[test]
    fn test_small_tile_wins_near_big_edge() {
        let mut store = TileStore::new();
        let _big = store.spawn(DVec2::new(0.0, 0.0), 40.0, 0);
        let small = store.spawn(DVec2::new(45.0, 0.0), 10.0, 0);
        // 38 from big (0.95), 7 from small (0.7)
        assert_eq!(tile_at_within(&store, DVec2::new(38.0, 0.0)), Some(small));
    }
}
