//! Voronoi adjacency from raw tile centers
//!
//! Two tiles are neighbors iff some point on their perpendicular bisector
//! is strictly closer to both of them than to any other tile. The
//! bisector is parameterized as `P(t) = M + t*U` and every competitor
//! clips the surviving interval of `t` with one half-plane constraint.
//!
//! Radii play no part here. The renderer draws the unweighted center
//! diagram, and legality has to agree with what the player sees.

use glam::DVec2;

use super::tile::{TileId, TileStore};
use crate::consts::ADJACENCY_EPSILON;
use crate::perp;

/// Whether the bisector between `a` and `b` survives every competitor.
///
/// A competitor exactly as close to the bisector as `a` along its whole
/// length (parallel constraint, `rhs >= 0`) blocks the edge. Boundary
/// ties never count as adjacency. Coincident sites have no bisector and
/// are never adjacent.
pub fn bisector_survives(a: DVec2, b: DVec2, competitors: impl IntoIterator<Item = DVec2>) -> bool {
    if a == b {
        return false;
    }
    let mid = (a + b) * 0.5;
    let dir = perp(b - a);
    let dir_len = dir.length();
    let a_len_sq = a.length_squared();

    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for c in competitors {
        // |P(t)-a|² < |P(t)-c|²  <=>  t*coeff > rhs
        let coeff = dir.dot(a - c);
        let rhs = mid.dot(c - a) - (c.length_squared() - a_len_sq) * 0.5;

        // Parallel test on the angle, so it holds at any field scale
        if coeff.abs() <= ADJACENCY_EPSILON * dir_len * (a - c).length() {
            if rhs >= 0.0 {
                return false;
            }
            continue;
        }

        let bound = rhs / coeff;
        if coeff > 0.0 {
            t_min = t_min.max(bound);
        } else {
            t_max = t_max.min(bound);
        }

        if t_min >= t_max {
            return false;
        }
    }

    t_min < t_max
}

/// Voronoi-neighbor test by identity. A tile is never adjacent to itself,
/// and unknown handles are never adjacent.
pub fn is_adjacent(store: &TileStore, a: TileId, b: TileId) -> bool {
    if a == b {
        return false;
    }
    // Canonical orientation keeps the result exactly symmetric
    let (a, b) = if a < b { (a, b) } else { (b, a) };
    let (Some(ta), Some(tb)) = (store.get(a), store.get(b)) else {
        return false;
    };

    let competitors = store
        .iter()
        .filter(|t| t.id != a && t.id != b)
        .map(|t| t.pos);
    bisector_survives(ta.pos, tb.pos, competitors)
}

/// Every Voronoi neighbor of `id`, in id order
pub fn neighbors(store: &TileStore, id: TileId) -> Vec<TileId> {
    store
        .ids()
        .filter(|&other| is_adjacent(store, id, other))
        .collect()
}

/// True iff at least one same-colored pair is adjacent
pub fn has_legal_move(store: &TileStore) -> bool {
    let tiles = store.tiles();
    tiles.iter().enumerate().any(|(i, a)| {
        tiles[i + 1..]
            .iter()
            .any(|b| a.color == b.color && is_adjacent(store, a.id, b.id))
    })
}
