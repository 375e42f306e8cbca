//! Sub-stepped rigid-circle integrator
//!
//! One call to [`step`] advances a full rendering frame in `substeps`
//! equal slices. Each slice integrates forces, resolves every overlapping
//! pair, then clamps tiles to the field walls and floor.
//!
//! Coincident centers are skipped rather than resolved: there is no
//! defined normal, and nudging them apart with jitter would break
//! reproducibility. Physics alone never separates two exactly coincident
//! tiles; a third body or a wall has to move one of them first.

use glam::DVec2;

use super::tile::Tile;
use crate::settings::PhysicsConfig;

/// Advance all tiles by one frame. Mutates positions/velocities in place,
/// allocates nothing.
pub fn step(tiles: &mut [Tile], width: f64, height: f64, config: &PhysicsConfig) {
    let substeps = config.substeps.max(1);
    let dt = config.sub_dt();

    for _ in 0..substeps {
        integrate(tiles, dt, config);
        resolve_pairs(tiles, config);
        for tile in tiles.iter_mut() {
            resolve_boundary(tile, width, height, config);
        }
    }
}

/// Gravity, explicit Euler position update, then per-sub-step damping
fn integrate(tiles: &mut [Tile], dt: f64, config: &PhysicsConfig) {
    for tile in tiles.iter_mut() {
        tile.vel.y += config.gravity * dt;
        tile.pos += tile.vel * dt;
        tile.vel *= config.damping;
    }
}

/// All unordered pairs, O(n²)
fn resolve_pairs(tiles: &mut [Tile], config: &PhysicsConfig) {
    let n = tiles.len();
    for i in 0..n {
        let (head, tail) = tiles.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            resolve_collision(a, b, config);
        }
    }
}

/// Resolve one pair. Returns true if the pair was in contact.
pub fn resolve_collision(a: &mut Tile, b: &mut Tile, config: &PhysicsConfig) -> bool {
    let min_dist = a.radius() + b.radius();
    let delta = b.pos - a.pos;
    let dist_sq = delta.length_squared();

    if dist_sq >= min_dist * min_dist || dist_sq == 0.0 {
        return false;
    }

    let dist = dist_sq.sqrt();
    let normal = delta / dist;

    // Inverse-mass split: the lighter tile moves more
    let total = a.weight + b.weight;
    let (ratio_a, ratio_b) = if total > 0.0 {
        (b.weight / total, a.weight / total)
    } else {
        (0.5, 0.5)
    };

    let overlap = min_dist - dist;
    a.pos -= normal * overlap * ratio_a;
    b.pos += normal * overlap * ratio_b;

    let rel_vel = b.vel - a.vel;
    let vel_along_normal = rel_vel.dot(normal);

    if vel_along_normal < 0.0 {
        let j = -(1.0 + config.restitution) * vel_along_normal;
        a.vel -= normal * j * ratio_a;
        b.vel += normal * j * ratio_b;
    }

    // Friction opposes tangential sliding while in contact
    let tangent_vel = rel_vel - normal * vel_along_normal;
    let friction_impulse = tangent_vel * (1.0 - config.friction);
    a.vel += friction_impulse * ratio_a;
    b.vel -= friction_impulse * ratio_b;

    true
}

/// Clamp a tile inside the walls/floor and reflect its velocity on contact
fn resolve_boundary(tile: &mut Tile, width: f64, height: f64, config: &PhysicsConfig) {
    let r = tile.radius();

    if tile.pos.x < r {
        tile.pos.x = r;
        tile.vel.x *= -config.restitution;
        tile.vel.y *= config.friction;
    } else if tile.pos.x > width - r {
        tile.pos.x = width - r;
        tile.vel.x *= -config.restitution;
        tile.vel.y *= config.friction;
    }

    if tile.pos.y > height - r {
        tile.pos.y = height - r;
        tile.vel.y *= -config.restitution;
        tile.vel.x *= config.friction;
    }

    if tile.pos.y < -config.ceiling {
        tile.pos.y = -config.ceiling;
        tile.vel.y = 0.0;
    }
}

/// True iff every tile moves slower than `threshold` on both axes
pub fn settled(tiles: &[Tile], threshold: f64) -> bool {
    tiles
        .iter()
        .all(|t| t.vel.x.abs() < threshold && t.vel.y.abs() < threshold)
}

/// Largest speed on the field (diagnostics)
pub fn max_speed(tiles: &[Tile]) -> f64 {
    tiles.iter().map(|t| t.vel.length()).fold(0.0, f64::max)
}

/// Sum of pairwise overlap depths (diagnostics, stacking quality)
pub fn total_overlap(tiles: &[Tile]) -> f64 {
    let mut sum = 0.0;
    for (i, a) in tiles.iter().enumerate() {
        for b in &tiles[i + 1..] {
            let d = a.pos.distance(b.pos);
            let min_dist = a.radius() + b.radius();
            if d < min_dist {
                sum += min_dist - d;
            }
        }
    }
    sum
}
