//! Voronoi Mosaic - a tile-matching puzzle on a Voronoi field
//!
//! Core modules:
//! - `sim`: Simulation core (tile store, physics, adjacency, selection, inventory)
//! - `level`: Level descriptions consumed from a mosaic loader
//! - `render`: Read-only GPU instance snapshot of the live tiles
//! - `settings`: Data-driven tuning (physics, refill, layout)

pub mod level;
pub mod render;
pub mod settings;
pub mod sim;

pub use level::{Level, LevelError, TileSpec};
pub use settings::{ConfigError, LayoutConfig, PhysicsConfig, RefillConfig, Settings};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Nominal rendering frame (60 Hz)
    pub const FRAME_DT: f64 = 1.0 / 60.0;
    /// Physics sub-steps per frame
    pub const SUBSTEPS: u32 = 30;

    /// Downward acceleration (pixels/s², +y is down)
    pub const GRAVITY: f64 = 8000.0;
    /// Velocity decay applied every sub-step
    pub const DAMPING: f64 = 0.99;
    /// Bounce factor for tile/tile and tile/wall contacts
    pub const RESTITUTION: f64 = 0.10;
    /// Tangential retention on contact (1.0 = frictionless)
    pub const FRICTION: f64 = 0.9;
    /// Tiles above `-CEILING` are pinned there
    pub const CEILING: f64 = 10_000.0;

    /// Fraction of field area the refill keeps covered
    pub const TARGET_DENSITY: f64 = 0.95;
    /// Refill radius range as fractions of the field diagonal
    pub const MIN_RADIUS_FRACTION: f64 = 0.02;
    pub const MAX_RADIUS_FRACTION: f64 = 0.045;
    /// Height of the band above the field where refills appear (fraction of height)
    pub const SPAWN_BAND_FRACTION: f64 = 0.5;

    /// Area fraction the initial scatter aims for before the refill tops up
    pub const LAYOUT_DENSITY: f64 = 0.5;
    /// Rejection-sampling budget for the initial layout
    pub const LAYOUT_MAX_ATTEMPTS: u32 = 10_000;

    /// Per-axis speed below which a tile counts as at rest
    pub const SETTLE_THRESHOLD: f64 = 20.0;

    /// Below this |sin| of the angle between the bisector and a competitor's
    /// constraint line, the two are treated as parallel
    pub const ADJACENCY_EPSILON: f64 = 1e-9;
}

/// Area of a circle with the given radius
#[inline]
pub fn circle_area(radius: f64) -> f64 {
    std::f64::consts::PI * radius * radius
}

/// Rotate a vector by +90° (counter-clockwise in a y-up frame)
#[inline]
pub fn perp(v: DVec2) -> DVec2 {
    DVec2::new(-v.y, v.x)
}
