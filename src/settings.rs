//! Simulation tuning
//!
//! Every physics and refill constant is exposed here so a level or a
//! test can override it. Loaded from JSON; missing fields keep defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Rigid-circle integrator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub damping: f64,
    pub restitution: f64,
    pub friction: f64,
    pub substeps: u32,
    /// Length of one rendering frame in seconds
    pub frame_dt: f64,
    /// Safety valve against runaway upward ejection
    pub ceiling: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            damping: DAMPING,
            restitution: RESTITUTION,
            friction: FRICTION,
            substeps: SUBSTEPS,
            frame_dt: FRAME_DT,
            ceiling: CEILING,
        }
    }
}

impl PhysicsConfig {
    /// Duration of one sub-step
    #[inline]
    pub fn sub_dt(&self) -> f64 {
        self.frame_dt / self.substeps.max(1) as f64
    }
}

/// Replacement-tile generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefillConfig {
    /// Target fraction of the field area covered by tiles
    pub density: f64,
    pub min_radius_fraction: f64,
    pub max_radius_fraction: f64,
    pub spawn_band_fraction: f64,
}

impl Default for RefillConfig {
    fn default() -> Self {
        Self {
            density: TARGET_DENSITY,
            min_radius_fraction: MIN_RADIUS_FRACTION,
            max_radius_fraction: MAX_RADIUS_FRACTION,
            spawn_band_fraction: SPAWN_BAND_FRACTION,
        }
    }
}

impl RefillConfig {
    /// Radius range in world units for a field with the given diagonal
    pub fn radius_range(&self, diagonal: f64) -> (f64, f64) {
        (
            self.min_radius_fraction * diagonal,
            self.max_radius_fraction * diagonal,
        )
    }
}

/// Initial scatter for levels that ship no tile list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fraction of the field covered by non-overlapping resting tiles
    pub density: f64,
    /// Rejection-sampling budget
    pub max_attempts: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            density: LAYOUT_DENSITY,
            max_attempts: LAYOUT_MAX_ATTEMPTS,
        }
    }
}

/// All tunables for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsConfig,
    pub refill: RefillConfig,
    pub layout: LayoutConfig,
    /// Per-axis speed under which the field counts as settled
    pub settle_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            refill: RefillConfig::default(),
            layout: LayoutConfig::default(),
            settle_threshold: SETTLE_THRESHOLD,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the integrator or the generators cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if p.substeps == 0 {
            return Err(ConfigError::Invalid("physics.substeps must be >= 1".into()));
        }
        if !(p.frame_dt > 0.0) {
            return Err(ConfigError::Invalid("physics.frame_dt must be > 0".into()));
        }
        if !(p.damping > 0.0 && p.damping <= 1.0) {
            return Err(ConfigError::Invalid("physics.damping must be in (0, 1]".into()));
        }
        if !(p.restitution >= 0.0) {
            return Err(ConfigError::Invalid("physics.restitution must be >= 0".into()));
        }
        if !(0.0..=1.0).contains(&p.friction) {
            return Err(ConfigError::Invalid("physics.friction must be in [0, 1]".into()));
        }

        let r = &self.refill;
        if !(r.min_radius_fraction > 0.0 && r.min_radius_fraction <= r.max_radius_fraction) {
            return Err(ConfigError::Invalid(format!(
                "refill radius range [{}, {}] is empty or non-positive",
                r.min_radius_fraction, r.max_radius_fraction
            )));
        }
        if !(r.density > 0.0 && r.density <= 1.0) {
            return Err(ConfigError::Invalid("refill.density must be in (0, 1]".into()));
        }
        if !(r.spawn_band_fraction >= 0.0) {
            return Err(ConfigError::Invalid("refill.spawn_band_fraction must be >= 0".into()));
        }

        if !(self.layout.density > 0.0 && self.layout.density <= 1.0) {
            return Err(ConfigError::Invalid("layout.density must be in (0, 1]".into()));
        }
        if self.layout.max_attempts == 0 {
            return Err(ConfigError::Invalid("layout.max_attempts must be >= 1".into()));
        }
        Ok(())
    }
}
