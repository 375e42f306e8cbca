//! Level descriptions
//!
//! A level is the field size, an optional starting tile list and the
//! color histogram of the target mosaic. Encoding levels into share
//! strings is the loader's business; this is the decoded form.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    Invalid(String),
}

/// One starting tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub width: f64,
    pub height: f64,
    /// Empty means "scatter a random layout"
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
    /// Tiles of each color that must be collected to win
    pub required: BTreeMap<u32, u32>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(LevelError::Invalid(format!(
                "field must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        for (i, tile) in self.tiles.iter().enumerate() {
            if !(tile.radius > 0.0) {
                return Err(LevelError::Invalid(format!("tile {} has radius {}", i, tile.radius)));
            }
            if !(tile.x >= 0.0 && tile.x <= self.width) {
                return Err(LevelError::Invalid(format!(
                    "tile {} at x={} is outside the field",
                    i, tile.x
                )));
            }
        }
        Ok(())
    }

    /// Color histogram of a tile list, e.g. the target mosaic
    pub fn histogram_of(tiles: &[TileSpec]) -> BTreeMap<u32, u32> {
        let mut histogram = BTreeMap::new();
        for tile in tiles {
            *histogram.entry(tile.color).or_insert(0) += 1;
        }
        histogram
    }

    /// Empty field whose requirement is the histogram of `target`
    pub fn from_target(width: f64, height: f64, target: &[TileSpec]) -> Self {
        Self {
            width,
            height,
            tiles: Vec::new(),
            required: Self::histogram_of(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let json = r#"{
            "width": 400, "height": 600,
            "tiles": [ { "x": 10, "y": 20, "radius": 5, "color": 2 } ],
            "required": { "2": 4, "7": 1 }
        }"#;
        let level = Level::from_json(json).unwrap();
        assert_eq!(level.tiles.len(), 1);
        assert_eq!(level.required.get(&2), Some(&4));
        assert_eq!(level.required.get(&7), Some(&1));
    }

    #[test]
    fn test_tiles_default_to_empty() {
        let level = Level::from_json(r#"{ "width": 1, "height": 1, "required": {} }"#).unwrap();
        assert!(level.tiles.is_empty());
    }

    #[test]
    fn test_invalid_levels_rejected() {
        let err = Level::from_json(r#"{ "width": 0, "height": 1, "required": {} }"#).unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));

        let err = Level::from_json(
            r#"{ "width": 10, "height": 10, "tiles": [ { "x": 1, "y": 1, "radius": 0, "color": 0 } ], "required": {} }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));

        let err = Level::from_json(
            r#"{ "width": 10, "height": 10, "tiles": [ { "x": 50, "y": 1, "radius": 1, "color": 0 } ], "required": {} }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::Invalid(_)));
    }

    #[test]
    fn test_histogram() {
        let target = [
            TileSpec { x: 0.0, y: 0.0, radius: 1.0, color: 3 },
            TileSpec { x: 0.0, y: 0.0, radius: 1.0, color: 3 },
            TileSpec { x: 0.0, y: 0.0, radius: 1.0, color: 5 },
        ];
        let level = Level::from_target(100.0, 100.0, &target);
        assert_eq!(level.required, BTreeMap::from([(3, 2), (5, 1)]));
        assert!(level.tiles.is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let level = Level::from_target(
            100.0,
            50.0,
            &[TileSpec { x: 0.0, y: 0.0, radius: 1.0, color: 9 }],
        );
        let json = level.to_json().unwrap();
        assert_eq!(Level::from_json(&json).unwrap(), level);
    }
}
