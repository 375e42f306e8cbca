//! Playfield bounds

use serde::{Deserialize, Serialize};

/// Rectangular field `[0, width] x [0, height]`, +y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Field {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }
}
