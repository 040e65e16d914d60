//! Fundamental geometric types.

use serde::{Deserialize, Serialize};

/// 2D vector in simulation space. Positions are in game units,
/// velocities in units per second, accelerations in units per second².
pub type Vec2 = glam::DVec2;

/// Axis-aligned rectangle used for the game boundary and placement regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
