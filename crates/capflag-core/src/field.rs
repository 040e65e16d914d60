//! Field geometry: boundary rectangle, territory half-planes, and the
//! midline waypoints used by the lane behaviors.
//!
//! Territory checks use strict inequalities, so the vertical midline and
//! the outer boundary edges belong to neither territory.

use serde::{Deserialize, Serialize};

use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::types::{Bounds, Vec2};

/// The playing field: a rectangle split at its vertical midline into red
/// territory (right half) and blue territory (left half).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub boundary: Bounds,
}

impl Field {
    /// The standard field used by every match.
    pub fn standard() -> Self {
        Self {
            boundary: Bounds::new(Vec2::ZERO, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)),
        }
    }

    /// The x coordinate of the territory split.
    pub fn midline_x(&self) -> f64 {
        self.boundary.max.x / 2.0
    }

    /// Centre-field waypoint.
    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.boundary.width() / 2.0, self.boundary.height() / 2.0)
    }

    /// Upper midline waypoint (three quarters of the way up).
    pub fn top(&self) -> Vec2 {
        Vec2::new(
            self.boundary.width() / 2.0,
            self.boundary.height() / 4.0 * 3.0,
        )
    }

    /// Lower midline waypoint (one quarter of the way up).
    pub fn bottom(&self) -> Vec2 {
        Vec2::new(self.boundary.width() / 2.0, self.boundary.height() / 4.0)
    }

    /// Whether a point lies strictly inside red territory (right half).
    pub fn in_red_territory(&self, p: Vec2) -> bool {
        p.x < self.boundary.max.x
            && p.x > self.midline_x()
            && p.y > self.boundary.min.y
            && p.y < self.boundary.max.y
    }

    /// Whether a point lies strictly inside blue territory (left half).
    pub fn in_blue_territory(&self, p: Vec2) -> bool {
        p.x > self.boundary.min.x
            && p.x < self.midline_x()
            && p.y > self.boundary.min.y
            && p.y < self.boundary.max.y
    }

    /// Whether a point lies in the named team's home territory.
    pub fn in_territory(&self, color: crate::enums::TeamColor, p: Vec2) -> bool {
        match color {
            crate::enums::TeamColor::Red => self.in_red_territory(p),
            crate::enums::TeamColor::Blue => self.in_blue_territory(p),
        }
    }

    /// Whether a point has left the game boundary.
    pub fn outside(&self, p: Vec2) -> bool {
        !self.boundary.contains(p)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::standard()
    }
}
