//! Flag state and capture mechanics.

use rand_chacha::ChaCha8Rng;

use capflag_core::constants::CAPTURE_DISTANCE;
use capflag_core::enums::TeamColor;
use capflag_core::error::ConfigError;
use capflag_core::types::{Bounds, Vec2};

use crate::placement;

/// One team's flag set. Flag positions are fixed once placed at reset;
/// a captured flag stays where it is and is marked captured until the
/// carrier delivers it or drops it by being tagged.
#[derive(Debug, Clone)]
pub struct FlagSet {
    pub color: TeamColor,
    pub positions: Vec<Vec2>,
    pub captured: Vec<bool>,
    pub capture_distance: f64,
    bounds: Bounds,
}

impl FlagSet {
    pub fn new(color: TeamColor, n_flags: usize, bounds: Bounds) -> Self {
        Self {
            color,
            positions: vec![Vec2::ZERO; n_flags],
            captured: vec![false; n_flags],
            capture_distance: CAPTURE_DISTANCE,
            bounds,
        }
    }

    pub fn n(&self) -> usize {
        self.positions.len()
    }

    /// Re-place all flags with minimum separation and clear capture state.
    pub fn reset(&mut self, rng: &mut ChaCha8Rng) -> Result<(), ConfigError> {
        self.positions = placement::random_with_separation(self.n(), self.bounds, rng)?;
        self.captured.fill(false);
        Ok(())
    }

    /// Attempt to capture one flag from a position.
    ///
    /// A no-op returning `false` when the flag is already captured or the
    /// position is out of range; capture is therefore idempotent.
    pub fn attempt_capture(&mut self, agent_position: Vec2, flag_idx: usize) -> bool {
        if self.captured[flag_idx] {
            return false;
        }
        if agent_position.distance(self.positions[flag_idx]) <= self.capture_distance {
            self.captured[flag_idx] = true;
            return true;
        }
        false
    }

    /// Release a flag (delivered by the enemy, or dropped by a tagged
    /// carrier).
    pub fn release(&mut self, flag_idx: usize) {
        self.captured[flag_idx] = false;
    }

    /// Number of currently captured flags.
    pub fn captured_count(&self) -> usize {
        self.captured.iter().filter(|&&c| c).count()
    }
}
