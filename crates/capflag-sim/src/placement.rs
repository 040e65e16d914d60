//! Initial placement strategies for agents and flags.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use capflag_core::constants::{AGENT_RADIUS, MIN_SEPARATION_FACTOR, PLACEMENT_RETRY_BUDGET};
use capflag_core::enums::PlacementMode;
use capflag_core::error::ConfigError;
use capflag_core::types::{Bounds, Vec2};

fn sample(bounds: Bounds, rng: &mut ChaCha8Rng) -> Vec2 {
    Vec2::new(
        rng.gen_range(bounds.min.x..bounds.max.x),
        rng.gen_range(bounds.min.y..bounds.max.y),
    )
}

/// Uniformly random positions within bounds.
pub fn random(n: usize, bounds: Bounds, rng: &mut ChaCha8Rng) -> Vec<Vec2> {
    (0..n).map(|_| sample(bounds, rng)).collect()
}

/// One random position shared by all entities.
pub fn random_same(n: usize, bounds: Bounds, rng: &mut ChaCha8Rng) -> Vec<Vec2> {
    let position = sample(bounds, rng);
    vec![position; n]
}

/// Random positions with a minimum pairwise separation.
///
/// Rejection sampling with a bounded retry budget; exhausting the budget
/// means the bounds cannot fit the entities and is a configuration error.
pub fn random_with_separation(
    n: usize,
    bounds: Bounds,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Vec2>, ConfigError> {
    let min_separation = MIN_SEPARATION_FACTOR * AGENT_RADIUS + 0.001;
    let mut positions: Vec<Vec2> = Vec::with_capacity(n);
    let mut attempts = 0;
    while positions.len() < n {
        let candidate = sample(bounds, rng);
        let clear = positions
            .iter()
            .all(|p| p.distance(candidate) > min_separation);
        if clear {
            positions.push(candidate);
        } else {
            attempts += 1;
            if attempts >= PLACEMENT_RETRY_BUDGET {
                return Err(ConfigError::PlacementExhausted {
                    attempts: PLACEMENT_RETRY_BUDGET,
                });
            }
        }
    }
    Ok(positions)
}

/// Positions at the team's flags: all agents at a single flag, or one
/// agent per flag when the counts match.
pub fn at_flags(n: usize, flag_positions: &[Vec2]) -> Result<Vec<Vec2>, ConfigError> {
    match flag_positions.len() {
        1 => Ok(vec![flag_positions[0]; n]),
        m if m == n => Ok(flag_positions.to_vec()),
        m => Err(ConfigError::FlagPlacementMismatch { agents: n, flags: m }),
    }
}

/// Dispatch on the configured placement mode.
pub fn initial_positions(
    mode: PlacementMode,
    n: usize,
    bounds: Bounds,
    flag_positions: &[Vec2],
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Vec2>, ConfigError> {
    match mode {
        PlacementMode::Random => Ok(random(n, bounds, rng)),
        PlacementMode::RandomConstraint => random_with_separation(n, bounds, rng),
        PlacementMode::RandomSame => Ok(random_same(n, bounds, rng)),
        PlacementMode::AtFlag => at_flags(n, flag_positions),
    }
}
