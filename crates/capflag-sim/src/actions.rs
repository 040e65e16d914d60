//! External action decoding.
//!
//! An external adapter can override a team's next decision with discrete,
//! continuous, or joint actions. Decoding validates against the team's
//! configured action space and yields one lateral acceleration scalar per
//! agent; conversion to a world-space vector happens at the decision tick,
//! using each agent's azimuth at that moment.

use capflag_core::enums::{ActionSpaceKind, TeamColor};
use capflag_core::error::SimError;

/// Actions supplied by an external controller for one team.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalActions {
    /// Per-agent index into {coast, max-left, max-right}.
    Discrete(Vec<usize>),
    /// Per-agent lateral acceleration, clamped to the team limit.
    Continuous(Vec<f64>),
    /// One index decoded base-3 into a discrete command per agent.
    Joint(usize),
}

impl ExternalActions {
    pub fn kind(&self) -> ActionSpaceKind {
        match self {
            ExternalActions::Discrete(_) => ActionSpaceKind::Discrete,
            ExternalActions::Continuous(_) => ActionSpaceKind::Continuous,
            ExternalActions::Joint(_) => ActionSpaceKind::Joint,
        }
    }
}

/// The discrete command table: coast, full left, full right.
fn discrete_table(limit: f64) -> [f64; 3] {
    [0.0, limit, -limit]
}

/// Decode external actions into one lateral acceleration per agent.
pub fn decode_lateral(
    color: TeamColor,
    expected: ActionSpaceKind,
    acceleration_limit: f64,
    n_agents: usize,
    actions: &ExternalActions,
) -> Result<Vec<f64>, SimError> {
    if actions.kind() != expected {
        return Err(SimError::ActionSpaceMismatch {
            color,
            expected,
            received: actions.kind(),
        });
    }

    match actions {
        ExternalActions::Discrete(indices) => {
            if indices.len() != n_agents {
                return Err(SimError::ActionCountMismatch {
                    color,
                    agents: n_agents,
                    received: indices.len(),
                });
            }
            let table = discrete_table(acceleration_limit);
            indices
                .iter()
                .map(|&index| {
                    table
                        .get(index)
                        .copied()
                        .ok_or(SimError::DiscreteActionOutOfRange {
                            index,
                            size: table.len(),
                        })
                })
                .collect()
        }
        ExternalActions::Continuous(laterals) => {
            if laterals.len() != n_agents {
                return Err(SimError::ActionCountMismatch {
                    color,
                    agents: n_agents,
                    received: laterals.len(),
                });
            }
            Ok(laterals
                .iter()
                .map(|l| l.clamp(-acceleration_limit, acceleration_limit))
                .collect())
        }
        ExternalActions::Joint(index) => {
            let combinations = 3usize.pow(n_agents as u32);
            if *index >= combinations {
                return Err(SimError::JointActionOutOfRange {
                    index: *index,
                    combinations,
                });
            }
            let table = discrete_table(acceleration_limit);
            // Base-3 digits, most significant digit first (agent 0).
            let mut laterals = vec![0.0; n_agents];
            let mut remainder = *index;
            for agent in (0..n_agents).rev() {
                laterals[agent] = table[remainder % 3];
                remainder /= 3;
            }
            Ok(laterals)
        }
    }
}
