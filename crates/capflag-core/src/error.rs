//! Error taxonomy.
//!
//! Configuration errors are fatal and raised at match construction; logic
//! errors are fatal and raised during a tick. Expected gameplay no-ops
//! (capture attempt on a captured flag, tagging a tagged agent) are not
//! errors — they return `bool` from the operation concerned.

use thiserror::Error;

use crate::enums::{ActionSpaceKind, ControlMode, GameRules, TeamColor};

/// Fatal configuration problems detected when a match is constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("the {expected:?} team slot was configured with color {found:?}")]
    TeamColorMismatch {
        expected: TeamColor,
        found: TeamColor,
    },

    #[error("decision period {longer}s is not an integer multiple of {shorter}s")]
    IncompatibleDecisionPeriods { shorter: f64, longer: f64 },

    #[error("decision period must be positive, got {0}s")]
    NonPositiveDecisionPeriod(f64),

    #[error("team {0:?} must have at least one agent")]
    NoAgents(TeamColor),

    #[error("team {0:?} must have at least one flag")]
    NoFlags(TeamColor),

    #[error("cannot place {agents} agents at {flags} team flags")]
    FlagPlacementMismatch { agents: usize, flags: usize },

    #[error("no valid position found after {attempts} constrained placement attempts")]
    PlacementExhausted { attempts: usize },

    #[error("difficulty {0} is outside the supported range 1..=5")]
    UnsupportedDifficulty(u8),

    #[error("{control:?} control does not support the {goal:?} goal")]
    UnsupportedGoal {
        control: ControlMode,
        goal: GameRules,
    },

    #[error("team {color:?} is configured for the {team_goal:?} goal but the match plays {rules:?}")]
    GoalMismatch {
        color: TeamColor,
        team_goal: GameRules,
        rules: GameRules,
    },
}

/// Fatal logic problems detected while processing a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("team {color:?} is configured for {expected:?} actions, received {received:?}")]
    ActionSpaceMismatch {
        color: TeamColor,
        expected: ActionSpaceKind,
        received: ActionSpaceKind,
    },

    #[error("team {color:?} has {agents} agents, received {received} actions")]
    ActionCountMismatch {
        color: TeamColor,
        agents: usize,
        received: usize,
    },

    #[error("discrete action index {index} is outside 0..{size}")]
    DiscreteActionOutOfRange { index: usize, size: usize },

    #[error("joint action index {index} is outside 0..{combinations}")]
    JointActionOutOfRange { index: usize, combinations: usize },
}
