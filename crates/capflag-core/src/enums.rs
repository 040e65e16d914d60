//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Team identity. Red defends the right half of the field, blue the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Red,
    Blue,
}

impl TeamColor {
    /// The opposing team.
    pub fn opponent(self) -> TeamColor {
        match self {
            TeamColor::Red => TeamColor::Blue,
            TeamColor::Blue => TeamColor::Red,
        }
    }
}

/// Which game variant a match plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameRules {
    /// Symmetric capture-the-flag: both sides capture and deliver.
    #[default]
    Ctf,
    /// Red attacks a defended flag; the episode ends on capture.
    AttackDefend,
}

/// How agents are positioned at episode reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Uniformly random within the team's placement bounds.
    Random,
    /// Random with a minimum pairwise separation enforced.
    #[default]
    RandomConstraint,
    /// All entities at one shared random position.
    RandomSame,
    /// Each agent starts at a team flag.
    AtFlag,
}

/// How a team's acceleration commands are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Rule-based tactical policy.
    #[default]
    Custom,
    /// Commands supplied per decision tick by an external adapter.
    External,
}

/// Action representation accepted from an external controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSpaceKind {
    /// Per-agent index into {0, +limit, -limit} lateral commands.
    #[default]
    Discrete,
    /// Per-agent lateral acceleration scalar, clamped to the limit.
    Continuous,
    /// Single index decoded base-3 into one discrete command per agent.
    Joint,
    /// Named tactical behaviors (produced internally, not injectable).
    HighLevel,
}

/// High-level behavior retained per agent between decisions.
///
/// Lane choices (attack/return top, bottom, centre) are sticky: once rolled
/// they persist until an overriding condition (tagged, flag state change)
/// forces the agent out of the lane set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TacticalAction {
    /// No behavior chosen yet (start of episode).
    #[default]
    Idle,
    /// Holding station at a flag.
    Wait,
    /// Intercepting an intruder.
    GoTag,
    /// Tagged — forced return to base.
    Tagged,
    AttackTop,
    AttackBottom,
    AttackCentre,
    ReturnTop,
    ReturnBottom,
    ReturnCentre,
}

impl TacticalAction {
    /// Whether this action is one of the attack lanes.
    pub fn is_attack_lane(self) -> bool {
        matches!(
            self,
            TacticalAction::AttackTop | TacticalAction::AttackBottom | TacticalAction::AttackCentre
        )
    }

    /// Whether this action is one of the return lanes.
    pub fn is_return_lane(self) -> bool {
        matches!(
            self,
            TacticalAction::ReturnTop | TacticalAction::ReturnBottom | TacticalAction::ReturnCentre
        )
    }
}

/// Result of a finished match from the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    RedWin,
    Draw,
    BlueWin,
}

impl MatchOutcome {
    /// Determine the winner from final scores.
    pub fn from_scores(red_score: u32, blue_score: u32) -> MatchOutcome {
        match red_score.cmp(&blue_score) {
            std::cmp::Ordering::Greater => MatchOutcome::RedWin,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::BlueWin,
        }
    }
}
