//! Match and team configuration.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{ActionSpaceKind, ControlMode, GameRules, PlacementMode, TeamColor};
use crate::error::ConfigError;

/// Per-team configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub color: TeamColor,
    pub n_agents: usize,
    pub n_flags: usize,
    /// Constant speed for every agent on the team (units/second).
    pub speed: f64,
    /// Lateral acceleration limit (units/second²).
    pub acceleration_limit: f64,
    /// Seconds between high-level re-decisions.
    pub decision_period_secs: f64,
    /// Which game this team's controller is built for.
    pub goal: GameRules,
    pub placement: PlacementMode,
    pub control: ControlMode,
    pub action_space: ActionSpaceKind,
}

impl TeamConfig {
    /// The standard two-agent, one-flag CTF team.
    pub fn standard(color: TeamColor) -> Self {
        Self {
            color,
            n_agents: DEFAULT_AGENTS_PER_TEAM,
            n_flags: DEFAULT_FLAGS_PER_TEAM,
            speed: DEFAULT_SPEED,
            acceleration_limit: DEFAULT_ACCELERATION_LIMIT,
            decision_period_secs: DEFAULT_DECISION_PERIOD_SECS,
            goal: GameRules::Ctf,
            placement: PlacementMode::RandomConstraint,
            control: ControlMode::Custom,
            action_space: ActionSpaceKind::Discrete,
        }
    }
}

/// Full match configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub rules: GameRules,
    pub red: TeamConfig,
    pub blue: TeamConfig,
    /// Red-team tactical sophistication, 1 (naive) through 5 (full defense).
    pub difficulty: u8,
    /// RNG seed. Same seed, same match.
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rules: GameRules::Ctf,
            red: TeamConfig::standard(TeamColor::Red),
            blue: TeamConfig::standard(TeamColor::Blue),
            difficulty: DEFAULT_DIFFICULTY,
            seed: 42,
        }
    }
}

impl MatchConfig {
    /// Validate the configuration, returning the first fatal problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.red.color != TeamColor::Red {
            return Err(ConfigError::TeamColorMismatch {
                expected: TeamColor::Red,
                found: self.red.color,
            });
        }
        if self.blue.color != TeamColor::Blue {
            return Err(ConfigError::TeamColorMismatch {
                expected: TeamColor::Blue,
                found: self.blue.color,
            });
        }
        if !(1..=5).contains(&self.difficulty) {
            return Err(ConfigError::UnsupportedDifficulty(self.difficulty));
        }
        for team in [&self.red, &self.blue] {
            if team.goal != self.rules {
                return Err(ConfigError::GoalMismatch {
                    color: team.color,
                    team_goal: team.goal,
                    rules: self.rules,
                });
            }
            if team.n_agents == 0 {
                return Err(ConfigError::NoAgents(team.color));
            }
            if team.n_flags == 0 {
                return Err(ConfigError::NoFlags(team.color));
            }
            if team.decision_period_secs <= 0.0 {
                return Err(ConfigError::NonPositiveDecisionPeriod(
                    team.decision_period_secs,
                ));
            }
            if team.placement == PlacementMode::AtFlag
                && team.n_flags != 1
                && team.n_flags != team.n_agents
            {
                return Err(ConfigError::FlagPlacementMismatch {
                    agents: team.n_agents,
                    flags: team.n_flags,
                });
            }
        }
        self.timestep()?;
        Ok(())
    }

    /// The simulation timestep: the shorter of the two decision periods.
    ///
    /// The longer period must be an integer multiple of the shorter one so
    /// that both teams re-decide on exact tick boundaries.
    pub fn timestep(&self) -> Result<f64, ConfigError> {
        let (shorter, longer) = if self.blue.decision_period_secs <= self.red.decision_period_secs {
            (self.blue.decision_period_secs, self.red.decision_period_secs)
        } else {
            (self.red.decision_period_secs, self.blue.decision_period_secs)
        };
        let ratio = longer / shorter;
        if (ratio - ratio.round()).abs() > 1e-9 {
            return Err(ConfigError::IncompatibleDecisionPeriods { shorter, longer });
        }
        Ok(shorter)
    }

    /// Tick limit for one episode.
    pub fn max_episode_ticks(&self) -> Result<u64, ConfigError> {
        Ok((EPISODE_SECONDS / self.timestep()?) as u64)
    }
}
