//! Match state snapshot — the keyed record read and written by external
//! adapters each tick.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Complete observable match state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub red: TeamState,
    pub blue: TeamState,
    pub red_flags: FlagState,
    pub blue_flags: FlagState,
    pub red_score: u32,
    pub blue_score: u32,
}

/// One team's agents, arrays indexed by stable agent index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    pub azimuths: Vec<f64>,
    /// Last applied acceleration per agent.
    pub accelerations: Vec<Vec2>,
    pub alive: Vec<bool>,
    pub tagged: Vec<bool>,
    pub has_flag: Vec<bool>,
}

/// One team's flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagState {
    pub positions: Vec<Vec2>,
    pub captured: Vec<bool>,
}
