//! Team state: the agents of one side and the operations the rules engine
//! performs on them.
//!
//! Agent state is stored as parallel arrays indexed by a stable agent
//! index; "killed" agents are marked dead and relocated to the sentinel,
//! never removed, so indices stay valid for the whole episode.

use rand_chacha::ChaCha8Rng;

use capflag_core::config::TeamConfig;
use capflag_core::constants::{DEAD_AGENT_SENTINEL, KILL_DISTANCE};
use capflag_core::enums::{ActionSpaceKind, TeamColor};
use capflag_core::error::ConfigError;
use capflag_core::types::{Bounds, Vec2};
use capflag_guidance::kinematics;

use crate::flags::FlagSet;

/// One team's agents and kinematic parameters.
#[derive(Debug)]
pub struct Team {
    pub color: TeamColor,
    pub speed: f64,
    pub acceleration_limit: f64,
    /// Ticks between high-level re-decisions.
    pub decision_ticks: u64,
    pub action_space: ActionSpaceKind,
    pub kill_distance: f64,

    pub positions: Vec<Vec2>,
    pub velocities: Vec<Vec2>,
    pub azimuths: Vec<f64>,
    pub accelerations: Vec<Vec2>,
    pub alive: Vec<bool>,
    pub tagged: Vec<bool>,
    pub has_flag: Vec<bool>,

    placement: capflag_core::enums::PlacementMode,
    placement_bounds: Bounds,
    initial_azimuth: f64,
}

impl Team {
    pub fn new(
        config: &TeamConfig,
        decision_ticks: u64,
        placement_bounds: Bounds,
        initial_azimuth: f64,
    ) -> Self {
        let n = config.n_agents;
        Self {
            color: config.color,
            speed: config.speed,
            acceleration_limit: config.acceleration_limit,
            decision_ticks,
            action_space: config.action_space,
            kill_distance: KILL_DISTANCE,
            positions: vec![Vec2::ZERO; n],
            velocities: vec![Vec2::ZERO; n],
            azimuths: vec![initial_azimuth; n],
            accelerations: vec![Vec2::ZERO; n],
            alive: vec![true; n],
            tagged: vec![false; n],
            has_flag: vec![false; n],
            placement: config.placement,
            placement_bounds,
            initial_azimuth,
        }
    }

    pub fn n(&self) -> usize {
        self.positions.len()
    }

    /// Re-place and reinitialize every agent for a new episode.
    pub fn reset(&mut self, rng: &mut ChaCha8Rng, own_flags: &FlagSet) -> Result<(), ConfigError> {
        self.positions = crate::placement::initial_positions(
            self.placement,
            self.n(),
            self.placement_bounds,
            &own_flags.positions,
            rng,
        )?;
        let initial_velocity =
            self.speed * Vec2::new(self.initial_azimuth.cos(), self.initial_azimuth.sin());
        self.velocities.fill(initial_velocity);
        self.azimuths.fill(self.initial_azimuth);
        self.accelerations.fill(Vec2::ZERO);
        self.alive.fill(true);
        self.tagged.fill(false);
        self.has_flag.fill(false);
        Ok(())
    }

    /// Integrate one agent under a commanded acceleration for `dt`.
    pub fn apply_acceleration(&mut self, idx: usize, commanded: Vec2, dt: f64) {
        let update = kinematics::integrate(
            self.positions[idx],
            self.azimuths[idx],
            self.speed,
            self.acceleration_limit,
            commanded,
            dt,
        );
        self.positions[idx] = update.position;
        self.velocities[idx] = update.velocity;
        self.azimuths[idx] = update.azimuth;
        self.accelerations[idx] = update.acceleration;
    }

    /// Mark an agent dead and move it out of play.
    pub fn kill(&mut self, idx: usize) {
        self.alive[idx] = false;
        self.positions[idx] = DEAD_AGENT_SENTINEL;
    }

    /// Tag an agent (idempotent).
    pub fn tag(&mut self, idx: usize) {
        self.tagged[idx] = true;
    }

    /// Clear an agent's tag (idempotent).
    pub fn untag(&mut self, idx: usize) {
        self.tagged[idx] = false;
    }

    /// Attempt to capture the enemy's first flag with one agent.
    ///
    /// Tagged agents and agents already carrying a flag cannot capture.
    /// Returns whether the agent holds a flag after the attempt.
    pub fn attempt_capture(&mut self, idx: usize, enemy_flags: &mut FlagSet) -> bool {
        if !self.has_flag[idx] && !self.tagged[idx] {
            self.has_flag[idx] = enemy_flags.attempt_capture(self.positions[idx], 0);
        }
        self.has_flag[idx]
    }

    /// Attempt to capture any uncaptured enemy flag (attack/defend mode).
    pub fn attempt_capture_any(&mut self, idx: usize, enemy_flags: &mut FlagSet) -> bool {
        if self.has_flag[idx] || self.tagged[idx] {
            return false;
        }
        for flag_idx in 0..enemy_flags.n() {
            if enemy_flags.attempt_capture(self.positions[idx], flag_idx) {
                self.has_flag[idx] = true;
                return true;
            }
        }
        false
    }

    /// Attempt to deliver a carried flag at the team's first flag.
    ///
    /// On success the carried enemy flag is released and the carrier's
    /// hands are free; the caller scores the point.
    pub fn attempt_deliver(
        &mut self,
        idx: usize,
        own_flags: &FlagSet,
        enemy_flags: &mut FlagSet,
    ) -> bool {
        if !self.has_flag[idx] {
            return false;
        }
        let home = own_flags.positions[0];
        if self.positions[idx].distance(home) <= own_flags.capture_distance {
            self.has_flag[idx] = false;
            enemy_flags.release(0);
            return true;
        }
        false
    }
}
