//! The match state machine.
//!
//! `Match` owns both teams, both flag sets, the field, and the RNG, and is
//! the only place match state is mutated. Each tick runs a fixed phase
//! order: decisions (on each team's cadence, with held commands in
//! between), red kinematics, tag evaluation, blue kinematics,
//! capture/delivery/scoring, a second tag evaluation, and untagging at
//! base. Teams are integrated sequentially, red first; the slight
//! turn-order asymmetry this introduces is deliberate and pinned down by
//! the tick-protocol tests.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use capflag_core::config::MatchConfig;
use capflag_core::constants::*;
use capflag_core::enums::{ControlMode, GameRules, MatchOutcome, TeamColor};
use capflag_core::error::{ConfigError, SimError};
use capflag_core::field::Field;
use capflag_core::state::MatchSnapshot;
use capflag_core::types::Vec2;
use capflag_guidance::laws;
use capflag_tactics::policy::{policy_for, TacticalPolicy};
use capflag_tactics::view::{FlagSight, TeamSight, WorldView};

use crate::actions::{self, ExternalActions};
use crate::flags::FlagSet;
use crate::snapshot;
use crate::stats::{self, AttackDefendEvaluation, CtfEvaluation};
use crate::team::Team;

/// Result of one CTF episode, from red's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtfEpisode {
    pub outcome: MatchOutcome,
    pub red_score: u32,
    pub blue_score: u32,
    /// Whether any red agent was tagged during the episode.
    pub red_tagged: bool,
    pub ticks: u64,
}

/// Result of one attack/defend episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackDefendEpisode {
    /// Captured flags over total flags.
    pub normalized_score: f64,
    /// Accumulated same-team collision pair count.
    pub collisions: u32,
    pub ticks: u64,
}

/// A complete two-team match.
pub struct Match {
    rules: GameRules,
    difficulty: u8,
    dt: f64,
    max_ticks: u64,
    field: Field,
    rng: ChaCha8Rng,
    tick: u64,

    red: Team,
    blue: Team,
    red_flags: FlagSet,
    blue_flags: FlagSet,

    red_policy: Option<Box<dyn TacticalPolicy>>,
    blue_policy: Option<Box<dyn TacticalPolicy>>,

    /// Commands held between decision ticks.
    red_commands: Vec<Vec2>,
    blue_commands: Vec<Vec2>,

    /// Externally injected lateral commands awaiting the next decision tick.
    red_pending: Option<Vec<f64>>,
    blue_pending: Option<Vec<f64>>,

    red_score: u32,
    blue_score: u32,
}

impl Match {
    /// Build a match from a validated configuration and run the first
    /// placement. Fails fast on any configuration problem.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dt = config.timestep()?;
        let max_ticks = config.max_episode_ticks()?;
        let red_decision_ticks = (config.red.decision_period_secs / dt).round() as u64;
        let blue_decision_ticks = (config.blue.decision_period_secs / dt).round() as u64;

        let red_policy = match config.red.control {
            ControlMode::Custom => Some(policy_for(
                TeamColor::Red,
                config.red.goal,
                config.red.n_agents,
            )?),
            ControlMode::External => None,
        };
        let blue_policy = match config.blue.control {
            ControlMode::Custom => Some(policy_for(
                TeamColor::Blue,
                config.blue.goal,
                config.blue.n_agents,
            )?),
            ControlMode::External => None,
        };

        let red = Team::new(
            &config.red,
            red_decision_ticks,
            RED_AGENT_BOUNDS,
            INITIAL_RED_AZIMUTH,
        );
        let blue = Team::new(
            &config.blue,
            blue_decision_ticks,
            BLUE_AGENT_BOUNDS,
            INITIAL_BLUE_AZIMUTH,
        );
        let red_commands = vec![Vec2::ZERO; red.n()];
        let blue_commands = vec![Vec2::ZERO; blue.n()];

        let mut game = Self {
            rules: config.rules,
            difficulty: config.difficulty,
            dt,
            max_ticks,
            field: Field::standard(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick: 0,
            red,
            blue,
            red_flags: FlagSet::new(TeamColor::Red, config.red.n_flags, RED_FLAG_BOUNDS),
            blue_flags: FlagSet::new(TeamColor::Blue, config.blue.n_flags, BLUE_FLAG_BOUNDS),
            red_policy,
            blue_policy,
            red_commands,
            blue_commands,
            red_pending: None,
            blue_pending: None,
            red_score: 0,
            blue_score: 0,
        };
        game.reset()?;
        Ok(game)
    }

    /// Start a fresh episode: re-place flags and agents, clear scores,
    /// tags, lane memory, and the tick counter.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.red_flags.reset(&mut self.rng)?;
        self.blue_flags.reset(&mut self.rng)?;
        self.red.reset(&mut self.rng, &self.red_flags)?;
        self.blue.reset(&mut self.rng, &self.blue_flags)?;
        if let Some(policy) = self.red_policy.as_mut() {
            policy.reset();
        }
        if let Some(policy) = self.blue_policy.as_mut() {
            policy.reset();
        }
        self.red_commands = vec![Vec2::ZERO; self.red.n()];
        self.blue_commands = vec![Vec2::ZERO; self.blue.n()];
        self.red_pending = None;
        self.blue_pending = None;
        self.tick = 0;
        self.red_score = 0;
        self.blue_score = 0;
        Ok(())
    }

    /// Advance the match by one tick under the configured rules.
    pub fn step(&mut self) {
        match self.rules {
            GameRules::Ctf => self.step_ctf(),
            GameRules::AttackDefend => self.step_attack_defend(),
        }
    }

    /// Override a team's next decision with externally supplied actions.
    ///
    /// The actions are validated immediately and converted to per-agent
    /// lateral commands; they take effect at the team's next decision tick
    /// in place of the tactical layer's output.
    pub fn inject_actions(
        &mut self,
        color: TeamColor,
        external: ExternalActions,
    ) -> Result<(), SimError> {
        let (team, pending) = match color {
            TeamColor::Red => (&self.red, &mut self.red_pending),
            TeamColor::Blue => (&self.blue, &mut self.blue_pending),
        };
        let lateral = actions::decode_lateral(
            color,
            team.action_space,
            team.acceleration_limit,
            team.n(),
            &external,
        )?;
        *pending = Some(lateral);
        Ok(())
    }

    // --- Tick phases ---

    fn step_ctf(&mut self) {
        self.refresh_commands();

        // Sequential application: red moves, tags are evaluated, then
        // blue moves.
        for idx in 0..self.red.n() {
            let command = self.red_commands[idx];
            self.red.apply_acceleration(idx, command, self.dt);
        }
        self.evaluate_tags();
        for idx in 0..self.blue.n() {
            let command = self.blue_commands[idx];
            self.blue.apply_acceleration(idx, command, self.dt);
        }

        self.evaluate_captures();
        self.evaluate_tags();
        self.untag_at_base();
        self.tick += 1;
    }

    fn step_attack_defend(&mut self) {
        self.refresh_commands();

        for idx in 0..self.red.n() {
            if self.red.alive[idx] {
                let command = self.red_commands[idx];
                self.red.apply_acceleration(idx, command, self.dt);
            }
        }
        for idx in 0..self.blue.n() {
            if self.blue.alive[idx] {
                let command = self.blue_commands[idx];
                self.blue.apply_acceleration(idx, command, self.dt);
            }
        }

        self.evaluate_kills();

        for idx in 0..self.red.n() {
            if self.red.alive[idx] && self.red.attempt_capture_any(idx, &mut self.blue_flags) {
                debug!(agent = idx, "attacker secured a flag");
                // The runner is out of play once the flag is secured.
                self.red.kill(idx);
            }
        }
        self.tick += 1;
    }

    /// Compute fresh commands for teams on their decision cadence, and
    /// apply the tagged go-to-base override to the held commands.
    fn refresh_commands(&mut self) {
        if self.tick % self.red.decision_ticks == 0 {
            if let Some(lateral) = self.red_pending.take() {
                self.red_commands = lateral
                    .iter()
                    .zip(&self.red.azimuths)
                    .map(|(&l, &az)| laws::lateral_to_vector(l, az))
                    .collect();
            } else if let Some(policy) = self.red_policy.as_mut() {
                let view = world_view(
                    &self.field,
                    &self.red,
                    &self.blue,
                    &self.red_flags,
                    &self.blue_flags,
                    self.difficulty,
                );
                self.red_commands = policy.decide(&view, &mut self.rng, self.dt);
            }
        }
        if self.tick % self.blue.decision_ticks == 0 {
            if let Some(lateral) = self.blue_pending.take() {
                self.blue_commands = lateral
                    .iter()
                    .zip(&self.blue.azimuths)
                    .map(|(&l, &az)| laws::lateral_to_vector(l, az))
                    .collect();
            } else if let Some(policy) = self.blue_policy.as_mut() {
                let view = world_view(
                    &self.field,
                    &self.blue,
                    &self.red,
                    &self.blue_flags,
                    &self.red_flags,
                    self.difficulty,
                );
                self.blue_commands = policy.decide(&view, &mut self.rng, self.dt);
            }
        }

        // A tagged agent always steers for its own flag, regardless of the
        // tactical output. The override is written into the held commands.
        for idx in 0..self.red.n() {
            if self.red.tagged[idx] {
                self.red_commands[idx] = laws::take_direct_path(
                    self.red.positions[idx],
                    self.red_flags.positions[0],
                    self.red.speed,
                    self.red.azimuths[idx],
                    self.dt,
                );
            }
        }
        for idx in 0..self.blue.n() {
            if self.blue.tagged[idx] {
                self.blue_commands[idx] = laws::take_direct_path(
                    self.blue.positions[idx],
                    self.blue_flags.positions[0],
                    self.blue.speed,
                    self.blue.azimuths[idx],
                    self.dt,
                );
            }
        }
    }

    /// Tag every cross-team pair within kill distance standing in the same
    /// defended territory; a tagged carrier drops its flag on the spot.
    fn evaluate_tags(&mut self) {
        for r in 0..self.red.n() {
            for b in 0..self.blue.n() {
                let distance = self.red.positions[r].distance(self.blue.positions[b]);
                if distance >= self.red.kill_distance {
                    continue;
                }
                let red_pos = self.red.positions[r];
                let blue_pos = self.blue.positions[b];

                if self.field.in_red_territory(red_pos) && self.field.in_red_territory(blue_pos) {
                    self.blue.tag(b);
                    if self.blue.has_flag[b] {
                        self.blue.has_flag[b] = false;
                        self.red_flags.release(0);
                        debug!(agent = b, "blue carrier tagged, red flag dropped");
                    }
                } else if self.field.in_blue_territory(red_pos)
                    && self.field.in_blue_territory(blue_pos)
                {
                    self.red.tag(r);
                    if self.red.has_flag[r] {
                        self.red.has_flag[r] = false;
                        self.blue_flags.release(0);
                        debug!(agent = r, "red carrier tagged, blue flag dropped");
                    }
                }
            }
        }
    }

    /// Capture and delivery for both teams. While a team's target flag is
    /// captured its agents attempt delivery instead, scoring one point on
    /// success.
    fn evaluate_captures(&mut self) {
        if self.blue_flags.captured[0] {
            for idx in 0..self.red.n() {
                if self
                    .red
                    .attempt_deliver(idx, &self.red_flags, &mut self.blue_flags)
                {
                    self.red_score += 1;
                    debug!(agent = idx, score = self.red_score, "red delivered the flag");
                }
            }
        } else {
            for idx in 0..self.red.n() {
                let had_flag = self.red.has_flag[idx];
                if self.red.attempt_capture(idx, &mut self.blue_flags) && !had_flag {
                    debug!(agent = idx, "red captured the blue flag");
                }
            }
        }

        if self.red_flags.captured[0] {
            for idx in 0..self.blue.n() {
                if self
                    .blue
                    .attempt_deliver(idx, &self.blue_flags, &mut self.red_flags)
                {
                    self.blue_score += 1;
                    debug!(
                        agent = idx,
                        score = self.blue_score,
                        "blue delivered the flag"
                    );
                }
            }
        } else {
            for idx in 0..self.blue.n() {
                let had_flag = self.blue.has_flag[idx];
                if self.blue.attempt_capture(idx, &mut self.red_flags) && !had_flag {
                    debug!(agent = idx, "blue captured the red flag");
                }
            }
        }
    }

    /// Untag agents that have made it back within capture distance of any
    /// of their own flags.
    fn untag_at_base(&mut self) {
        for idx in 0..self.red.n() {
            if self.red.tagged[idx]
                && self.red_flags.positions.iter().any(|flag| {
                    self.red.positions[idx].distance(*flag) < self.red_flags.capture_distance
                })
            {
                self.red.untag(idx);
                debug!(agent = idx, "red agent untagged at base");
            }
        }
        for idx in 0..self.blue.n() {
            if self.blue.tagged[idx]
                && self.blue_flags.positions.iter().any(|flag| {
                    self.blue.positions[idx].distance(*flag) < self.blue_flags.capture_distance
                })
            {
                self.blue.untag(idx);
                debug!(agent = idx, "blue agent untagged at base");
            }
        }
    }

    /// Attack/defend: each live defender kills the nearest attacker within
    /// kill distance, dying in the exchange.
    fn evaluate_kills(&mut self) {
        for b in 0..self.blue.n() {
            if !self.blue.alive[b] {
                continue;
            }
            let nearest = (0..self.red.n())
                .filter(|&r| self.red.alive[r])
                .min_by(|&x, &y| {
                    let dx = self.blue.positions[b].distance(self.red.positions[x]);
                    let dy = self.blue.positions[b].distance(self.red.positions[y]);
                    dx.total_cmp(&dy)
                });
            if let Some(r) = nearest {
                if self.blue.positions[b].distance(self.red.positions[r])
                    <= self.blue.kill_distance
                {
                    self.red.tag(r);
                    self.red.kill(r);
                    self.blue.kill(b);
                    debug!(defender = b, attacker = r, "defender traded with attacker");
                }
            }
        }
    }

    // --- Episodes & evaluation ---

    /// Run one full CTF episode to the tick limit.
    pub fn run_ctf_episode(&mut self) -> Result<CtfEpisode, ConfigError> {
        self.reset()?;
        let mut red_tagged = false;
        for _ in 0..self.max_ticks {
            self.step();
            if self.red.tagged.iter().any(|&t| t) {
                red_tagged = true;
            }
        }
        let outcome = self.outcome();
        info!(
            ?outcome,
            red = self.red_score,
            blue = self.blue_score,
            "ctf episode complete"
        );
        Ok(CtfEpisode {
            outcome,
            red_score: self.red_score,
            blue_score: self.blue_score,
            red_tagged,
            ticks: self.tick,
        })
    }

    /// Run one attack/defend episode; ends early when the designated flag
    /// is captured or every attacker is dead.
    pub fn run_attack_defend_episode(&mut self) -> Result<AttackDefendEpisode, ConfigError> {
        self.reset()?;
        let mut collisions = 0;
        for _ in 0..self.max_ticks {
            self.step();
            collisions += self.agent_collision_count();
            if self.blue_flags.captured[0] {
                break;
            }
            if self.red.alive.iter().all(|&a| !a) {
                break;
            }
        }
        let normalized_score =
            self.blue_flags.captured_count() as f64 / self.blue_flags.n() as f64;
        info!(
            score = normalized_score,
            ticks = self.tick,
            "attack/defend episode complete"
        );
        Ok(AttackDefendEpisode {
            normalized_score,
            collisions,
            ticks: self.tick,
        })
    }

    /// Run a batch of CTF episodes and aggregate the results.
    pub fn evaluate_ctf(&mut self, episodes: usize) -> Result<CtfEvaluation, ConfigError> {
        let mut outcomes = Vec::with_capacity(episodes);
        let mut red_wins = 0;
        let mut draws = 0;
        let mut blue_wins = 0;
        let mut tagged_episodes = 0;

        for _ in 0..episodes {
            let episode = self.run_ctf_episode()?;
            outcomes.push(match episode.outcome {
                MatchOutcome::RedWin => {
                    red_wins += 1;
                    1.0
                }
                MatchOutcome::Draw => {
                    draws += 1;
                    0.0
                }
                MatchOutcome::BlueWin => {
                    blue_wins += 1;
                    -1.0
                }
            });
            if episode.red_tagged {
                tagged_episodes += 1;
            }
        }

        info!(red_wins, draws, blue_wins, "ctf evaluation complete");
        Ok(CtfEvaluation {
            episodes,
            red_wins,
            draws,
            blue_wins,
            tagged_episodes,
            outcome: stats::summarize(&outcomes),
        })
    }

    /// Run a batch of attack/defend episodes and aggregate the results.
    pub fn evaluate_attack_defend(
        &mut self,
        episodes: usize,
    ) -> Result<AttackDefendEvaluation, ConfigError> {
        let mut collisions = Vec::with_capacity(episodes);
        let mut lengths = Vec::with_capacity(episodes);
        let mut scores = Vec::with_capacity(episodes);

        for _ in 0..episodes {
            let episode = self.run_attack_defend_episode()?;
            collisions.push(episode.collisions as f64);
            lengths.push(episode.ticks as f64);
            scores.push(episode.normalized_score);
        }

        info!(episodes, "attack/defend evaluation complete");
        Ok(AttackDefendEvaluation {
            episodes,
            collisions: stats::summarize(&collisions),
            episode_length: stats::summarize(&lengths),
            score: stats::summarize(&scores),
        })
    }

    /// Count same-team (red) agent pairs currently in collision range.
    pub fn agent_collision_count(&self) -> u32 {
        let threshold = 2.0 * AGENT_RADIUS + COLLISION_SAFETY_DISTANCE;
        let mut count = 0;
        for i in 0..self.red.n() {
            for j in (i + 1)..self.red.n() {
                if self.red.alive[i]
                    && self.red.alive[j]
                    && self.red.positions[i].distance(self.red.positions[j]) < threshold
                {
                    count += 1;
                }
            }
        }
        count
    }

    // --- State access ---

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn timestep(&self) -> f64 {
        self.dt
    }

    pub fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.red_score, self.blue_score)
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_scores(self.red_score, self.blue_score)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn red(&self) -> &Team {
        &self.red
    }

    pub fn blue(&self) -> &Team {
        &self.blue
    }

    pub fn red_flags(&self) -> &FlagSet {
        &self.red_flags
    }

    pub fn blue_flags(&self) -> &FlagSet {
        &self.blue_flags
    }

    /// The full observable state as a keyed record.
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            tick: self.tick,
            red: snapshot::team_state(&self.red),
            blue: snapshot::team_state(&self.blue),
            red_flags: snapshot::flag_state(&self.red_flags),
            blue_flags: snapshot::flag_state(&self.blue_flags),
            red_score: self.red_score,
            blue_score: self.blue_score,
        }
    }

    /// Overwrite the match state from a snapshot taken from a match with
    /// the same configuration.
    pub fn restore(&mut self, state: &MatchSnapshot) {
        snapshot::apply_team_state(&mut self.red, &state.red);
        snapshot::apply_team_state(&mut self.blue, &state.blue);
        snapshot::apply_flag_state(&mut self.red_flags, &state.red_flags);
        snapshot::apply_flag_state(&mut self.blue_flags, &state.blue_flags);
        self.red_score = state.red_score;
        self.blue_score = state.blue_score;
        self.tick = state.tick;
    }
}

fn team_sight(team: &Team) -> TeamSight<'_> {
    TeamSight {
        color: team.color,
        speed: team.speed,
        positions: &team.positions,
        velocities: &team.velocities,
        azimuths: &team.azimuths,
        alive: &team.alive,
        tagged: &team.tagged,
        has_flag: &team.has_flag,
    }
}

fn world_view<'a>(
    field: &'a Field,
    own: &'a Team,
    enemy: &'a Team,
    own_flags: &'a FlagSet,
    enemy_flags: &'a FlagSet,
    difficulty: u8,
) -> WorldView<'a> {
    WorldView {
        field,
        own: team_sight(own),
        enemy: team_sight(enemy),
        own_flags: FlagSight {
            positions: &own_flags.positions,
            captured: &own_flags.captured,
        },
        enemy_flags: FlagSight {
            positions: &enemy_flags.positions,
            captured: &enemy_flags.captured,
        },
        difficulty,
    }
}
