//! Per-team tactical controllers.
//!
//! One policy per team color, selected once at match construction. Each
//! tick the controller composes, per agent: tagged override, defend versus
//! attack split, and the sticky lane choice, then delegates to the
//! behavior library for the actual acceleration command.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use capflag_core::enums::{ControlMode, GameRules, TacticalAction, TeamColor};
use capflag_core::error::ConfigError;
use capflag_core::types::Vec2;

use crate::behaviors;
use crate::view::WorldView;

/// A team's decision-making capability.
///
/// `decide` produces one acceleration command per agent from the current
/// world view; lane memory persists across calls until `reset`.
pub trait TacticalPolicy {
    fn decide(&mut self, view: &WorldView, rng: &mut ChaCha8Rng, dt: f64) -> Vec<Vec2>;

    /// Clear per-agent lane memory at episode reset.
    fn reset(&mut self);

    /// The behavior each agent last committed to.
    fn last_actions(&self) -> &[TacticalAction];
}

/// Build the rule-based policy for a team color.
pub fn policy_for(
    color: TeamColor,
    goal: GameRules,
    n_agents: usize,
) -> Result<Box<dyn TacticalPolicy>, ConfigError> {
    match color {
        TeamColor::Red => Ok(Box::new(RedPolicy::new(goal, n_agents)?)),
        TeamColor::Blue => Ok(Box::new(BluePolicy::new(goal, n_agents)?)),
    }
}

fn require_ctf(goal: GameRules) -> Result<(), ConfigError> {
    if goal != GameRules::Ctf {
        return Err(ConfigError::UnsupportedGoal {
            control: ControlMode::Custom,
            goal,
        });
    }
    Ok(())
}

/// Roll a fresh sticky lane uniformly from a small option set.
fn roll_lane(rng: &mut ChaCha8Rng, options: &[TacticalAction]) -> TacticalAction {
    options[rng.gen_range(0..options.len())]
}

/// Red team controller.
///
/// The difficulty knob escalates the defense: a looping defender at 1,
/// intercept-first-intruder at 2, intercept-closest-to-flag at 3,
/// attacker-assist at 4, and full defense (every agent defends) at 5.
pub struct RedPolicy {
    last_action: Vec<TacticalAction>,
}

impl RedPolicy {
    pub fn new(goal: GameRules, n_agents: usize) -> Result<Self, ConfigError> {
        require_ctf(goal)?;
        Ok(Self {
            last_action: vec![TacticalAction::Idle; n_agents],
        })
    }

    fn decide_defender(&mut self, view: &WorldView, idx: usize, dt: f64) -> Vec2 {
        let intruders = view.untagged_enemies_in_territory();

        if view.difficulty == 1 || intruders.is_empty() {
            self.last_action[idx] = TacticalAction::Wait;
            return behaviors::wait_at_team_flag(view, idx, 0, dt);
        }

        let target = match view.difficulty {
            2 => intruders[0],
            5 if idx == 0 => view.highest_enemy().unwrap_or(intruders[0]),
            5 if idx == 1 => view.lowest_enemy().unwrap_or(intruders[0]),
            _ => view.closest_enemy_to_own_flag().unwrap_or(intruders[0]),
        };
        self.last_action[idx] = TacticalAction::GoTag;
        behaviors::go_tag_agent(view, idx, target, dt, false)
    }

    fn decide_attacker(
        &mut self,
        view: &WorldView,
        rng: &mut ChaCha8Rng,
        idx: usize,
        dt: f64,
    ) -> Vec2 {
        let enemy_flag_captured = view.enemy_flags.captured[0];
        let team_flag_captured = view.own_flags.captured[0];

        if enemy_flag_captured {
            if view.own.has_flag[idx] {
                if !self.last_action[idx].is_return_lane() {
                    self.last_action[idx] = roll_lane(
                        rng,
                        &[
                            TacticalAction::ReturnTop,
                            TacticalAction::ReturnBottom,
                            TacticalAction::ReturnCentre,
                        ],
                    );
                }
                return match self.last_action[idx] {
                    TacticalAction::ReturnTop => behaviors::return_top(view, idx, 0, dt),
                    TacticalAction::ReturnBottom => behaviors::return_bottom(view, idx, 0, dt),
                    _ => behaviors::return_centre(view, idx, 0, dt),
                };
            }
            // A teammate carries the flag: loiter at the enemy flag stand.
            return behaviors::wait_at_enemy_flag(view, idx, 0, dt);
        }

        if team_flag_captured && view.difficulty == 4 {
            // Attacker-assist defense: chase down the flag carrier.
            let holder = view.enemy_flag_holder().unwrap_or(0);
            self.last_action[idx] = TacticalAction::GoTag;
            return behaviors::go_tag_agent(view, idx, holder, dt, false);
        }

        let lanes: &[TacticalAction] = if view.difficulty == 4 {
            &[TacticalAction::AttackTop, TacticalAction::AttackBottom]
        } else {
            &[
                TacticalAction::AttackTop,
                TacticalAction::AttackBottom,
                TacticalAction::AttackCentre,
            ]
        };
        if !lanes.contains(&self.last_action[idx]) {
            self.last_action[idx] = roll_lane(rng, lanes);
        }
        match self.last_action[idx] {
            TacticalAction::AttackTop => behaviors::attack_top(view, idx, 0, dt),
            TacticalAction::AttackBottom => behaviors::attack_bottom(view, idx, 0, dt),
            _ => behaviors::attack_centre(view, idx, 0, dt),
        }
    }
}

impl TacticalPolicy for RedPolicy {
    fn decide(&mut self, view: &WorldView, rng: &mut ChaCha8Rng, dt: f64) -> Vec<Vec2> {
        let mut commands = vec![Vec2::ZERO; view.n_agents()];
        for idx in 0..view.n_agents() {
            if view.own.tagged[idx] {
                self.last_action[idx] = TacticalAction::Tagged;
                commands[idx] = behaviors::go_to_base(view, idx, 0, dt);
            } else if idx == 0 || view.difficulty == 5 {
                commands[idx] = self.decide_defender(view, idx, dt);
            } else {
                commands[idx] = self.decide_attacker(view, rng, idx, dt);
            }
        }
        commands
    }

    fn reset(&mut self) {
        self.last_action.fill(TacticalAction::Idle);
    }

    fn last_actions(&self) -> &[TacticalAction] {
        &self.last_action
    }
}

/// Blue team controller.
///
/// Counterpart to the red ladder: agents defend their half until an
/// intruder is tagged or the enemy flag falls, then attack with the
/// defender-avoidance paths matched to the red difficulty.
pub struct BluePolicy {
    last_action: Vec<TacticalAction>,
}

impl BluePolicy {
    pub fn new(goal: GameRules, n_agents: usize) -> Result<Self, ConfigError> {
        require_ctf(goal)?;
        Ok(Self {
            last_action: vec![TacticalAction::Idle; n_agents],
        })
    }

    fn decide_attacker(
        &mut self,
        view: &WorldView,
        rng: &mut ChaCha8Rng,
        idx: usize,
        dt: f64,
    ) -> Vec2 {
        if view.enemy_flags.captured[0] {
            if view.own.has_flag[idx] {
                return if view.difficulty > 1 {
                    behaviors::return_smarter(view, idx, 0, dt)
                } else {
                    behaviors::return_smart(view, idx, 0, dt)
                };
            }
            return behaviors::wait_at_enemy_flag(view, idx, 0, dt);
        }

        match view.difficulty {
            2 => behaviors::go_to_enemy_flag_smarter(view, idx, 0, dt),
            d if d > 2 => behaviors::go_to_enemy_flag_smartest(view, idx, 0, dt),
            _ => {
                // Naive opposition: pick a lane and stick with it.
                if !self.last_action[idx].is_attack_lane() {
                    self.last_action[idx] = roll_lane(
                        rng,
                        &[
                            TacticalAction::AttackTop,
                            TacticalAction::AttackBottom,
                            TacticalAction::AttackCentre,
                        ],
                    );
                }
                match self.last_action[idx] {
                    TacticalAction::AttackTop => behaviors::attack_top(view, idx, 0, dt),
                    TacticalAction::AttackBottom => behaviors::attack_bottom(view, idx, 0, dt),
                    _ => behaviors::attack_centre(view, idx, 0, dt),
                }
            }
        }
    }
}

impl TacticalPolicy for BluePolicy {
    fn decide(&mut self, view: &WorldView, rng: &mut ChaCha8Rng, dt: f64) -> Vec<Vec2> {
        let mut commands = vec![Vec2::ZERO; view.n_agents()];
        let enemy_flag_captured = view.enemy_flags.captured[0];

        for idx in 0..view.n_agents() {
            if view.own.tagged[idx] {
                self.last_action[idx] = TacticalAction::Tagged;
                commands[idx] = behaviors::go_to_base(view, idx, 0, dt);
                continue;
            }

            let intruders = view.untagged_enemies_in_territory();
            let no_intruder_tagged_yet = view.tagged_enemies_in_territory().is_empty();

            // At difficulty 5 red never attacks, so blue skips its defense
            // phase entirely.
            let skip_defense = view.difficulty == 5;
            let defend = !skip_defense
                && ((no_intruder_tagged_yet
                    && view.in_own_territory(idx)
                    && !enemy_flag_captured
                    && view.difficulty > 1)
                    || (idx == 0 && view.difficulty < 2));

            if defend {
                if intruders.is_empty() {
                    self.last_action[idx] = TacticalAction::Wait;
                    commands[idx] = behaviors::wait_at_team_flag(view, idx, 0, dt);
                } else {
                    self.last_action[idx] = TacticalAction::GoTag;
                    commands[idx] = behaviors::go_tag_agent(view, idx, intruders[0], dt, false);
                }
            } else {
                commands[idx] = self.decide_attacker(view, rng, idx, dt);
            }
        }
        commands
    }

    fn reset(&mut self) {
        self.last_action.fill(TacticalAction::Idle);
    }

    fn last_actions(&self) -> &[TacticalAction] {
        &self.last_action
    }
}
