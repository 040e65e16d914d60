//! High-level behavior library.
//!
//! Each behavior converts world state into a single acceleration command
//! for one agent by choosing a target point (or enemy) and delegating to
//! the guidance laws. Behaviors are pure; lane stickiness lives in the
//! policies.
//!
//! The `_smart`/`_smarter`/`_smartest` attack paths and the smart returns
//! are the blue side's defender-avoidance escalation; they key off the
//! enemy's lead defender (agent 0). Where a heuristic assumes a two-agent
//! team, teams of other sizes fall back to the plain flag run.

use capflag_core::constants::*;
use capflag_core::types::Vec2;
use capflag_guidance::laws;

use crate::view::WorldView;

/// Direct path from an agent to an arbitrary point.
fn direct(view: &WorldView, agent_idx: usize, target: Vec2, dt: f64) -> Vec2 {
    laws::take_direct_path(
        view.own.positions[agent_idx],
        target,
        view.own.speed,
        view.own.azimuths[agent_idx],
        dt,
    )
}

/// Take the direct path to the enemy flag.
pub fn go_to_enemy_flag(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    direct(view, agent_idx, view.enemy_flags.positions[flag_idx], dt)
}

/// Travel to the home flag.
pub fn go_to_base(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    direct(view, agent_idx, view.own_flags.positions[flag_idx], dt)
}

/// Hold station at the enemy flag (continuously steering back onto it).
pub fn wait_at_enemy_flag(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    direct(view, agent_idx, view.enemy_flags.positions[flag_idx], dt)
}

/// Hold station at the home flag.
pub fn wait_at_team_flag(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    direct(view, agent_idx, view.own_flags.positions[flag_idx], dt)
}

/// Intercept an enemy agent to tag it.
///
/// With the target ahead (heading error under π/2) proportional navigation
/// leads the intercept; otherwise the agent first turns onto the target
/// with the direct-path controller. `all_aspect` switches to the
/// all-aspect PN variant instead.
pub fn go_tag_agent(
    view: &WorldView,
    agent_idx: usize,
    enemy_idx: usize,
    dt: f64,
    all_aspect: bool,
) -> Vec2 {
    let own_pos = view.own.positions[agent_idx];
    let own_vel = view.own.velocities[agent_idx];
    let azimuth = view.own.azimuths[agent_idx];
    let enemy_pos = view.enemy.positions[enemy_idx];
    let enemy_vel = view.enemy.velocities[enemy_idx];

    if all_aspect {
        return laws::all_aspect_proportional_navigation(
            own_pos, own_vel, enemy_pos, enemy_vel, azimuth,
        );
    }

    let error = laws::heading_error(own_pos, enemy_pos, azimuth);
    if error < PURSUIT_HEADING_THRESHOLD {
        laws::proportional_navigation(own_pos, own_vel, enemy_pos, enemy_vel, None)
    } else {
        direct(view, agent_idx, enemy_pos, dt)
    }
}

/// Route to the enemy flag through the centre of the field.
pub fn attack_centre(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    attack_via(view, agent_idx, flag_idx, view.field.centre(), dt)
}

/// Route to the enemy flag through the upper midline waypoint.
pub fn attack_top(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    attack_via(view, agent_idx, flag_idx, view.field.top(), dt)
}

/// Route to the enemy flag through the lower midline waypoint.
pub fn attack_bottom(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    attack_via(view, agent_idx, flag_idx, view.field.bottom(), dt)
}

fn attack_via(
    view: &WorldView,
    agent_idx: usize,
    flag_idx: usize,
    waypoint: Vec2,
    dt: f64,
) -> Vec2 {
    if view.in_own_territory(agent_idx) {
        direct(view, agent_idx, waypoint, dt)
    } else {
        match view.own.color {
            capflag_core::enums::TeamColor::Red => go_to_enemy_flag(view, agent_idx, flag_idx, dt),
            capflag_core::enums::TeamColor::Blue => {
                go_to_enemy_flag_smart(view, agent_idx, flag_idx, dt)
            }
        }
    }
}

/// Flag run that avoids the enemy's lead defender: dash in when the flag is
/// momentarily unguarded, swerve to a flank when the defender closes, tail
/// a point behind the defender otherwise.
pub fn go_to_enemy_flag_smart(
    view: &WorldView,
    agent_idx: usize,
    flag_idx: usize,
    dt: f64,
) -> Vec2 {
    if view.enemy.positions.is_empty() {
        return go_to_enemy_flag(view, agent_idx, flag_idx, dt);
    }

    let own_pos = view.own.positions[agent_idx];
    let flag = view.enemy_flags.positions[flag_idx];
    let defender_pos = view.enemy.positions[0];
    let defender_vel = view.enemy.velocities[0];

    let own_flag_dist = own_pos.distance(flag);
    let defender_flag_dist = defender_pos.distance(flag);
    let defender_dist = own_pos.distance(defender_pos);

    if own_flag_dist < SAFE_CAPTURE_RADIUS && defender_flag_dist > SAFE_CAPTURE_RADIUS {
        // Flag unguarded and within reach: dash.
        direct(view, agent_idx, flag, dt)
    } else if defender_vel.x < DEFENDER_CLOSING_VX && defender_dist < SMART_AVOIDANCE_RADIUS {
        // Defender closing hard: swerve around the side it is vacating.
        if defender_vel.y < 0.0 {
            direct(view, agent_idx, ENEMY_TOP_FLANK, dt)
        } else {
            direct(view, agent_idx, ENEMY_BOTTOM_FLANK, dt)
        }
    } else if defender_dist < SMART_AVOIDANCE_RADIUS {
        // Tail a point behind the defender until it commits elsewhere.
        let tail = defender_pos - defender_vel * DEFENDER_TAIL_SECONDS;
        direct(view, agent_idx, tail, dt)
    } else {
        direct(view, agent_idx, flag, dt)
    }
}

/// Two-agent decoy attack: the flanker mirrors the flag's side of the
/// field while the runner goes straight for the flag, splitting the
/// defender's attention.
pub fn go_to_enemy_flag_smarter(
    view: &WorldView,
    agent_idx: usize,
    flag_idx: usize,
    dt: f64,
) -> Vec2 {
    let flag = view.enemy_flags.positions[flag_idx];

    // The decoy works the side opposite the flag.
    let (decoy_flank, decoy_mid) = if flag.y < view.field.centre().y {
        (DECOY_TOP_FLANK, view.field.top())
    } else {
        (DECOY_BOTTOM_FLANK, view.field.bottom())
    };

    if view.in_own_territory(agent_idx) {
        match agent_idx {
            0 => direct(view, agent_idx, decoy_mid, dt),
            1 => direct(view, agent_idx, flag, dt),
            _ => direct(view, agent_idx, view.field.centre(), dt),
        }
    } else if view.own.positions[agent_idx].x > FLANK_REACHED_X {
        // Flank reached: commit to the flag.
        direct(view, agent_idx, flag, dt)
    } else {
        match agent_idx {
            0 => direct(view, agent_idx, decoy_flank, dt),
            _ => direct(view, agent_idx, flag, dt),
        }
    }
}

/// Equidistant-confusion attack: both attackers flank opposite sides and
/// hold roughly the same distance to the flag so the defender cannot
/// commit, evading when it closes on the nearer one.
pub fn go_to_enemy_flag_smartest(
    view: &WorldView,
    agent_idx: usize,
    flag_idx: usize,
    dt: f64,
) -> Vec2 {
    if view.own.positions.len() < 2 || view.enemy.positions.is_empty() {
        return go_to_enemy_flag(view, agent_idx, flag_idx, dt);
    }

    let flag = view.enemy_flags.positions[flag_idx];
    let own_pos = view.own.positions[agent_idx];
    let flag_dist = [
        view.own.positions[0].distance(flag),
        view.own.positions[1].distance(flag),
    ];
    let defender_pos = view.enemy.positions[0];

    if view.in_own_territory(agent_idx) {
        match agent_idx {
            // A leading attacker loiters so the pair stays equidistant.
            0 if flag_dist[0] < flag_dist[1] - LEAD_DISTANCE_BUFFER => {
                direct(view, agent_idx, HOLD_TOP, dt)
            }
            0 => direct(view, agent_idx, view.field.top(), dt),
            1 if flag_dist[1] < flag_dist[0] - LEAD_DISTANCE_BUFFER => {
                direct(view, agent_idx, HOLD_BOTTOM, dt)
            }
            1 => direct(view, agent_idx, view.field.bottom(), dt),
            _ => direct(view, agent_idx, view.field.centre(), dt),
        }
    } else if own_pos.x > FLANK_REACHED_X || view.own.tagged[0] || view.own.tagged[1] {
        // Flank reached, or the defender committed to tagging the partner.
        direct(view, agent_idx, flag, dt)
    } else {
        let near_defender = own_pos.distance(defender_pos) < SMARTEST_AVOIDANCE_RADIUS;
        match agent_idx {
            0 if near_defender && flag_dist[0] < flag_dist[1] => {
                evade(view, agent_idx, defender_pos, dt)
            }
            0 => direct(view, agent_idx, ATTACK_TOP_FLANK, dt),
            1 if near_defender && flag_dist[1] < flag_dist[0] => {
                evade(view, agent_idx, defender_pos, dt)
            }
            1 => direct(view, agent_idx, ATTACK_BOTTOM_FLANK, dt),
            _ => direct(view, agent_idx, flag, dt),
        }
    }
}

/// Break off toward the midline on the side away from the defender.
fn evade(view: &WorldView, agent_idx: usize, defender_pos: Vec2, dt: f64) -> Vec2 {
    if view.own.positions[agent_idx].y < defender_pos.y {
        direct(view, agent_idx, EVADE_BOTTOM, dt)
    } else {
        direct(view, agent_idx, EVADE_TOP, dt)
    }
}

/// Carry the flag home, first clearing the flag zone away from the
/// defender before turning for base.
pub fn return_smart(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    if view.in_enemy_territory(agent_idx) && !view.enemy.positions.is_empty() {
        let own_pos = view.own.positions[agent_idx];
        let relative = view.enemy.positions[0] - own_pos;
        let flag_dist = own_pos.distance(view.enemy_flags.positions[flag_idx]);
        if relative.y > 0.0 && flag_dist < RETREAT_CLEAR_RADIUS {
            direct(view, agent_idx, RETREAT_BOTTOM, dt)
        } else if flag_dist < RETREAT_CLEAR_RADIUS {
            direct(view, agent_idx, RETREAT_TOP, dt)
        } else {
            go_to_base(view, agent_idx, flag_idx, dt)
        }
    } else {
        go_to_base(view, agent_idx, flag_idx, dt)
    }
}

/// Carry the flag home hugging the top or bottom edge, whichever is
/// farther from the defender.
pub fn return_smarter(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    if view.in_enemy_territory(agent_idx) && !view.enemy.positions.is_empty() {
        let own_y = view.own.positions[agent_idx].y;
        let defender_y = view.enemy.positions[0].y;
        let boundary = view.field.boundary;
        if defender_y > own_y {
            direct(
                view,
                agent_idx,
                Vec2::new(view.field.midline_x(), boundary.min.y + RETURN_EDGE_MARGIN),
                dt,
            )
        } else if defender_y < own_y {
            direct(
                view,
                agent_idx,
                Vec2::new(view.field.midline_x(), boundary.max.y - RETURN_EDGE_MARGIN),
                dt,
            )
        } else {
            go_to_base(view, agent_idx, flag_idx, dt)
        }
    } else {
        go_to_base(view, agent_idx, flag_idx, dt)
    }
}

/// Return to the home flag through the centre of the field.
pub fn return_centre(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    return_via(view, agent_idx, flag_idx, view.field.centre(), dt)
}

/// Return to the home flag through the upper midline waypoint.
pub fn return_top(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    return_via(view, agent_idx, flag_idx, view.field.top(), dt)
}

/// Return to the home flag through the lower midline waypoint.
pub fn return_bottom(view: &WorldView, agent_idx: usize, flag_idx: usize, dt: f64) -> Vec2 {
    return_via(view, agent_idx, flag_idx, view.field.bottom(), dt)
}

fn return_via(
    view: &WorldView,
    agent_idx: usize,
    flag_idx: usize,
    waypoint: Vec2,
    dt: f64,
) -> Vec2 {
    if view.in_enemy_territory(agent_idx) {
        direct(view, agent_idx, waypoint, dt)
    } else {
        go_to_base(view, agent_idx, flag_idx, dt)
    }
}
