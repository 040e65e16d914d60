//! Guidance law library.
//!
//! Each law turns a targeting geometry (own position/velocity/heading,
//! target position/velocity) into a lateral acceleration command in world
//! coordinates. All laws command zero acceleration when the geometry is
//! degenerate (coincident positions, zero velocity) instead of dividing by
//! a vanishing norm.

use capflag_core::constants::*;
use capflag_core::types::Vec2;

/// Unit vector along a heading angle.
fn heading_unit(azimuth: f64) -> Vec2 {
    Vec2::new(azimuth.cos(), azimuth.sin())
}

/// Convert a signed lateral acceleration into a world-space vector
/// perpendicular to the given heading. Positive values turn left
/// (counter-clockwise).
pub fn lateral_to_vector(lateral_acceleration: f64, azimuth: f64) -> Vec2 {
    Vec2::new(
        -lateral_acceleration * azimuth.sin(),
        lateral_acceleration * azimuth.cos(),
    )
}

/// Angle between an agent's heading and the line of sight to a point,
/// in [0, π]. Zero when the geometry is degenerate.
pub fn heading_error(current_pos: Vec2, target_pos: Vec2, azimuth: f64) -> f64 {
    let los = target_pos - current_pos;
    let norm = los.length();
    if norm < GUIDANCE_EPS {
        return 0.0;
    }
    let dot = heading_unit(azimuth).dot(los / norm).clamp(-1.0, 1.0);
    dot.acos()
}

/// Heading-alignment controller: command a turn rate proportional to the
/// angle between the current heading and the line of sight to the target.
///
/// Not a physically optimal intercept — it simply minimises heading error
/// as fast as the (caller-enforced) acceleration limit allows.
pub fn take_direct_path(
    current_pos: Vec2,
    target_pos: Vec2,
    speed: f64,
    azimuth: f64,
    dt: f64,
) -> Vec2 {
    let los = target_pos - current_pos;
    let norm = los.length();
    if norm < GUIDANCE_EPS {
        return Vec2::ZERO;
    }
    let unit_los = los / norm;
    let heading = heading_unit(azimuth);

    let angle = heading_error(current_pos, target_pos, azimuth);
    let mut lateral = angle * speed / dt;
    // Cross product sign picks the turn direction: negative keeps the
    // positive (left) sense, otherwise turn right.
    if unit_los.perp_dot(heading) >= 0.0 {
        lateral = -lateral;
    }
    lateral_to_vector(lateral, azimuth)
}

/// Classic proportional navigation.
///
/// Commands acceleration proportional to the line-of-sight rotation rate
/// and the closing velocity aligned with the agent's heading. When the
/// target's acceleration is known, an augmented term of half the gain is
/// added.
pub fn proportional_navigation(
    agent_pos: Vec2,
    agent_vel: Vec2,
    target_pos: Vec2,
    target_vel: Vec2,
    target_accel: Option<Vec2>,
) -> Vec2 {
    let rel_pos = target_pos - agent_pos;
    let rel_vel = target_vel - agent_vel;

    let range_sq = rel_pos.length_squared();
    let agent_speed = agent_vel.length();
    if range_sq < GUIDANCE_EPS || agent_speed < GUIDANCE_EPS {
        return Vec2::ZERO;
    }

    // LOS rotation rate: scalar z component of (rel_pos × rel_vel) / |r|².
    let los_rate = rel_pos.perp_dot(rel_vel) / range_sq;

    // Closing velocity aligned with the agent's own heading.
    let closing = rel_vel.length() * agent_vel / agent_speed;

    // (-k·closing) × (0, 0, ω), projected back to the plane.
    let n = PN_NAVIGATION_CONSTANT;
    let mut acceleration = Vec2::new(-n * closing.y * los_rate, n * closing.x * los_rate);

    if let Some(target_accel) = target_accel {
        acceleration += 0.5 * n * target_accel;
    }
    acceleration
}

/// All-aspect proportional navigation, usable at arbitrary engagement
/// geometry.
///
/// Combines a heading-error-dependent polynomial correction with the PN
/// cross-product term, scaled by agent speed and inverse relative distance.
pub fn all_aspect_proportional_navigation(
    agent_pos: Vec2,
    agent_vel: Vec2,
    target_pos: Vec2,
    target_vel: Vec2,
    azimuth: f64,
) -> Vec2 {
    let rel_pos = target_pos - agent_pos;
    let rel_vel = target_vel - agent_vel;
    let distance = rel_pos.length();
    let agent_speed = agent_vel.length();
    if distance < GUIDANCE_EPS || agent_speed < GUIDANCE_EPS {
        return Vec2::ZERO;
    }

    let heading = heading_unit(azimuth);
    let unit_los = rel_pos / distance;

    // Signed heading error (positive when the LOS is to the left).
    let error = heading.perp_dot(unit_los).atan2(heading.dot(unit_los));

    let los_rate = rel_pos.perp_dot(rel_vel) / rel_pos.length_squared();

    let correction = (AAPN_POLY_C1 * error + AAPN_POLY_C2 * error.powi(2)
        + AAPN_POLY_C3 * error.powi(3))
        * agent_speed.powi(3)
        / distance;
    let lateral = AAPN_LOS_GAIN * agent_speed * los_rate + correction;

    lateral_to_vector(lateral, azimuth)
}

/// GENEX terminal guidance: shapes the approach so the final velocity
/// opposes the target's. Included for completeness; not wired into the
/// default tactics.
pub fn genex(agent_pos: Vec2, agent_vel: Vec2, target_pos: Vec2, target_vel: Vec2) -> Vec2 {
    let n = GENEX_GAIN;
    let k1 = (n + 2.0) * (n + 3.0);
    let k2 = -(n + 1.0) * (n + 2.0);

    let rel_pos = target_pos - agent_pos;
    let range = rel_pos.length();
    let agent_speed = agent_vel.length();
    let target_speed = target_vel.length();
    if range < GUIDANCE_EPS || agent_speed < GUIDANCE_EPS || target_speed < GUIDANCE_EPS {
        return Vec2::ZERO;
    }

    let los = rel_pos / range;
    let desired_final = -target_vel / target_speed;
    let own = agent_vel / agent_speed;

    agent_speed * agent_speed / range
        * (k1 * (los - own * los.dot(own)) + k2 * (desired_final - own * desired_final.dot(own)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use capflag_core::constants::GUIDANCE_EPS;

    #[test]
    fn test_heading_error_range() {
        // Heading east, target due north: quarter turn.
        let error = heading_error(Vec2::ZERO, Vec2::new(0.0, 10.0), 0.0);
        assert!((error - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        // Target dead ahead: no error.
        let error = heading_error(Vec2::ZERO, Vec2::new(10.0, 0.0), 0.0);
        assert!(error.abs() < 1e-12);

        // Target dead astern: half turn.
        let error = heading_error(Vec2::ZERO, Vec2::new(-10.0, 0.0), 0.0);
        assert!((error - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_direct_path_turns_toward_target() {
        // Heading east, target north: command should point north (left turn).
        let accel = take_direct_path(Vec2::ZERO, Vec2::new(0.0, 10.0), 1.0, 0.0, 1.0);
        assert!(accel.y > 0.0, "should turn left toward the target");
        assert!(accel.x.abs() < 1e-12);

        // Heading east, target south: command should point south.
        let accel = take_direct_path(Vec2::ZERO, Vec2::new(0.0, -10.0), 1.0, 0.0, 1.0);
        assert!(accel.y < 0.0, "should turn right toward the target");
    }

    #[test]
    fn test_direct_path_magnitude_scales_with_error() {
        let quarter = take_direct_path(Vec2::ZERO, Vec2::new(0.0, 10.0), 2.0, 0.0, 0.5);
        let expected = std::f64::consts::FRAC_PI_2 * 2.0 / 0.5;
        assert!((quarter.length() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_direct_path_zero_distance_falls_back_to_zero() {
        let accel = take_direct_path(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 1.0, 0.3, 1.0);
        assert_eq!(accel, Vec2::ZERO);
        assert!(accel.x.is_finite() && accel.y.is_finite());
    }

    #[test]
    fn test_pn_zero_for_collinear_geometry() {
        // Tail chase along the x axis: LOS never rotates, no command.
        let accel = proportional_navigation(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.5, 0.0),
            None,
        );
        assert!(accel.length() < 1e-12);
    }

    #[test]
    fn test_pn_steers_toward_crossing_target() {
        // Target crossing left-to-right above the agent: LOS rotates
        // clockwise, the command must have a rightward (negative y after
        // rotation) component for an eastbound agent.
        let accel = proportional_navigation(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, -0.8),
            None,
        );
        assert!(accel.length() > 0.0);
        // rel_pos × rel_vel < 0 here, so the turn is toward the target's
        // future position below the current LOS.
        assert!(accel.y < 0.0);
    }

    #[test]
    fn test_pn_augmented_term() {
        let base = proportional_navigation(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, -0.5),
            None,
        );
        let augmented = proportional_navigation(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(0.0, -0.5),
            Some(Vec2::new(0.0, 0.2)),
        );
        let delta = augmented - base;
        let expected = 0.5 * capflag_core::constants::PN_NAVIGATION_CONSTANT * 0.2;
        assert!((delta.y - expected).abs() < 1e-12);
        assert!(delta.x.abs() < 1e-12);
    }

    #[test]
    fn test_pn_degenerate_geometry_is_zero() {
        // Coincident positions.
        let accel = proportional_navigation(
            Vec2::new(3.0, 3.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(0.0, 1.0),
            None,
        );
        assert_eq!(accel, Vec2::ZERO);

        // Zero own velocity.
        let accel = proportional_navigation(
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 1.0),
            None,
        );
        assert_eq!(accel, Vec2::ZERO);
    }

    #[test]
    fn test_aapn_zero_error_tail_chase() {
        // Dead-ahead target moving away: no LOS rotation, no heading error.
        let accel = all_aspect_proportional_navigation(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.5, 0.0),
            0.0,
        );
        assert!(accel.length() < 1e-12);
    }

    #[test]
    fn test_aapn_degenerate_geometry_is_zero() {
        let accel = all_aspect_proportional_navigation(
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            0.0,
        );
        assert_eq!(accel, Vec2::ZERO);
    }

    #[test]
    fn test_aapn_beam_geometry_commands_a_turn() {
        // Target abeam to the left, closing: expect a non-zero command.
        let accel = all_aspect_proportional_navigation(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 8.0),
            Vec2::new(-0.8, 0.0),
            0.0,
        );
        assert!(accel.length() > GUIDANCE_EPS);
    }

    #[test]
    fn test_genex_head_on_is_radial() {
        // Head-on geometry: desired final velocity already opposes the
        // target's, both shaping terms align with the LOS plane.
        let accel = genex(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(-1.0, 0.0),
        );
        // Own velocity is along the LOS, so both projection terms vanish.
        assert!(accel.length() < 1e-12);
    }

    #[test]
    fn test_genex_degenerate_geometry_is_zero() {
        let accel = genex(
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::ZERO,
        );
        assert_eq!(accel, Vec2::ZERO);
    }
}
