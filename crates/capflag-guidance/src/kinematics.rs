//! Constant-speed coordinated-turn kinematics.
//!
//! The integrator is the sole source-of-truth state update for every agent
//! each tick. Given a commanded acceleration it clamps to the lateral
//! limit, derives a yaw rate, and advances position/velocity/heading with
//! the closed-form turn displacement. Deterministic for identical inputs.

use capflag_core::constants::YAW_RATE_EPS;
use capflag_core::types::Vec2;

/// Result of integrating one agent over one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicUpdate {
    pub position: Vec2,
    pub velocity: Vec2,
    pub azimuth: f64,
    /// The acceleration actually applied (post-clamp, post-turn).
    pub acceleration: Vec2,
}

/// Advance one agent by `dt` seconds under a commanded acceleration.
///
/// Speed is constant: the command only changes the heading, at a yaw rate
/// of `lateral / speed`, where the lateral magnitude is clamped to
/// `acceleration_limit` by uniform scale-down.
pub fn integrate(
    position: Vec2,
    azimuth: f64,
    speed: f64,
    acceleration_limit: f64,
    commanded: Vec2,
    dt: f64,
) -> KinematicUpdate {
    let mut commanded = commanded;
    let mut lateral = commanded.length();
    if lateral > acceleration_limit {
        commanded = commanded / lateral * acceleration_limit;
        lateral = commanded.length();
    }

    // Turn direction from the cross product of the command and the current
    // heading: negative keeps the positive (left) sense, otherwise the
    // lateral magnitude is negated for a right turn.
    let heading = Vec2::new(azimuth.cos(), azimuth.sin());
    if lateral != 0.0 && commanded.perp_dot(heading) >= 0.0 {
        lateral = -lateral;
    }

    let yaw_rate = lateral / speed;
    let new_heading = azimuth + yaw_rate * dt;

    let position = if yaw_rate.abs() < YAW_RATE_EPS {
        position + speed * dt * Vec2::new(new_heading.cos(), new_heading.sin())
    } else {
        Vec2::new(
            position.x + speed * (new_heading.sin() - azimuth.sin()) / yaw_rate,
            position.y + speed * (azimuth.cos() - new_heading.cos()) / yaw_rate,
        )
    };

    let velocity = speed * Vec2::new(new_heading.cos(), new_heading.sin());
    let acceleration = speed * yaw_rate * Vec2::new(-new_heading.sin(), new_heading.cos());

    KinematicUpdate {
        position,
        velocity,
        // Recomputed from the velocity for numerical consistency.
        azimuth: velocity.y.atan2(velocity.x),
        acceleration,
    }
}
