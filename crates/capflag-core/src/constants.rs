//! Simulation constants and tuning parameters.

use crate::types::{Bounds, Vec2};

// --- Field geometry ---

/// Game boundary width (x extent, game units).
pub const FIELD_WIDTH: f64 = 160.0;

/// Game boundary height (y extent, game units).
pub const FIELD_HEIGHT: f64 = 80.0;

// --- Placement regions ---

/// Where red flags may be placed at reset.
pub const RED_FLAG_BOUNDS: Bounds = Bounds::new(Vec2::new(135.0, 30.0), Vec2::new(145.0, 50.0));

/// Where blue flags may be placed at reset.
pub const BLUE_FLAG_BOUNDS: Bounds = Bounds::new(Vec2::new(15.0, 30.0), Vec2::new(25.0, 50.0));

/// Where red agents may be placed at reset.
pub const RED_AGENT_BOUNDS: Bounds = Bounds::new(Vec2::new(120.0, 20.0), Vec2::new(140.0, 60.0));

/// Where blue agents may be placed at reset.
pub const BLUE_AGENT_BOUNDS: Bounds = Bounds::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 60.0));

/// Initial heading for blue agents (facing +x, toward red territory).
pub const INITIAL_BLUE_AZIMUTH: f64 = 0.0;

/// Initial heading for red agents (facing -x, toward blue territory).
pub const INITIAL_RED_AZIMUTH: f64 = std::f64::consts::PI;

/// Minimum pairwise separation for constrained placement, as a multiple
/// of the entity radius.
pub const MIN_SEPARATION_FACTOR: f64 = 4.0;

/// Attempts allowed before constrained placement is declared infeasible.
pub const PLACEMENT_RETRY_BUDGET: usize = 10_000;

// --- Entities ---

/// Physical radius of an agent (game units, used for collision counting).
pub const AGENT_RADIUS: f64 = 1.0;

/// Extra margin added to collision distance checks.
pub const COLLISION_SAFETY_DISTANCE: f64 = 1.0;

/// Distance within which a defender tags an intruder.
pub const KILL_DISTANCE: f64 = 4.0;

/// Distance within which a flag can be captured, delivered, or an agent
/// untagged at its own flag.
pub const CAPTURE_DISTANCE: f64 = 10.0;

/// Dead agents are relocated here, far outside the boundary, so that
/// territory and tag checks can never match them.
pub const DEAD_AGENT_SENTINEL: Vec2 = Vec2::new(1e6, 1e6);

// --- Episode ---

/// Simulated seconds per episode; the tick limit is this divided by the
/// simulation timestep.
pub const EPISODE_SECONDS: f64 = 800.0;

// --- Guidance ---

/// Proportional navigation gain.
pub const PN_NAVIGATION_CONSTANT: f64 = 5.0;

/// All-aspect PN line-of-sight gain.
pub const AAPN_LOS_GAIN: f64 = 3.0;

/// All-aspect PN heading-error polynomial coefficients (linear, quadratic,
/// cubic).
pub const AAPN_POLY_C1: f64 = 0.1717;
pub const AAPN_POLY_C2: f64 = -0.3885;
pub const AAPN_POLY_C3: f64 = 0.1925;

/// GENEX terminal-guidance gain.
pub const GENEX_GAIN: f64 = 3.0;

/// Below this norm, relative geometry is considered degenerate and guidance
/// laws command zero acceleration instead of dividing by it.
pub const GUIDANCE_EPS: f64 = 1e-9;

/// Yaw rates below this are integrated as straight-line motion.
pub const YAW_RATE_EPS: f64 = 1e-12;

/// Heading error below which pursuit switches from direct path to PN.
pub const PURSUIT_HEADING_THRESHOLD: f64 = std::f64::consts::FRAC_PI_2;

// --- Tactical waypoints and thresholds ---

/// Flanking waypoints used when swerving around a defender mid-field.
pub const ENEMY_TOP_FLANK: Vec2 = Vec2::new(100.0, 70.0);
pub const ENEMY_BOTTOM_FLANK: Vec2 = Vec2::new(100.0, 10.0);

/// Deep flanking waypoints near the enemy flag zone.
pub const ATTACK_TOP_FLANK: Vec2 = Vec2::new(130.0, 65.0);
pub const ATTACK_BOTTOM_FLANK: Vec2 = Vec2::new(130.0, 15.0);

/// Wide decoy flanks for the equidistant-confusion attack.
pub const DECOY_TOP_FLANK: Vec2 = Vec2::new(130.0, 70.0);
pub const DECOY_BOTTOM_FLANK: Vec2 = Vec2::new(130.0, 10.0);

/// Evade waypoints on the midline used to break off from a defender.
pub const EVADE_TOP: Vec2 = Vec2::new(80.0, 75.0);
pub const EVADE_BOTTOM: Vec2 = Vec2::new(80.0, 5.0);

/// Holding waypoints used to slow an attacker that is ahead of its partner.
pub const HOLD_TOP: Vec2 = Vec2::new(70.0, 70.0);
pub const HOLD_BOTTOM: Vec2 = Vec2::new(70.0, 10.0);

/// Retreat waypoints used to clear the enemy flag zone after a capture.
pub const RETREAT_TOP: Vec2 = Vec2::new(140.0, 70.0);
pub const RETREAT_BOTTOM: Vec2 = Vec2::new(140.0, 10.0);

/// Defender-avoidance radius for the basic smart attack.
pub const SMART_AVOIDANCE_RADIUS: f64 = 40.0;

/// Defender-avoidance radius for the equidistant-confusion attack.
pub const SMARTEST_AVOIDANCE_RADIUS: f64 = 41.0;

/// Hysteresis buffer (game units) suppressing lane zig-zag when comparing
/// attacker distances to the enemy flag.
pub const LEAD_DISTANCE_BUFFER: f64 = 5.0;

/// An attacker past this x coordinate has reached its flank and commits to
/// the flag.
pub const FLANK_REACHED_X: f64 = 130.0;

/// Radius around the enemy flag considered safe to dash in when the
/// defender is farther than this from its own flag.
pub const SAFE_CAPTURE_RADIUS: f64 = 15.0;

/// Radius around the enemy flag inside which a returning carrier still
/// swerves before heading home.
pub const RETREAT_CLEAR_RADIUS: f64 = 10.0;

/// Distance from the top/bottom edge targeted by the smarter escape path.
pub const RETURN_EDGE_MARGIN: f64 = 1.0;

/// Seconds of defender velocity projected backwards to compute the
/// tailing point behind a defender.
pub const DEFENDER_TAIL_SECONDS: f64 = 8.0;

/// A defender's x-velocity below this threshold counts as closing on the
/// attacker (triggers the swerve branch of the smart attack).
pub const DEFENDER_CLOSING_VX: f64 = -0.6;

// --- Team defaults ---

/// Default agent count per team.
pub const DEFAULT_AGENTS_PER_TEAM: usize = 2;

/// Default flag count per team.
pub const DEFAULT_FLAGS_PER_TEAM: usize = 1;

/// Default constant agent speed (units per second).
pub const DEFAULT_SPEED: f64 = 1.0;

/// Default lateral acceleration limit (units per second²).
pub const DEFAULT_ACCELERATION_LIMIT: f64 = 0.1;

/// Default decision period (seconds between high-level re-decisions).
pub const DEFAULT_DECISION_PERIOD_SECS: f64 = 1.0;

/// Default difficulty level for the red team.
pub const DEFAULT_DIFFICULTY: u8 = 5;
