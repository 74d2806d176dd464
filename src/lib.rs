//! Swing Tether - grappling hook / rope swing simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (circular-constraint solver, attach/detach
//!   state machine, obstacle safety layer)
//! - `settings`: Data-driven tuning, loadable from JSON
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SwingError;
pub use settings::SwingSettings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Tethers shorter than this many body heights run in Bounded mode
    pub const BOUNDED_HEIGHT_FACTOR: f32 = 3.0;

    /// Gravity magnitude while swinging (units/s², pulls toward -y)
    pub const SWING_GRAVITY: f32 = 30.0;
    /// Gravity amplification when input is idle and idle deceleration is off
    pub const IDLE_GRAVITY_MULTIPLIER: f32 = 8.0;
    /// Maximum tangential swing speed
    pub const SWING_SPEED: f32 = 30.0;
    /// Seconds to ramp from rest to `SWING_SPEED`
    pub const ACCELERATION_TIME: f32 = 1.5;

    /// Obstacle probe length
    pub const COLLISION_SENSITIVITY: f32 = 1.0;
    /// Obstacle distance at which swing force is fully suppressed
    pub const NEAR_CONTACT_DISTANCE: f32 = 0.1;
    /// Magnitude of the anti-stuck nudge
    pub const STUCK_NUDGE: f32 = 1.0;
    /// Displacement at or below this counts as "did not move"
    pub const STUCK_EPSILON: f32 = 1e-6;

    /// Manual -> idle input mode debounce window (seconds)
    pub const IDLE_DEBOUNCE: f32 = 0.08;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Signed angle (radians) rotating `from` onto `to`, counter-clockwise positive.
///
/// Zero-length inputs yield 0.
#[inline]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}
