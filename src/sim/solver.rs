//! Circular-constraint swing solver
//!
//! Turns tangential input speed plus gravity into a velocity that moves the
//! body along the tether circle. Rather than trusting the redirected
//! velocity directly (which slowly stretches the rope as error piles up),
//! the solver measures how far around the circle that velocity would carry
//! the body and places it exactly on the circle at the new angle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::SwingSettings;
use crate::{cartesian_to_polar, normalize_angle, polar_to_cartesian, signed_angle};

/// Inputs of one solver step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingStep {
    /// Tangential input speed (signed, +x is right)
    pub speed: f32,
    pub position: Vec2,
    pub anchor: Vec2,
    /// Tether length (circle radius)
    pub length: f32,
    /// Elapsed tick duration
    pub dt: f32,
    /// Elapsed physics-step duration (scales gravity)
    pub physics_dt: f32,
    /// Idle input decelerates like a pendulum
    pub idle_deceleration: bool,
}

/// Undamped result of the circular redirection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Redirect {
    /// Velocity from input and gravity alone
    pub predicted: Vec2,
    /// Predicted velocity with the outward radial part cancelled
    pub adjusted: Vec2,
    /// Signed arc angle travelled this tick (radians, counter-clockwise positive)
    pub arc: f32,
    /// Next position, exactly on the circle
    pub target: Vec2,
    /// Velocity that reaches `target` in one tick
    pub velocity: Vec2,
}

/// Damped solver output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingSolution {
    pub redirect: Redirect,
    /// Force kept for StuckGuard (first damping evaluation)
    pub recorded: Vec2,
    /// Damping applied to `force` (second evaluation)
    pub multiplier: f32,
    /// Force to apply this tick
    pub force: Vec2,
}

/// Gravity constants for the redirection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingSolver {
    pub gravity: f32,
    pub amplified_gravity: f32,
}

impl SwingSolver {
    pub fn from_settings(settings: &SwingSettings) -> Self {
        Self {
            gravity: settings.gravity,
            amplified_gravity: settings.amplified_gravity(),
        }
    }

    /// At rest without pendulum deceleration the centripetal pull is tiny,
    /// so gravity is amplified.
    pub fn effective_gravity(&self, speed: f32, idle_deceleration: bool) -> f32 {
        if speed == 0.0 && !idle_deceleration {
            self.amplified_gravity
        } else {
            self.gravity
        }
    }

    /// Redirect input + gravity onto the tether circle (no damping)
    pub fn redirect(&self, step: &SwingStep) -> Redirect {
        if !(step.dt.is_finite() && step.dt > 0.0) {
            return Redirect {
                predicted: Vec2::ZERO,
                adjusted: Vec2::ZERO,
                arc: 0.0,
                target: step.position,
                velocity: Vec2::ZERO,
            };
        }

        let from_anchor = step.position - step.anchor;
        let to_anchor = (-from_anchor).normalize_or_zero();

        let gravity = self.effective_gravity(step.speed, step.idle_deceleration);
        let predicted = Vec2::new(step.speed, -gravity * step.physics_dt);

        let (_, body_angle) = cartesian_to_polar(from_anchor);
        let rope_angle = signed_angle(to_anchor, predicted.normalize_or_zero());

        // Rope tension: cancel only the part of the velocity pulling away from the anchor
        let tension = (-rope_angle.cos() * predicted.length()).max(0.0) * to_anchor;
        let adjusted = predicted + tension;

        // Speed as arc length, signed by where the unconstrained step would have landed
        let mut arc = adjusted.length() * step.dt / step.length;
        let naive = step.position + adjusted * step.dt - step.anchor;
        let (_, naive_angle) = cartesian_to_polar(naive);
        if normalize_angle(naive_angle - body_angle) < 0.0 {
            arc = -arc;
        }

        let target = step.anchor + polar_to_cartesian(step.length, body_angle + arc);
        let velocity = (target - step.position) / step.dt;

        Redirect {
            predicted,
            adjusted,
            arc,
            target,
            velocity,
        }
    }

    /// Full solver step.
    ///
    /// `damping` maps a travel direction to a multiplier in [0, 1]. It is
    /// evaluated twice: once for the recorded force, once for the applied one.
    pub fn solve(&self, step: &SwingStep, mut damping: impl FnMut(Vec2) -> f32) -> SwingSolution {
        let redirect = self.redirect(step);
        let velocity = redirect.velocity;

        let recorded = velocity * damping(velocity);
        let multiplier = damping(velocity);

        SwingSolution {
            redirect,
            recorded,
            multiplier,
            force: velocity * multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn solver() -> SwingSolver {
        SwingSolver::from_settings(&SwingSettings::default())
    }

    fn step(speed: f32, position: Vec2, anchor: Vec2, length: f32) -> SwingStep {
        SwingStep {
            speed,
            position,
            anchor,
            length,
            dt: SIM_DT,
            physics_dt: SIM_DT,
            idle_deceleration: true,
        }
    }

    #[test]
    fn test_effective_gravity_selection() {
        let solver = solver();
        assert_eq!(solver.effective_gravity(0.0, false), 240.0);
        assert_eq!(solver.effective_gravity(0.0, true), 30.0);
        assert_eq!(solver.effective_gravity(4.0, false), 30.0);
    }

    #[test]
    fn test_rest_at_bottom_stays_put() {
        let anchor = Vec2::new(0.0, 10.0);
        let redirect = solver().redirect(&step(0.0, Vec2::ZERO, anchor, 10.0));
        assert!(redirect.adjusted.length() < 1e-4);
        assert!(redirect.velocity.length() < 1e-3);
    }

    #[test]
    fn test_push_right_at_bottom_swings_counter_clockwise() {
        let anchor = Vec2::new(0.0, 10.0);
        let redirect = solver().redirect(&step(30.0, Vec2::ZERO, anchor, 10.0));
        assert!(redirect.arc > 0.0);
        assert!(redirect.velocity.x > 0.0);
        assert!(((redirect.target - anchor).length() - 10.0).abs() < 1e-4);
        // Arc length matches the adjusted speed
        let travelled = redirect.arc * 10.0;
        assert!((travelled - redirect.adjusted.length() * SIM_DT).abs() < 1e-4);
    }

    #[test]
    fn test_push_left_at_bottom_swings_clockwise() {
        let anchor = Vec2::new(0.0, 10.0);
        let redirect = solver().redirect(&step(-30.0, Vec2::ZERO, anchor, 10.0));
        assert!(redirect.arc < 0.0);
        assert!(redirect.velocity.x < 0.0);
    }

    #[test]
    fn test_tension_cancels_outward_component() {
        // Body right of the anchor, gravity pulls straight down: tangential, no tension
        let anchor = Vec2::ZERO;
        let redirect = solver().redirect(&step(0.0, Vec2::new(10.0, 0.0), anchor, 10.0));
        assert!((redirect.adjusted - redirect.predicted).length() < 1e-5);

        // Pushing outward (+x) from there is cancelled entirely
        let redirect = solver().redirect(&SwingStep {
            physics_dt: 0.0,
            ..step(20.0, Vec2::new(10.0, 0.0), anchor, 10.0)
        });
        assert!(redirect.adjusted.length() < 1e-4);
    }

    #[test]
    fn test_stretched_body_is_pulled_back_onto_circle() {
        let anchor = Vec2::new(0.0, 10.0);
        let redirect = solver().redirect(&step(0.0, Vec2::new(0.0, -2.0), anchor, 10.0));
        assert!(((redirect.target - anchor).length() - 10.0).abs() < 1e-4);
        assert!(redirect.velocity.y > 0.0);
    }

    #[test]
    fn test_crossing_the_left_seam_keeps_direction() {
        // Left of the anchor at angle just below π, gravity carries it downward past ±π
        let anchor = Vec2::ZERO;
        let position = Vec2::new(-10.0, 0.001);
        let redirect = solver().redirect(&step(0.0, position, anchor, 10.0));
        assert!(redirect.arc > 0.0);
        assert!(redirect.target.y < position.y);
    }

    #[test]
    fn test_zero_dt_is_inert() {
        let redirect = solver().redirect(&SwingStep {
            dt: 0.0,
            ..step(30.0, Vec2::ZERO, Vec2::new(0.0, 10.0), 10.0)
        });
        assert_eq!(redirect.velocity, Vec2::ZERO);
        assert_eq!(redirect.target, Vec2::ZERO);
    }

    #[test]
    fn test_solve_evaluates_damping_twice() {
        let mut calls = Vec::new();
        let solution = solver().solve(&step(30.0, Vec2::ZERO, Vec2::new(0.0, 10.0), 10.0), |dir| {
            calls.push(dir);
            if calls.len() == 1 { 1.0 } else { 0.5 }
        });
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(solution.recorded, solution.redirect.velocity);
        assert_eq!(solution.multiplier, 0.5);
        assert_eq!(solution.force, solution.redirect.velocity * 0.5);
    }

    #[test]
    fn test_full_suppression_gives_zero_force() {
        let solution = solver().solve(&step(30.0, Vec2::ZERO, Vec2::new(0.0, 10.0), 10.0), |_| 0.0);
        assert_eq!(solution.force, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_tether_length_holds_over_episode(
            speeds in prop::collection::vec(-30.0f32..30.0, 1..300),
            length in 3.0f32..40.0,
            start_angle in -3.0f32..3.0,
            anchor_x in -50.0f32..50.0,
            anchor_y in -50.0f32..50.0,
        ) {
            let solver = solver();
            let anchor = Vec2::new(anchor_x, anchor_y);
            let mut position = anchor + polar_to_cartesian(length, start_angle);
            for speed in speeds {
                let solution = solver.solve(&step(speed, position, anchor, length), |_| 1.0);
                position += solution.force * SIM_DT;
                let deviation = ((position - anchor).length() - length).abs();
                prop_assert!(deviation < 1e-3, "deviation {}", deviation);
            }
        }
    }
}
