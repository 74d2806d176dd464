//! Player input to tangential swing speed
//!
//! Two behaviors share one ramp:
//! - Manual: holding a direction ramps speed linearly toward `±swing_speed`;
//!   any change of direction restarts the ramp from 0.
//! - Idle pendulum: with no input, time spent on each side of the anchor
//!   pushes the body back toward the bottom, so it oscillates and settles.

use serde::{Deserialize, Serialize};

use super::state::DirectionMemory;
use crate::settings::SwingSettings;

/// Quantize a raw axis value to -1, 0 or 1
#[inline]
pub fn axis_sign(raw_axis: f32) -> f32 {
    if raw_axis > 0.0 {
        1.0
    } else if raw_axis < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Ramped, hysteresis-aware tangential speed source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputAxisTracker {
    /// Seconds the current direction has been held (manual) or net side time (idle)
    run_time: f32,
    /// Idle: seconds spent right of the anchor, pushing left
    left_time: f32,
    /// Idle: seconds spent left of the anchor, pushing right
    right_time: f32,
    /// Whether last tick ran the idle behavior
    idle: bool,
    /// Tracker-local monotonic clock (seconds)
    clock: f32,
    /// Clock value of the last manual -> idle counter reset
    last_idle_reset: Option<f32>,
    /// Output of the last update
    speed: f32,
}

impl Default for InputAxisTracker {
    fn default() -> Self {
        Self {
            run_time: 0.0,
            left_time: 0.0,
            right_time: 0.0,
            idle: true,
            clock: 0.0,
            last_idle_reset: None,
            speed: 0.0,
        }
    }
}

impl InputAxisTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tangential speed produced by the last update
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Advance one tick.
    ///
    /// `offset_x` is the body's horizontal offset from the anchor
    /// (positive = right of it). `idle_enabled` selects the pendulum behavior
    /// when `raw_axis` is zero; otherwise zero input simply holds speed at 0.
    pub fn update(
        &mut self,
        memory: &mut DirectionMemory,
        raw_axis: f32,
        offset_x: f32,
        idle_enabled: bool,
        dt: f32,
        settings: &SwingSettings,
    ) -> f32 {
        self.clock += dt;

        let direction = axis_sign(raw_axis);
        let time_axis = if idle_enabled && direction == 0.0 {
            self.idle_axis(memory, offset_x, dt, settings.idle_debounce)
        } else {
            self.manual_axis(memory, direction, dt)
        };

        self.speed = (settings.acceleration() * time_axis)
            .clamp(-settings.swing_speed, settings.swing_speed);
        self.speed
    }

    fn manual_axis(&mut self, memory: &mut DirectionMemory, direction: f32, dt: f32) -> f32 {
        self.idle = false;

        if direction != 0.0 && direction == memory.previous_axis {
            self.run_time += dt;
        } else {
            self.run_time = 0.0;
        }
        memory.previous_axis = direction;

        direction * self.run_time
    }

    fn idle_axis(
        &mut self,
        memory: &mut DirectionMemory,
        offset_x: f32,
        dt: f32,
        debounce: f32,
    ) -> f32 {
        if !self.idle {
            self.idle = true;
            if self.debounce_elapsed(debounce) {
                self.left_time = 0.0;
                self.right_time = 0.0;
                self.last_idle_reset = Some(self.clock);
            }
        }

        // Right of the anchor pushes left, left of it pushes right, directly
        // below keeps pushing the same way as before.
        let direction = if offset_x > 0.0 {
            -1.0
        } else if offset_x < 0.0 {
            1.0
        } else {
            memory.previous_axis
        };

        if self.debounce_elapsed(debounce) && direction == memory.previous_axis {
            if direction < 0.0 {
                self.left_time += dt;
            } else if direction > 0.0 {
                self.right_time += dt;
            }
        }
        memory.previous_axis = direction;

        // Equilibrium: both sides got equal time, start the next half swing from rest
        if (self.right_time - self.left_time).abs() <= f32::EPSILON {
            if self.right_time > 0.0 {
                log::debug!("Idle swing equilibrium at {:.3}s, ramp reset", self.right_time);
            }
            self.left_time = 0.0;
            self.right_time = 0.0;
        }

        // Carried into manual mode so pushing the same way does not re-accelerate from 0
        self.run_time = (self.left_time - self.right_time).abs();
        self.right_time - self.left_time
    }

    fn debounce_elapsed(&self, debounce: f32) -> bool {
        self.last_idle_reset
            .is_none_or(|at| self.clock - at >= debounce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn settings() -> SwingSettings {
        SwingSettings::default()
    }

    fn hold(
        tracker: &mut InputAxisTracker,
        memory: &mut DirectionMemory,
        axis: f32,
        ticks: usize,
    ) -> Vec<f32> {
        let settings = settings();
        (0..ticks)
            .map(|_| tracker.update(memory, axis, 0.0, false, SIM_DT, &settings))
            .collect()
    }

    #[test]
    fn test_manual_ramp_reaches_max_after_acceleration_time() {
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();

        // First tick of a press reads 0, then 1.5s of ramping
        let speeds = hold(&mut tracker, &mut memory, 1.0, 181);
        assert_eq!(speeds[0], 0.0);
        assert!((speeds[90] - 15.0).abs() < 0.01);
        assert!((speeds[180] - 30.0).abs() < 1e-3);
        for pair in speeds.windows(2) {
            assert!(pair[1] >= pair[0]);
            let slope = (pair[1] - pair[0]) / SIM_DT;
            assert!(slope <= 20.0 + 1e-2);
        }

        // Holding longer stays clamped
        let more = hold(&mut tracker, &mut memory, 1.0, 60);
        assert!(more.iter().all(|s| *s == 30.0));
    }

    #[test]
    fn test_reversal_resets_ramp() {
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();

        hold(&mut tracker, &mut memory, 1.0, 60);
        assert!(tracker.speed() > 9.0);

        let reversed = hold(&mut tracker, &mut memory, -1.0, 30);
        assert_eq!(reversed[0], 0.0);
        assert!(reversed[1] < 0.0);
        assert!(reversed.windows(2).all(|p| p[1] <= p[0]));
    }

    #[test]
    fn test_analog_axis_is_quantized() {
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();

        let settings = settings();
        tracker.update(&mut memory, 0.3, 0.0, false, SIM_DT, &settings);
        let speed = tracker.update(&mut memory, 0.9, 0.0, false, SIM_DT, &settings);
        assert!((speed - settings.acceleration() * SIM_DT).abs() < 1e-5);
    }

    #[test]
    fn test_zero_input_without_idle_holds_zero() {
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();
        hold(&mut tracker, &mut memory, 1.0, 30);
        let speeds = hold(&mut tracker, &mut memory, 0.0, 10);
        assert!(speeds.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_idle_pushes_toward_bottom() {
        let settings = settings();
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();

        // Right of the anchor: pushes left (negative speed)
        let mut speed = 0.0;
        for _ in 0..30 {
            speed = tracker.update(&mut memory, 0.0, 2.0, true, SIM_DT, &settings);
        }
        assert!(speed < 0.0);

        // Crossing to the left side decelerates back toward 0
        let mut crossing = Vec::new();
        for _ in 0..29 {
            crossing.push(tracker.update(&mut memory, 0.0, -2.0, true, SIM_DT, &settings));
        }
        assert!(crossing.windows(2).all(|p| p[1] >= p[0]));
        assert!(crossing.last().unwrap().abs() < speed.abs());
    }

    #[test]
    fn test_idle_equilibrium_resets_counters() {
        let settings = settings();
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();

        // One tick establishes the direction, ten accumulate
        for _ in 0..11 {
            tracker.update(&mut memory, 0.0, 1.0, true, SIM_DT, &settings);
        }
        assert!(tracker.run_time > 0.0);

        // Same number of accumulating ticks on the other side balances out
        let mut last = f32::NAN;
        for _ in 0..11 {
            last = tracker.update(&mut memory, 0.0, -1.0, true, SIM_DT, &settings);
        }
        assert_eq!(last, 0.0);
        assert_eq!(tracker.run_time, 0.0);
    }

    #[test]
    fn test_idle_debounce_after_manual() {
        let settings = settings();
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();

        hold(&mut tracker, &mut memory, 1.0, 60);

        // Released: counters reset and stay frozen for the debounce window
        let debounce_ticks = (settings.idle_debounce / SIM_DT).floor() as usize;
        for _ in 0..debounce_ticks {
            let speed = tracker.update(&mut memory, 0.0, 3.0, true, SIM_DT, &settings);
            assert_eq!(speed, 0.0);
        }
        assert!(tracker.idle);

        // Past the window the pendulum push resumes
        let mut speed = 0.0;
        for _ in 0..5 {
            speed = tracker.update(&mut memory, 0.0, 3.0, true, SIM_DT, &settings);
        }
        assert!(speed < 0.0);
    }

    #[test]
    fn test_idle_time_carries_into_manual() {
        let settings = settings();
        let mut tracker = InputAxisTracker::new();
        let mut memory = DirectionMemory::default();

        for _ in 0..40 {
            tracker.update(&mut memory, 0.0, 1.0, true, SIM_DT, &settings);
        }
        let idle_speed = tracker.speed();
        assert!(idle_speed < 0.0);

        // Pushing the same way continues from the idle ramp
        let manual = tracker.update(&mut memory, -1.0, 1.0, true, SIM_DT, &settings);
        assert!(manual < idle_speed);
    }

    proptest! {
        #[test]
        fn prop_constant_input_is_monotonic_and_bounded(
            axis in prop_oneof![Just(-1.0f32), Just(1.0f32)],
            dt in 0.002f32..0.05,
            ticks in 1usize..400,
        ) {
            let settings = settings();
            let mut tracker = InputAxisTracker::new();
            let mut memory = DirectionMemory::default();
            let mut previous = 0.0f32;
            for _ in 0..ticks {
                let speed = tracker.update(&mut memory, axis, 0.0, true, dt, &settings);
                prop_assert!(speed.abs() >= previous);
                prop_assert!(speed.abs() <= settings.swing_speed);
                prop_assert!(speed == 0.0 || speed.signum() == axis);
                previous = speed.abs();
            }
        }
    }
}
