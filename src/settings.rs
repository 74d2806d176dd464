//! Swing tuning and behavior toggles
//!
//! Every field has a default, so partial JSON documents are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SwingError;

/// Tunables for one swinging entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingSettings {
    // === Anchor discovery ===
    /// Category of projectile-style anchors (grappling hooks)
    pub hook_category: String,
    /// Category of fixed-tether parent objects (ropes)
    pub rope_category: String,

    // === Physics ===
    /// Gravity magnitude while swinging (pulls toward -y)
    pub gravity: f32,
    /// Gravity amplification when idle and idle deceleration is off
    pub gravity_multiplier: f32,
    /// Pendulum episodes swing and decay on their own when input is idle
    pub idle_pendulum: bool,
    /// Maximum tangential speed
    pub swing_speed: f32,
    /// Seconds to reach `swing_speed` from rest
    pub acceleration_time: f32,
    /// Manual -> idle input debounce window (seconds)
    pub idle_debounce: f32,

    // === Collision protection ===
    /// Slow the swing down near obstacles
    pub collision_safety: bool,
    /// Probe length along the direction of travel
    pub collision_sensitivity: f32,
    /// Distance at which the swing force is fully suppressed
    pub near_contact_distance: f32,
    /// Raise temporary invulnerability on near contact
    pub temporary_invulnerability: bool,
    /// Nudge the body off a wall when it stops moving
    pub stuck_prevention: bool,
    /// Nudge magnitude
    pub stuck_nudge: f32,
    /// Pull the body back onto the tether circle after external forces
    pub swing_correction: bool,
    /// Drift correction gain
    pub correction_gain: f32,
}

impl Default for SwingSettings {
    fn default() -> Self {
        Self {
            hook_category: "Hook".to_string(),
            rope_category: "Rope".to_string(),

            gravity: SWING_GRAVITY,
            gravity_multiplier: IDLE_GRAVITY_MULTIPLIER,
            idle_pendulum: true,
            swing_speed: SWING_SPEED,
            acceleration_time: ACCELERATION_TIME,
            idle_debounce: IDLE_DEBOUNCE,

            collision_safety: true,
            collision_sensitivity: COLLISION_SENSITIVITY,
            near_contact_distance: NEAR_CONTACT_DISTANCE,
            temporary_invulnerability: false,
            stuck_prevention: true,
            stuck_nudge: STUCK_NUDGE,
            swing_correction: false,
            correction_gain: 1.0,
        }
    }
}

impl SwingSettings {
    /// Tangential acceleration while input is held (units/s²)
    pub fn acceleration(&self) -> f32 {
        self.swing_speed / self.acceleration_time
    }

    /// Gravity used when the swing is idle and not decelerating like a pendulum
    pub fn amplified_gravity(&self) -> f32 {
        self.gravity * self.gravity_multiplier
    }

    /// Check categories and numeric ranges.
    ///
    /// Probe distances are left to `ObstacleProbe`, which turns damping off
    /// instead of failing.
    pub fn validate(&self) -> Result<(), SwingError> {
        if self.hook_category.trim().is_empty() {
            return Err(SwingError::MissingCategory { which: "hook" });
        }
        if self.rope_category.trim().is_empty() {
            return Err(SwingError::MissingCategory { which: "rope" });
        }

        let positive = [
            ("swing_speed", self.swing_speed),
            ("acceleration_time", self.acceleration_time),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SwingError::InvalidSetting { name, value });
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("gravity_multiplier", self.gravity_multiplier),
            ("idle_debounce", self.idle_debounce),
            ("stuck_nudge", self.stuck_nudge),
            ("correction_gain", self.correction_gain),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SwingError::InvalidSetting { name, value });
            }
        }

        Ok(())
    }

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SwingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, SwingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(SwingError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded swing settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{}; using default swing settings", err);
                Self::default()
            }
        }
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SwingError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Swing settings saved to {}", path.as_ref().display());
        Ok(())
    }
}
