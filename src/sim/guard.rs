//! Additive safety corrections applied on top of the solver force

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Contacts;
use crate::consts::STUCK_EPSILON;
use crate::settings::SwingSettings;

/// Pushes the body off a wall when it stopped moving despite a swing force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StuckGuard {
    pub enabled: bool,
    /// Magnitude of the nudge
    pub nudge: f32,
}

impl StuckGuard {
    pub fn from_settings(settings: &SwingSettings) -> Self {
        Self {
            enabled: settings.stuck_prevention,
            nudge: settings.stuck_nudge,
        }
    }

    /// Axis-aligned nudge away from the single touching side.
    ///
    /// Fires only when last tick asked for motion (`intended` non-zero), the
    /// body did not move, and exactly one side reports contact.
    pub fn nudge(&self, intended: Vec2, displacement: Vec2, contacts: Contacts) -> Option<Vec2> {
        if !self.enabled || intended == Vec2::ZERO {
            return None;
        }
        if displacement.length() > STUCK_EPSILON {
            return None;
        }
        let side = contacts.single_side()?;
        Some(side.away() * self.nudge)
    }
}

/// Pulls the body back to the tether length after outside forces moved it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftCorrector {
    pub enabled: bool,
    pub gain: f32,
}

impl DriftCorrector {
    pub fn from_settings(settings: &SwingSettings) -> Self {
        Self {
            enabled: settings.swing_correction,
            gain: settings.correction_gain,
        }
    }

    /// Radial correction: toward the anchor when too far, away when too close,
    /// proportional to the deviation.
    pub fn correction(&self, position: Vec2, anchor: Vec2, length: f32) -> Vec2 {
        if !self.enabled {
            return Vec2::ZERO;
        }
        let offset = anchor - position;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return Vec2::ZERO;
        }
        let deviation = distance - length;
        offset / distance * deviation * self.gain
    }
}
