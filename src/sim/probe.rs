//! Obstacle-aware damping of the swing force
//!
//! Split in two: `ObstacleProbe::sample` is a pure distance -> multiplier
//! query; `ProbeStreak::apply` applies its consequences (streak counting,
//! temporary invulnerability) explicitly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Invulnerability, ObstacleQuery};
use crate::settings::SwingSettings;

/// Result of one probe along the direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeReading {
    /// Damping multiplier in [0, 1]
    pub multiplier: f32,
    /// Obstacle distance, when one was found within the probe length
    pub distance: Option<f32>,
    /// Obstacle at or inside the near-contact distance
    pub near_contact: bool,
}

impl ProbeReading {
    /// Nothing ahead
    pub const CLEAR: ProbeReading = ProbeReading {
        multiplier: 1.0,
        distance: None,
        near_contact: false,
    };
}

/// Probe configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleProbe {
    pub enabled: bool,
    /// Probe length; also the distance where damping starts
    pub sensitivity: f32,
    /// Distance at which force is fully suppressed
    pub near_contact: f32,
}

impl ObstacleProbe {
    /// Negative or non-finite distances switch obstacle damping off (logged
    /// once); they never disable the swing itself.
    pub fn from_settings(settings: &SwingSettings) -> Self {
        let usable = |distance: f32| distance.is_finite() && distance >= 0.0;
        let sensitivity = settings.collision_sensitivity;
        let near_contact = settings.near_contact_distance;
        let valid = usable(sensitivity) && usable(near_contact);

        if settings.collision_safety && !valid {
            log::warn!(
                "Obstacle damping off: sensitivity {} / near contact {} out of range",
                sensitivity,
                near_contact
            );
        }

        Self {
            enabled: settings.collision_safety && valid,
            sensitivity: if usable(sensitivity) { sensitivity } else { 0.0 },
            near_contact: if usable(near_contact) { near_contact } else { 0.0 },
        }
    }

    /// Damping for an obstacle at `distance` (`None` = nothing found)
    pub fn multiplier(&self, distance: Option<f32>) -> f32 {
        match distance {
            None => 1.0,
            Some(_) if !self.enabled => 1.0,
            Some(d) if d <= self.near_contact => 0.0,
            Some(d) if d >= self.sensitivity => 1.0,
            Some(d) => (d / self.sensitivity).clamp(0.0, 1.0),
        }
    }

    /// Probe from `origin` along `direction`.
    ///
    /// A missing query collaborator, a disabled probe or a zero direction all
    /// read as a clear path.
    pub fn sample(
        &self,
        query: Option<&dyn ObstacleQuery>,
        origin: Vec2,
        direction: Vec2,
    ) -> ProbeReading {
        let Some(query) = query.filter(|_| self.enabled) else {
            return ProbeReading::CLEAR;
        };
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || self.sensitivity <= 0.0 {
            return ProbeReading::CLEAR;
        }

        match query.nearest(origin, direction, self.sensitivity) {
            Some(d) if d.is_finite() && d <= self.sensitivity => ProbeReading {
                multiplier: self.multiplier(Some(d)),
                distance: Some(d.max(0.0)),
                near_contact: d <= self.near_contact,
            },
            _ => ProbeReading::CLEAR,
        }
    }
}

/// Side effects a probe reading caused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeEffect {
    /// First in-range hit after a clear path
    pub streak_started: bool,
    pub invulnerability_raised: bool,
    pub invulnerability_cleared: bool,
}

/// Per-episode obstacle streak and invulnerability ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProbeStreak {
    /// Consecutive in-range probe hits
    pub count: u32,
    /// Invulnerability is currently set because of us
    pub raised_invulnerability: bool,
}

impl ProbeStreak {
    /// Apply the consequences of one reading.
    ///
    /// Invulnerability is only raised when nobody else already holds it, and
    /// only cleared if this streak raised it.
    pub fn apply(
        &mut self,
        reading: &ProbeReading,
        health: Option<&mut (dyn Invulnerability + '_)>,
        raise_invulnerability: bool,
    ) -> ProbeEffect {
        let mut effect = ProbeEffect::default();

        if reading.distance.is_none() {
            if self.count > 0 {
                log::debug!("Obstacle streak ended after {} probes", self.count);
            }
            self.count = 0;
            effect.invulnerability_cleared = self.release(health);
            return effect;
        }

        if self.count == 0 {
            effect.streak_started = true;
            log::debug!("Obstacle ahead at {:?}, damping swing", reading.distance);
        }
        self.count = self.count.saturating_add(1);

        if reading.near_contact && raise_invulnerability && !self.raised_invulnerability {
            if let Some(health) = health {
                if !health.is_invulnerable() {
                    health.set_invulnerable(true);
                    self.raised_invulnerability = true;
                    effect.invulnerability_raised = true;
                    log::debug!("Near contact, temporary invulnerability raised");
                }
            }
        }

        effect
    }

    /// Drop invulnerability if this streak raised it; true when it was cleared
    pub fn release(&mut self, health: Option<&mut (dyn Invulnerability + '_)>) -> bool {
        if !self.raised_invulnerability {
            return false;
        }
        self.raised_invulnerability = false;
        if let Some(health) = health {
            health.set_invulnerable(false);
            log::debug!("Temporary invulnerability cleared");
        }
        true
    }
}
