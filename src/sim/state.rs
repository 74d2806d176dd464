//! Attachment episode state
//!
//! Everything that lives for exactly one swing, from attach to detach, is
//! owned by a single `AttachmentEpisode` value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AnchorId, MovementState};
use super::input::InputAxisTracker;
use super::probe::ProbeStreak;
use super::tether::{TetherMode, TetherState};

/// Last tick's input direction and body position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectionMemory {
    /// Quantized input direction (-1, 0, 1) seen last tick
    pub previous_axis: f32,
    /// Body position at the start of last tick
    pub previous_position: Vec2,
}

impl DirectionMemory {
    pub fn at(position: Vec2) -> Self {
        Self {
            previous_axis: 0.0,
            previous_position: position,
        }
    }
}

/// External toggles as they were right before attaching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorState {
    pub movement_state: MovementState,
    pub gravity_active: bool,
    pub horizontal_permitted: bool,
}

/// One continuous swing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentEpisode {
    pub tether: TetherState,
    /// Restored verbatim on detach
    pub prior: PriorState,
    pub tracker: InputAxisTracker,
    pub memory: DirectionMemory,
    pub streak: ProbeStreak,
    /// Damped solver force of the last tick (StuckGuard input)
    pub recorded_force: Vec2,
    /// Ticks swung so far
    pub ticks: u64,
}

impl AttachmentEpisode {
    pub fn new(tether: TetherState, prior: PriorState, position: Vec2) -> Self {
        Self {
            tether,
            prior,
            tracker: InputAxisTracker::new(),
            memory: DirectionMemory::at(position),
            streak: ProbeStreak::default(),
            recorded_force: Vec2::ZERO,
            ticks: 0,
        }
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetachReason {
    /// Player pressed release
    Released,
    /// Anchor was destroyed or deactivated mid-swing
    AnchorLost,
    /// External reset (death, respawn)
    Reset,
}

/// Events emitted by a tick, for game code and tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SwingEvent {
    Attached {
        anchor: AnchorId,
        mode: TetherMode,
        length: f32,
    },
    Detached {
        reason: DetachReason,
    },
    /// The probe fully suppressed the swing force this tick
    NearContact,
    /// StuckGuard pushed the body off a wall
    Nudged {
        force: Vec2,
    },
}
