//! Deterministic swing simulation
//!
//! All swing logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No wall-clock reads, no hidden randomness
//! - Collaborators are borrowed per tick, never owned
//! - No rendering or platform dependencies

pub mod body;
pub mod guard;
pub mod input;
pub mod probe;
pub mod sandbox;
pub mod sdf;
pub mod solver;
pub mod state;
pub mod tether;
pub mod tick;

pub use body::{
    AbilityPermission, AnchorId, AnchorRegistry, Collaborators, Contacts, Invulnerability,
    MovementState, ObstacleQuery, Side, SwingBody,
};
pub use guard::{DriftCorrector, StuckGuard};
pub use input::{InputAxisTracker, axis_sign};
pub use probe::{ObstacleProbe, ProbeEffect, ProbeReading, ProbeStreak};
pub use sandbox::{Sandbox, SandboxAnchors, SandboxBody, SandboxHealth, SandboxMovement};
pub use sdf::{Obstacle, SdfObstacles, raymarch, sd_box, sd_circle};
pub use solver::{Redirect, SwingSolution, SwingSolver, SwingStep};
pub use state::{AttachmentEpisode, DetachReason, DirectionMemory, PriorState, SwingEvent};
pub use tether::{
    ParentTether, ProjectileTether, TetherKind, TetherMode, TetherState, TetherTarget,
    select_tether,
};
pub use tick::{Step, SwingAbility, TickInput};
