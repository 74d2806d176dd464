//! Tether variants and physics mode selection
//!
//! A body can hang from a projectile that latched onto a surface (hook) or
//! from a fixed rope object it is linked to. Both variants answer the same
//! three questions, so the state machine picks one once and never branches
//! on the variant again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AnchorId, AnchorRegistry};
use crate::consts::BOUNDED_HEIGHT_FACTOR;
use crate::settings::SwingSettings;

/// Physics mode of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TetherMode {
    /// Gravity-driven swing that decays like a pendulum when input is idle
    Pendulum,
    /// Short tether: tangential motion only, no idle deceleration
    Bounded,
}

impl TetherMode {
    /// Bounded below `BOUNDED_HEIGHT_FACTOR` body heights, Pendulum otherwise
    pub fn for_length(length: f32, body_height: f32) -> Self {
        if length < body_height * BOUNDED_HEIGHT_FACTOR {
            TetherMode::Bounded
        } else {
            TetherMode::Pendulum
        }
    }

    /// Whether idle input runs the pendulum ramp in this mode
    pub fn idle_deceleration(self, settings: &SwingSettings) -> bool {
        self == TetherMode::Pendulum && settings.idle_pendulum
    }
}

/// Which variant produced the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TetherKind {
    Projectile,
    Parent,
}

/// Anchor, fixed length and mode of one episode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TetherState {
    anchor: AnchorId,
    kind: TetherKind,
    length: f32,
    mode: TetherMode,
}

impl TetherState {
    /// `None` for a degenerate (zero, negative or non-finite) length
    pub fn new(anchor: AnchorId, kind: TetherKind, length: f32, body_height: f32) -> Option<Self> {
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }
        Some(Self {
            anchor,
            kind,
            length,
            mode: TetherMode::for_length(length, body_height),
        })
    }

    pub fn anchor(&self) -> AnchorId {
        self.anchor
    }

    pub fn kind(&self) -> TetherKind {
        self.kind
    }

    /// Radius of the swing circle, fixed at attach
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn mode(&self) -> TetherMode {
        self.mode
    }
}

/// One way of finding something to swing from
pub trait TetherTarget {
    fn kind(&self) -> TetherKind;

    /// Find the candidate anchor
    fn resolve(&self, anchors: &dyn AnchorRegistry, settings: &SwingSettings) -> Option<AnchorId>;

    /// Tether length for an attach at these positions
    fn initial_length(&self, anchor: Vec2, body: Vec2) -> f32 {
        anchor.distance(body)
    }

    /// Whether the candidate is ready to carry the body
    fn confirm_attach(&self, anchors: &dyn AnchorRegistry, anchor: AnchorId) -> bool;
}

/// Grappling hook projectile, ready once it latched
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectileTether;

impl TetherTarget for ProjectileTether {
    fn kind(&self) -> TetherKind {
        TetherKind::Projectile
    }

    fn resolve(&self, anchors: &dyn AnchorRegistry, settings: &SwingSettings) -> Option<AnchorId> {
        anchors.find_by_category(&settings.hook_category)
    }

    fn confirm_attach(&self, anchors: &dyn AnchorRegistry, anchor: AnchorId) -> bool {
        anchors.contact_achieved(anchor)
    }
}

/// Rope object the body is linked to, ready as soon as it exists
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentTether;

impl TetherTarget for ParentTether {
    fn kind(&self) -> TetherKind {
        TetherKind::Parent
    }

    fn resolve(&self, anchors: &dyn AnchorRegistry, settings: &SwingSettings) -> Option<AnchorId> {
        anchors
            .linked_parent()
            .filter(|id| anchors.category(*id) == Some(settings.rope_category.as_str()))
            .filter(|id| anchors.position(*id).is_some())
    }

    fn confirm_attach(&self, anchors: &dyn AnchorRegistry, anchor: AnchorId) -> bool {
        anchors.position(anchor).is_some()
    }
}

static PROJECTILE: ProjectileTether = ProjectileTether;
static PARENT: ParentTether = ParentTether;

/// Rope variant when linked to a rope object, hook variant otherwise
pub fn select_tether(anchors: &dyn AnchorRegistry, settings: &SwingSettings) -> &'static dyn TetherTarget {
    let linked_to_rope = anchors
        .linked_parent()
        .and_then(|id| anchors.category(id))
        .is_some_and(|category| category == settings.rope_category);

    if linked_to_rope { &PARENT } else { &PROJECTILE }
}
