//! In-memory collaborators and a fixed-step world to swing in
//!
//! Plays the role of the game engine: owns the body, the anchors, the
//! obstacles, health and the competing movement ability, and integrates the
//! force the swing core writes each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{
    AbilityPermission, AnchorId, AnchorRegistry, Collaborators, Contacts, Invulnerability,
    MovementState, SwingBody,
};
use super::sdf::SdfObstacles;
use super::state::SwingEvent;
use super::tick::{Step, SwingAbility, TickInput};
use crate::consts::SWING_GRAVITY;

/// Contact detection skin around the body box
pub const CONTACT_SKIN: f32 = 0.02;

/// Box-shaped character body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxBody {
    pub position: Vec2,
    /// Velocity set by the last `set_force`, plus gravity while it is active
    pub force: Vec2,
    pub half_extents: Vec2,
    pub gravity_active: bool,
    pub contacts: Contacts,
    pub movement_state: MovementState,
}

impl SandboxBody {
    pub fn new(position: Vec2, height: f32) -> Self {
        Self {
            position,
            force: Vec2::ZERO,
            half_extents: Vec2::new(height * 0.25, height * 0.5),
            gravity_active: true,
            contacts: Contacts::default(),
            movement_state: MovementState::Falling,
        }
    }
}

impl SwingBody for SandboxBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_force(&mut self, force: Vec2) {
        self.force = force;
    }

    fn gravity_active(&self) -> bool {
        self.gravity_active
    }

    fn set_gravity_active(&mut self, active: bool) {
        self.gravity_active = active;
    }

    fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    fn contacts(&self) -> Contacts {
        self.contacts
    }

    fn movement_state(&self) -> MovementState {
        self.movement_state
    }

    fn set_movement_state(&mut self, state: MovementState) {
        self.movement_state = state;
    }
}

/// An anchor object: hook projectile, rope, or anything else with a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxAnchor {
    pub id: AnchorId,
    pub category: String,
    pub position: Vec2,
    pub active: bool,
    pub contact_achieved: bool,
}

/// Anchor registry (sorted by id for determinism)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SandboxAnchors {
    pub anchors: Vec<SandboxAnchor>,
    pub parent: Option<AnchorId>,
    next_id: u32,
}

impl SandboxAnchors {
    /// Spawn an active anchor
    pub fn spawn(&mut self, category: &str, position: Vec2) -> AnchorId {
        self.next_id += 1;
        let id = AnchorId(self.next_id);
        self.anchors.push(SandboxAnchor {
            id,
            category: category.to_string(),
            position,
            active: true,
            contact_achieved: false,
        });
        id
    }

    pub fn get(&self, id: AnchorId) -> Option<&SandboxAnchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: AnchorId) -> Option<&mut SandboxAnchor> {
        self.anchors.iter_mut().find(|a| a.id == id)
    }

    /// Mark a projectile as latched (or not)
    pub fn set_contact(&mut self, id: AnchorId, achieved: bool) {
        if let Some(anchor) = self.get_mut(id) {
            anchor.contact_achieved = achieved;
        }
    }

    /// Move an anchor (moving anchors drag the swing circle with them)
    pub fn move_to(&mut self, id: AnchorId, position: Vec2) {
        if let Some(anchor) = self.get_mut(id) {
            anchor.position = position;
        }
    }

    /// Link the body to a parent object
    pub fn link_parent(&mut self, parent: Option<AnchorId>) {
        self.parent = parent;
    }

    /// Destroy an anchor outright
    pub fn despawn(&mut self, id: AnchorId) {
        self.anchors.retain(|a| a.id != id);
    }

    pub fn is_active(&self, id: AnchorId) -> bool {
        self.get(id).is_some_and(|a| a.active)
    }
}

impl AnchorRegistry for SandboxAnchors {
    fn find_by_category(&self, category: &str) -> Option<AnchorId> {
        self.anchors
            .iter()
            .find(|a| a.active && a.category == category)
            .map(|a| a.id)
    }

    fn linked_parent(&self) -> Option<AnchorId> {
        self.parent
    }

    fn category(&self, id: AnchorId) -> Option<&str> {
        self.get(id).map(|a| a.category.as_str())
    }

    fn position(&self, id: AnchorId) -> Option<Vec2> {
        self.get(id).filter(|a| a.active).map(|a| a.position)
    }

    fn contact_achieved(&self, id: AnchorId) -> bool {
        self.get(id).is_some_and(|a| a.active && a.contact_achieved)
    }

    fn deactivate(&mut self, id: AnchorId) {
        if let Some(anchor) = self.get_mut(id) {
            anchor.active = false;
            anchor.contact_achieved = false;
        }
    }
}

/// Health component, only the invulnerability flag matters here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SandboxHealth {
    pub invulnerable: bool,
}

impl Invulnerability for SandboxHealth {
    fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    fn set_invulnerable(&mut self, invulnerable: bool) {
        self.invulnerable = invulnerable;
    }
}

/// Competing horizontal movement ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxMovement {
    pub permitted: bool,
}

impl Default for SandboxMovement {
    fn default() -> Self {
        Self { permitted: true }
    }
}

impl AbilityPermission for SandboxMovement {
    fn is_permitted(&self) -> bool {
        self.permitted
    }

    fn set_permitted(&mut self, permitted: bool) {
        self.permitted = permitted;
    }
}

/// Complete fixed-step world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sandbox {
    pub body: SandboxBody,
    pub anchors: SandboxAnchors,
    pub obstacles: SdfObstacles,
    pub health: SandboxHealth,
    pub movement: SandboxMovement,
    /// World gravity applied to the body while its gravity is active
    pub gravity: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl Sandbox {
    pub fn new(body_position: Vec2, body_height: f32) -> Self {
        let body = SandboxBody::new(body_position, body_height);
        let clearance = body.half_extents.x;
        Self {
            body,
            anchors: SandboxAnchors::default(),
            obstacles: SdfObstacles::new(clearance),
            health: SandboxHealth::default(),
            movement: SandboxMovement::default(),
            gravity: SWING_GRAVITY,
            time_ticks: 0,
        }
    }

    /// Borrow every collaborator for one tick
    pub fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            body: &mut self.body,
            anchors: &mut self.anchors,
            obstacles: Some(&self.obstacles),
            health: Some(&mut self.health),
            horizontal: &mut self.movement,
        }
    }

    /// Run one swing tick and integrate the body
    pub fn step(&mut self, ability: &mut SwingAbility, input: &TickInput, dt: f32) -> Vec<SwingEvent> {
        self.time_ticks += 1;
        self.refresh_contacts();

        let events = ability.tick(&mut self.collaborators(), input, Step::fixed(dt));
        self.integrate(dt);
        events
    }

    /// External push (dash, explosion) that displaces the body directly
    pub fn push(&mut self, offset: Vec2) {
        self.body.position += offset;
        self.refresh_contacts();
    }

    /// Move by the current force. A move that would end inside an obstacle is
    /// dropped, leaving the body where it was.
    pub fn integrate(&mut self, dt: f32) {
        if self.body.gravity_active {
            self.body.force.y -= self.gravity * dt;
        }

        let next = self.body.position + self.body.force * dt;
        if self.obstacles.distance(next) > self.body.half_extents.x {
            self.body.position = next;
        }
        self.refresh_contacts();
    }

    pub fn refresh_contacts(&mut self) {
        self.body.contacts =
            self.obstacles
                .contacts(self.body.position, self.body.half_extents, CONTACT_SKIN);
    }
}
