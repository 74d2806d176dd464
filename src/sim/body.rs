//! Collaborator contracts
//!
//! The swing core never owns the physical body, the anchors or the obstacle
//! world. It talks to them through these traits once per tick and keeps
//! nothing but plain values between ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Movement state reported by the character controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementState {
    #[default]
    Normal,
    Jumping,
    Falling,
    Dashing,
    /// Set for the whole attachment episode so other abilities stay out
    Swinging,
}

/// A side of the body's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Above,
    Below,
    Left,
    Right,
}

impl Side {
    /// Unit vector pointing away from this side, back into free space
    pub fn away(self) -> Vec2 {
        match self {
            Side::Above => Vec2::NEG_Y,
            Side::Below => Vec2::Y,
            Side::Left => Vec2::X,
            Side::Right => Vec2::NEG_X,
        }
    }
}

/// Contact flags for the four sides of the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contacts {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,
}

impl Contacts {
    /// The touching side, if exactly one side is touching
    pub fn single_side(&self) -> Option<Side> {
        let sides = [
            (self.above, Side::Above),
            (self.below, Side::Below),
            (self.left, Side::Left),
            (self.right, Side::Right),
        ];
        let mut touching = sides.iter().filter(|(hit, _)| *hit).map(|(_, side)| *side);
        match (touching.next(), touching.next()) {
            (Some(side), None) => Some(side),
            _ => None,
        }
    }
}

/// Non-owning handle to an anchor object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u32);

/// The physical body / character controller being swung
pub trait SwingBody {
    /// World-space position
    fn position(&self) -> Vec2;

    /// Set the force (velocity) applied to the body this tick
    fn set_force(&mut self, force: Vec2);

    fn gravity_active(&self) -> bool;

    fn set_gravity_active(&mut self, active: bool);

    /// Height of the bounding box
    fn height(&self) -> f32;

    fn contacts(&self) -> Contacts;

    /// Standing on something; swinging only starts while airborne
    fn is_grounded(&self) -> bool {
        self.contacts().below
    }

    fn movement_state(&self) -> MovementState;

    fn set_movement_state(&mut self, state: MovementState);
}

/// Anchor discovery and lifecycle, owned by whatever spawns hooks and ropes
pub trait AnchorRegistry {
    /// First active anchor carrying `category`
    fn find_by_category(&self, category: &str) -> Option<AnchorId>;

    /// Object the body is currently linked (parented) to, if any
    fn linked_parent(&self) -> Option<AnchorId>;

    fn category(&self, id: AnchorId) -> Option<&str>;

    /// Position of an active anchor; `None` once it is destroyed or deactivated
    fn position(&self, id: AnchorId) -> Option<Vec2>;

    /// Whether a projectile anchor has latched onto something
    fn contact_achieved(&self, id: AnchorId) -> bool;

    /// Deactivate an anchor after the body lets go of it
    fn deactivate(&mut self, id: AnchorId);
}

/// Nearest-obstacle raycast
pub trait ObstacleQuery {
    /// Distance to the nearest obstacle along `direction` within `max_distance`
    fn nearest(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32>;
}

/// Health-side temporary invulnerability flag
pub trait Invulnerability {
    fn is_invulnerable(&self) -> bool;

    fn set_invulnerable(&mut self, invulnerable: bool);
}

/// Permission flag of the competing horizontal movement ability
pub trait AbilityPermission {
    fn is_permitted(&self) -> bool;

    fn set_permitted(&mut self, permitted: bool);
}

/// Everything one tick needs, borrowed for the duration of that tick
pub struct Collaborators<'a> {
    pub body: &'a mut dyn SwingBody,
    pub anchors: &'a mut dyn AnchorRegistry,
    /// `None` disables obstacle damping
    pub obstacles: Option<&'a dyn ObstacleQuery>,
    /// `None` when the body has no health component
    pub health: Option<&'a mut dyn Invulnerability>,
    pub horizontal: &'a mut dyn AbilityPermission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_side() {
        let none = Contacts::default();
        assert_eq!(none.single_side(), None);

        let left = Contacts {
            left: true,
            ..Default::default()
        };
        assert_eq!(left.single_side(), Some(Side::Left));

        let corner = Contacts {
            left: true,
            above: true,
            ..Default::default()
        };
        assert_eq!(corner.single_side(), None);
    }

    #[test]
    fn test_side_away_is_opposite() {
        assert_eq!(Side::Above.away(), Vec2::new(0.0, -1.0));
        assert_eq!(Side::Below.away(), Vec2::new(0.0, 1.0));
        assert_eq!(Side::Left.away(), Vec2::new(1.0, 0.0));
        assert_eq!(Side::Right.away(), Vec2::new(-1.0, 0.0));
    }
}
