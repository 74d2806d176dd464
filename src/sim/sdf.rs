//! SDF-based obstacle world
//!
//! Static obstacles described by signed distance functions. Used to answer
//! the probe's raycasts (sphere tracing) and to derive the sandbox body's
//! contact flags.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Contacts, ObstacleQuery};

/// Sphere tracing stops once this close to a surface
const HIT_EPSILON: f32 = 1e-4;
/// Sphere tracing step limit
const MAX_STEPS: usize = 64;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box
#[inline]
pub fn sd_box(p: Vec2, center: Vec2, half_extents: Vec2) -> f32 {
    let d = (p - center).abs() - half_extents;
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Sphere-trace from `start` along `direction` for a probe of `radius`.
///
/// Returns the travelled distance to the first hit within `max_distance`.
pub fn raymarch<F>(
    start: Vec2,
    direction: Vec2,
    max_distance: f32,
    radius: f32,
    sdf: F,
) -> Option<f32>
where
    F: Fn(Vec2) -> f32,
{
    let dir = direction.normalize_or_zero();
    if dir == Vec2::ZERO || max_distance < 0.0 {
        return None;
    }

    let mut t = 0.0;
    for _ in 0..MAX_STEPS {
        let p = start + dir * t;
        let gap = sdf(p) - radius;

        if gap <= HIT_EPSILON {
            return Some(t);
        }

        t += gap;
        if t > max_distance {
            break;
        }
    }

    None
}

/// Obstacle primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    Circle { center: Vec2, radius: f32 },
    Box { center: Vec2, half_extents: Vec2 },
}

impl Obstacle {
    pub fn distance(&self, p: Vec2) -> f32 {
        match *self {
            Obstacle::Circle { center, radius } => sd_circle(p, center, radius),
            Obstacle::Box {
                center,
                half_extents,
            } => sd_box(p, center, half_extents),
        }
    }
}

/// Union of static obstacles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfObstacles {
    pub shapes: Vec<Obstacle>,
    /// Probe radius used for raycasts (roughly the body's half width)
    pub clearance: f32,
}

impl SdfObstacles {
    pub fn new(clearance: f32) -> Self {
        Self {
            shapes: Vec::new(),
            clearance,
        }
    }

    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.shapes.push(obstacle);
        self
    }

    /// Signed distance to the nearest obstacle (`f32::MAX` when empty)
    pub fn distance(&self, p: Vec2) -> f32 {
        self.shapes
            .iter()
            .map(|shape| shape.distance(p))
            .fold(f32::MAX, f32::min)
    }

    /// Contact flags for a box of `half_extents` at `center`.
    ///
    /// A side touches when the obstacle surface is within `skin` of the
    /// midpoint of that side.
    pub fn contacts(&self, center: Vec2, half_extents: Vec2, skin: f32) -> Contacts {
        let touching = |offset: Vec2| self.distance(center + offset) <= skin;
        Contacts {
            above: touching(Vec2::new(0.0, half_extents.y)),
            below: touching(Vec2::new(0.0, -half_extents.y)),
            left: touching(Vec2::new(-half_extents.x, 0.0)),
            right: touching(Vec2::new(half_extents.x, 0.0)),
        }
    }
}

impl ObstacleQuery for SdfObstacles {
    fn nearest(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
        if self.shapes.is_empty() {
            return None;
        }
        raymarch(origin, direction, max_distance, self.clearance, |p| self.distance(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at_x(x: f32) -> Obstacle {
        Obstacle::Box {
            center: Vec2::new(x + 5.0, 0.0),
            half_extents: Vec2::new(5.0, 50.0),
        }
    }

    #[test]
    fn test_sd_box_inside_and_outside() {
        let c = Vec2::ZERO;
        let h = Vec2::new(1.0, 2.0);
        assert!((sd_box(Vec2::new(3.0, 0.0), c, h) - 2.0).abs() < 1e-6);
        assert!((sd_box(Vec2::new(0.0, 0.0), c, h) + 1.0).abs() < 1e-6);
        assert!((sd_box(Vec2::new(4.0, 6.0), c, h) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_raymarch_hits_wall_at_distance() {
        let world = SdfObstacles::new(0.0).with(wall_at_x(3.0));
        let hit = world.nearest(Vec2::ZERO, Vec2::X, 10.0);
        assert!((hit.unwrap() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_raymarch_respects_clearance() {
        let world = SdfObstacles::new(0.5).with(wall_at_x(3.0));
        let hit = world.nearest(Vec2::ZERO, Vec2::X, 10.0).unwrap();
        assert!((hit - 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_raymarch_misses_beyond_range_or_behind() {
        let world = SdfObstacles::new(0.0).with(wall_at_x(3.0));
        assert_eq!(world.nearest(Vec2::ZERO, Vec2::X, 1.0), None);
        assert_eq!(world.nearest(Vec2::ZERO, Vec2::NEG_X, 10.0), None);
        assert_eq!(SdfObstacles::new(0.0).nearest(Vec2::ZERO, Vec2::X, 10.0), None);
    }

    #[test]
    fn test_raymarch_hits_circle() {
        let world = SdfObstacles::new(0.0).with(Obstacle::Circle {
            center: Vec2::new(0.0, 5.0),
            radius: 1.0,
        });
        let t = raymarch(Vec2::ZERO, Vec2::Y, 10.0, 0.0, |p| world.distance(p)).unwrap();
        assert!((t - 4.0).abs() < 1e-3);
        assert_eq!(raymarch(Vec2::ZERO, Vec2::ZERO, 10.0, 0.0, |p| world.distance(p)), None);
    }

    #[test]
    fn test_contacts_from_sdf() {
        let world = SdfObstacles::new(0.0).with(wall_at_x(0.55));
        let contacts = world.contacts(Vec2::ZERO, Vec2::new(0.5, 1.0), 0.1);
        assert!(contacts.right);
        assert!(!contacts.left && !contacts.above && !contacts.below);
    }
}
