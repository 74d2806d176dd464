//! Fixed timestep swing tick
//!
//! `SwingAbility` is the attach/detach state machine. Each tick it either
//! looks for something to swing from (idle) or drives the body around the
//! tether circle (attached). It is the only owner of the attachment episode.

use glam::Vec2;

use super::body::{AnchorId, Collaborators, MovementState};
use super::guard::{DriftCorrector, StuckGuard};
use super::probe::ObstacleProbe;
use super::solver::{SwingSolver, SwingStep};
use super::state::{AttachmentEpisode, DetachReason, PriorState, SwingEvent};
use super::tether::{TetherState, select_tether};
use crate::error::SwingError;
use crate::settings::SwingSettings;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw horizontal axis in [-1, 1]
    pub axis: f32,
    /// Release button went down this tick
    pub release: bool,
}

/// Tick and physics-step durations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub dt: f32,
    pub physics_dt: f32,
}

impl Step {
    /// Fixed-step simulation: both durations are the same
    pub fn fixed(dt: f32) -> Self {
        Self { dt, physics_dt: dt }
    }
}

/// Grappling / rope swing ability of one entity
#[derive(Debug, Clone)]
pub struct SwingAbility {
    settings: SwingSettings,
    solver: SwingSolver,
    probe: ObstacleProbe,
    stuck: StuckGuard,
    drift: DriftCorrector,
    /// Set once at construction; a disabled ability never attaches
    disabled: Option<SwingError>,
    episode: Option<AttachmentEpisode>,
    last_force: Vec2,
    /// Last anchor refused for a degenerate tether, warned about once
    rejected_anchor: Option<AnchorId>,
}

impl SwingAbility {
    /// Build the ability. Invalid settings disable it for good (logged once).
    pub fn new(settings: SwingSettings) -> Self {
        let disabled = settings.validate().err();
        if let Some(err) = &disabled {
            log::warn!("Swing ability disabled: {}", err);
        }

        Self {
            solver: SwingSolver::from_settings(&settings),
            probe: ObstacleProbe::from_settings(&settings),
            stuck: StuckGuard::from_settings(&settings),
            drift: DriftCorrector::from_settings(&settings),
            settings,
            disabled,
            episode: None,
            last_force: Vec2::ZERO,
            rejected_anchor: None,
        }
    }

    pub fn settings(&self) -> &SwingSettings {
        &self.settings
    }

    /// Why the ability is permanently disabled, if it is
    pub fn disabled_reason(&self) -> Option<&SwingError> {
        self.disabled.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.episode.is_some()
    }

    pub fn episode(&self) -> Option<&AttachmentEpisode> {
        self.episode.as_ref()
    }

    /// Force written to the body by the last swinging tick
    pub fn last_force(&self) -> Vec2 {
        self.last_force
    }

    /// Current tangential input speed (0 while idle)
    pub fn tangential_speed(&self) -> f32 {
        self.episode.as_ref().map_or(0.0, |e| e.tracker.speed())
    }

    /// Advance one tick
    pub fn tick(
        &mut self,
        world: &mut Collaborators<'_>,
        input: &TickInput,
        step: Step,
    ) -> Vec<SwingEvent> {
        let mut events = Vec::new();
        if self.disabled.is_some() {
            return events;
        }

        // Release wins over everything else this tick
        if input.release {
            if let Some(event) = self.release(world) {
                events.push(event);
                return events;
            }
        }

        if let Some(event) = self.try_attach(world) {
            events.push(event);
        }

        self.swing(world, input, step, &mut events);
        events
    }

    /// Start an episode if an anchor is ready and the body is airborne.
    ///
    /// No-op while an episode is already active.
    pub fn try_attach(&mut self, world: &mut Collaborators<'_>) -> Option<SwingEvent> {
        if self.disabled.is_some() || self.episode.is_some() {
            return None;
        }
        if world.body.is_grounded() {
            return None;
        }

        let target = select_tether(&*world.anchors, &self.settings);
        let anchor = target.resolve(&*world.anchors, &self.settings)?;
        if !target.confirm_attach(&*world.anchors, anchor) {
            return None;
        }
        let anchor_position = world.anchors.position(anchor)?;

        let position = world.body.position();
        let length = target.initial_length(anchor_position, position);
        let Some(tether) = TetherState::new(anchor, target.kind(), length, world.body.height())
        else {
            if self.note_rejected(anchor) {
                log::warn!("Attach to {:?} rejected: degenerate tether length {}", anchor, length);
            }
            return None;
        };
        self.rejected_anchor = None;

        let prior = PriorState {
            movement_state: world.body.movement_state(),
            gravity_active: world.body.gravity_active(),
            horizontal_permitted: world.horizontal.is_permitted(),
        };
        world.body.set_gravity_active(false);
        world.horizontal.set_permitted(false);
        world.body.set_movement_state(MovementState::Swinging);

        log::info!(
            "Attached to {:?} ({:?}): length {:.3}, {:?} mode",
            anchor,
            tether.kind(),
            tether.length(),
            tether.mode()
        );
        self.episode = Some(AttachmentEpisode::new(tether, prior, position));

        Some(SwingEvent::Attached {
            anchor,
            mode: tether.mode(),
            length: tether.length(),
        })
    }

    /// Remember a refused anchor; true the first time it is refused in a row
    fn note_rejected(&mut self, anchor: AnchorId) -> bool {
        let first = self.rejected_anchor != Some(anchor);
        self.rejected_anchor = Some(anchor);
        first
    }

    /// Player let go. No-op when idle.
    pub fn release(&mut self, world: &mut Collaborators<'_>) -> Option<SwingEvent> {
        self.detach(world, DetachReason::Released)
    }

    /// Restore every external toggle; safe to call in any state (respawn, death)
    pub fn force_reset(&mut self, world: &mut Collaborators<'_>) -> Option<SwingEvent> {
        self.detach(world, DetachReason::Reset)
    }

    fn detach(&mut self, world: &mut Collaborators<'_>, reason: DetachReason) -> Option<SwingEvent> {
        let mut episode = self.episode.take()?;

        let anchor = episode.tether.anchor();
        if world.anchors.position(anchor).is_some() {
            world.anchors.deactivate(anchor);
        }

        world.body.set_movement_state(episode.prior.movement_state);
        world.body.set_gravity_active(episode.prior.gravity_active);
        world.horizontal.set_permitted(episode.prior.horizontal_permitted);
        episode.streak.release(world.health.as_deref_mut());
        self.last_force = Vec2::ZERO;

        log::info!(
            "Detached from {:?} after {} ticks: {:?}",
            anchor,
            episode.ticks,
            reason
        );
        Some(SwingEvent::Detached { reason })
    }

    fn swing(
        &mut self,
        world: &mut Collaborators<'_>,
        input: &TickInput,
        step: Step,
        events: &mut Vec<SwingEvent>,
    ) {
        let Some(anchor_id) = self.episode.as_ref().map(|e| e.tether.anchor()) else {
            return;
        };
        let Some(anchor) = world.anchors.position(anchor_id) else {
            log::warn!("Anchor {:?} lost mid-swing, detaching", anchor_id);
            events.extend(self.detach(world, DetachReason::AnchorLost));
            return;
        };

        let Self {
            settings,
            solver,
            probe,
            stuck,
            drift,
            episode,
            last_force,
            ..
        } = self;
        let Some(episode) = episode.as_mut() else {
            return;
        };

        let position = world.body.position();
        let tether = episode.tether;
        let idle_deceleration = tether.mode().idle_deceleration(settings);

        let speed = episode.tracker.update(
            &mut episode.memory,
            input.axis,
            position.x - anchor.x,
            idle_deceleration,
            step.dt,
            settings,
        );

        let swing_step = SwingStep {
            speed,
            position,
            anchor,
            length: tether.length(),
            dt: step.dt,
            physics_dt: step.physics_dt,
            idle_deceleration,
        };

        let mut near_contact = false;
        let streak = &mut episode.streak;
        let obstacles = world.obstacles;
        let health = &mut world.health;
        let solution = solver.solve(&swing_step, |direction| {
            let reading = probe.sample(obstacles, position, direction);
            streak.apply(&reading, health.as_deref_mut(), settings.temporary_invulnerability);
            near_contact |= reading.near_contact;
            reading.multiplier
        });
        if near_contact {
            events.push(SwingEvent::NearContact);
        }

        let displacement = position - episode.memory.previous_position;
        let nudge = stuck.nudge(episode.recorded_force, displacement, world.body.contacts());
        if let Some(force) = nudge {
            log::debug!("Stuck against a wall, nudging by {:?}", force);
            events.push(SwingEvent::Nudged { force });
        }

        let correction = drift.correction(position, anchor, tether.length());
        let force = solution.force + correction + nudge.unwrap_or(Vec2::ZERO);

        log::trace!(
            "swing tick {}: speed {:.3} solver {:?} x{:.3} drift {:?} -> {:?}",
            episode.ticks,
            speed,
            solution.redirect.velocity,
            solution.multiplier,
            correction,
            force
        );

        world.body.set_force(force);
        episode.memory.previous_position = position;
        episode.recorded_force = solution.recorded;
        episode.ticks += 1;
        *last_force = force;
    }
}
