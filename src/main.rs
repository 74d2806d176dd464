//! Swing Tether headless demo
//!
//! Drives the sandbox world with a seeded random input script through a
//! fixed-step accumulator and reports how tightly the tether held.
//!
//! Usage: `swing-tether [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use swing_tether::SwingSettings;
    use swing_tether::consts::{MAX_SUBSTEPS, SIM_DT};
    use swing_tether::sim::{
        AnchorId, DetachReason, Obstacle, Sandbox, SwingAbility, SwingEvent, TickInput,
    };

    /// Simulated wall-clock seconds
    const DEMO_SECONDS: f32 = 30.0;
    const DEFAULT_SEED: u64 = 42;
    const HOOK_ANCHOR: Vec2 = Vec2::new(0.0, 10.0);
    /// Hook flight time before it latches
    const HOOK_FLIGHT: f32 = 0.25;
    /// Free fall after letting go, then respawn
    const FALL_TIME: f32 = 0.75;

    /// Aggregated run statistics
    #[derive(Debug, Default)]
    struct DemoReport {
        frames: u64,
        attaches: u32,
        releases: u32,
        near_contact_ticks: u32,
        nudges: u32,
        max_deviation: f32,
    }

    /// Random input segment
    struct Segment {
        axis: f32,
        remaining: f32,
        release_at_end: bool,
    }

    impl Segment {
        fn random(rng: &mut Pcg32) -> Self {
            Self {
                axis: rng.random_range(-1i32..=1) as f32,
                remaining: rng.random_range(0.2..1.5),
                release_at_end: rng.random_bool(0.15),
            }
        }
    }

    /// Hook lifecycle driven by the demo, standing in for a projectile system
    enum HookPhase {
        Flying { anchor: AnchorId, left: f32 },
        Latched,
        Falling { left: f32 },
    }

    struct Demo {
        sandbox: Sandbox,
        ability: SwingAbility,
        rng: Pcg32,
        segment: Segment,
        hook: HookPhase,
        report: DemoReport,
    }

    impl Demo {
        fn new(settings: SwingSettings, seed: u64) -> Self {
            let mut sandbox = Sandbox::new(Vec2::ZERO, 1.0);
            // Ledge on the right that the swing circle passes through
            sandbox.obstacles = sandbox.obstacles.clone().with(Obstacle::Box {
                center: Vec2::new(9.0, 4.0),
                half_extents: Vec2::new(1.0, 4.0),
            });

            let mut rng = Pcg32::seed_from_u64(seed);
            let segment = Segment::random(&mut rng);
            let anchor = sandbox.anchors.spawn("Hook", HOOK_ANCHOR);
            if settings.hook_category != "Hook" {
                log::warn!(
                    "Demo spawns \"Hook\" anchors, settings look for {:?}",
                    settings.hook_category
                );
            }

            Self {
                sandbox,
                ability: SwingAbility::new(settings),
                rng,
                segment,
                hook: HookPhase::Flying {
                    anchor,
                    left: HOOK_FLIGHT,
                },
                report: DemoReport::default(),
            }
        }

        /// One fixed simulation step
        fn tick(&mut self) {
            self.advance_hook();

            self.segment.remaining -= SIM_DT;
            let release = self.segment.remaining <= 0.0 && self.segment.release_at_end;
            let input = TickInput {
                axis: self.segment.axis,
                release,
            };
            if self.segment.remaining <= 0.0 {
                self.segment = Segment::random(&mut self.rng);
            }

            let events = self.sandbox.step(&mut self.ability, &input, SIM_DT);
            for event in events {
                self.on_event(event);
            }

            if let Some(episode) = self.ability.episode() {
                let anchor = self.sandbox.anchors.get(episode.tether.anchor());
                if let Some(anchor) = anchor {
                    let distance = (self.sandbox.body.position - anchor.position).length();
                    let deviation = (distance - episode.tether.length()).abs();
                    self.report.max_deviation = self.report.max_deviation.max(deviation);
                }
            }
        }

        fn advance_hook(&mut self) {
            match &mut self.hook {
                HookPhase::Flying { anchor, left } => {
                    *left -= SIM_DT;
                    if *left <= 0.0 {
                        self.sandbox.anchors.set_contact(*anchor, true);
                        self.hook = HookPhase::Latched;
                    }
                }
                HookPhase::Latched => {}
                HookPhase::Falling { left } => {
                    *left -= SIM_DT;
                    if *left <= 0.0 {
                        self.respawn();
                    }
                }
            }
        }

        fn respawn(&mut self) {
            self.ability.force_reset(&mut self.sandbox.collaborators());
            let x = self.rng.random_range(-4.0..4.0);
            self.sandbox.body.position = Vec2::new(x, 0.0);
            self.sandbox.body.force = Vec2::ZERO;
            self.sandbox.anchors.anchors.retain(|a| a.active);
            let anchor = self.sandbox.anchors.spawn("Hook", HOOK_ANCHOR);
            self.hook = HookPhase::Flying {
                anchor,
                left: HOOK_FLIGHT,
            };
            log::debug!("Respawned at x = {:.2}", x);
        }

        fn on_event(&mut self, event: SwingEvent) {
            match event {
                SwingEvent::Attached { .. } => self.report.attaches += 1,
                SwingEvent::Detached { reason } => {
                    if reason == DetachReason::Released {
                        self.report.releases += 1;
                    }
                    self.hook = HookPhase::Falling { left: FALL_TIME };
                }
                SwingEvent::NearContact => self.report.near_contact_ticks += 1,
                SwingEvent::Nudged { .. } => self.report.nudges += 1,
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings = args
            .next()
            .map(SwingSettings::load)
            .unwrap_or_default();
        let seed = match args.next() {
            Some(arg) => arg.parse().unwrap_or_else(|_| {
                log::warn!("Invalid seed {:?}, using {}", arg, DEFAULT_SEED);
                DEFAULT_SEED
            }),
            None => DEFAULT_SEED,
        };
        log::info!("Swing Tether demo starting with seed: {}", seed);

        let mut demo = Demo::new(settings, seed);
        if let Some(err) = demo.ability.disabled_reason() {
            log::error!("Nothing to simulate: {}", err);
            return;
        }

        // Irregular frame times, consumed in fixed steps
        let mut accumulator = 0.0;
        let mut elapsed = 0.0;
        while elapsed < DEMO_SECONDS {
            let frame_dt: f32 = demo.rng.random_range(1.0 / 144.0..1.0 / 30.0);
            elapsed += frame_dt;
            accumulator += frame_dt.min(0.1);
            demo.report.frames += 1;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                demo.tick();
                accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        let report = &demo.report;
        log::info!(
            "{} ticks over {} frames: {} attaches, {} releases, {} near-contact ticks, {} nudges",
            demo.sandbox.time_ticks,
            report.frames,
            report.attaches,
            report.releases,
            report.near_contact_ticks,
            report.nudges
        );
        println!("Max tether deviation: {:.6}", report.max_deviation);
        println!(
            "Final state: attached = {}, position = {:?}, movement = {:?}",
            demo.ability.is_attached(),
            demo.sandbox.body.position,
            demo.sandbox.body.movement_state
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless demo is native only
}
