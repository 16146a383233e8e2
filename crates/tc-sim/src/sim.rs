//! The synchronous `Sim` driver.

use tc_behavior::{Event, Snapshot};
use tc_core::SimConfig;
use tc_save::SavedGame;
use tc_world::World;

use crate::{AiRunner, NoopObserver, WorldObserver};

/// Apply one event and report it to `observer`.  Shared by [`Sim`] and the
/// game loop consumer.
pub(crate) fn apply_event<O: WorldObserver + ?Sized>(world: &mut World, observer: &mut O, event: Event) {
    let kind = event.kind();
    event.apply_observed(world, &mut |report| observer.on_physics(&report));
    observer.on_event(kind, world);
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// Timer-free simulation runner.
///
/// Drives the same world, events, and AI as the real-time
/// [`GameLoop`][crate::GameLoop], but steps them explicitly:
///
/// 1. **Physics**: one [`Event::AdvanceTime`] per tick.
/// 2. **AI**: every `ai_period_ms / physics_period_ms` physics ticks, capture
///    a [`Snapshot`] (skipped while paused), run car dispatch and city
///    growth, and apply their events immediately.
///
/// Event outcomes therefore resolve before the next AI tick, and a run is
/// fully reproducible from its seed and input events.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<O: WorldObserver = NoopObserver> {
    config:        SimConfig,
    world:         World,
    ai:            AiRunner,
    observer:      O,
    physics_ticks: u64,
}

impl<O: WorldObserver> Sim<O> {
    pub(crate) fn new(config: SimConfig, world: World, ai: AiRunner, observer: O) -> Self {
        Self { config, world, ai, observer, physics_ticks: 0 }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The validated config this run was built with.
    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn ai(&self) -> &AiRunner {
        &self.ai
    }

    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Physics ticks stepped so far (paused ones included).
    #[inline]
    pub fn physics_ticks(&self) -> u64 {
        self.physics_ticks
    }

    /// Physics ticks per AI tick.
    pub fn ai_every(&self) -> u64 {
        (self.config.ai_period_ms / self.config.physics_period_ms.max(1)).max(1)
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Apply an external event (player input) right away.
    pub fn apply(&mut self, event: Event) {
        apply_event(&mut self.world, &mut self.observer, event);
    }

    pub fn step_physics(&mut self) {
        self.apply(Event::AdvanceTime);
        self.physics_ticks += 1;
    }

    /// Run both AI systems once and apply their events.  Returns the number
    /// of events applied; always `0` while paused.
    pub fn step_ai(&mut self) -> usize {
        if self.world.speed().is_paused() {
            return 0;
        }
        let snapshot = Snapshot::capture(&self.world);
        let events = self.ai.decide(&snapshot);
        let count = events.len();
        for event in events {
            self.apply(event);
        }
        count
    }

    /// Step `n` physics ticks, running the AI on its cadence.
    pub fn run_ticks(&mut self, n: u64) {
        let ai_every = self.ai_every();
        for _ in 0..n {
            self.step_physics();
            if self.physics_ticks.is_multiple_of(ai_every) {
                self.step_ai();
            }
        }
    }

    // ── Persistence / teardown ────────────────────────────────────────────

    pub fn save(&self) -> SavedGame {
        tc_save::capture(&self.world, self.ai.growth_state())
    }

    pub fn into_parts(self) -> (World, AiRunner, O) {
        (self.world, self.ai, self.observer)
    }
}
