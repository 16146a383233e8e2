//! Real-time game loop on tokio.
//!
//! # Tasks
//!
//! ```text
//!  physics timer ──AdvanceTime──┐
//!  (physics_period, Delay)      │
//!                               ▼
//!  AI timer ──Inspect──► unbounded mpsc ──► consumer ──► watch<Arc<WorldView>>
//!  (ai_period, Skip)     ▲      ▲           (owns World)
//!    │  ▲                │      │
//!    │  └─ Snapshot ─────┘      └── GameHandle::add_event (player input)
//!    └─► spawn_blocking(AiRunner::decide) ──Composite──► mpsc
//! ```
//!
//! Only the consumer touches the [`World`]; it applies events strictly in
//! arrival order and publishes a fresh [`WorldView`] whenever the world's
//! version moved.  The AI timer asks for a snapshot with an
//! [`Event::Inspect`], so the snapshot is taken between two events.  While
//! the game is paused the inspector answers `None` and the AI tick is
//! skipped.  A slow AI run only delays later AI ticks (`Skip`); physics keeps
//! its own cadence.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{self, JoinHandle};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info, trace};

use tc_behavior::{Event, Inspector, Snapshot};
use tc_core::SimConfig;
use tc_save::{SavedGame, SavedGrowth};
use tc_world::World;

use crate::sim::apply_event;
use crate::{AiRunner, SimError, SimResult, WorldObserver, WorldView};

// ── GameLoop ──────────────────────────────────────────────────────────────────

/// A world plus its AI, ready to run in real time.
///
/// Create via [`SimBuilder::build_loop`][crate::SimBuilder::build_loop], then
/// [`spawn`][GameLoop::spawn] inside a tokio runtime.
pub struct GameLoop {
    config:   SimConfig,
    world:    World,
    ai:       AiRunner,
    observer: Box<dyn WorldObserver>,
}

impl GameLoop {
    pub(crate) fn new(config: SimConfig, world: World, ai: AiRunner, observer: Box<dyn WorldObserver>) -> Self {
        Self { config, world, ai, observer }
    }

    /// Start the consumer and both timers on the current runtime.
    pub fn spawn(self) -> GameHandle {
        let GameLoop { config, world, ai, observer } = self;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(Arc::new(WorldView::of(&world)));
        let (growth_tx, growth_rx) = watch::channel(ai.growth_state());
        let (stop_tx, stop_rx) = watch::channel(false);
        let (halt_tx, halt_rx) = oneshot::channel();

        info!(
            physics_ms = config.physics_period_ms,
            ai_ms = config.ai_period_ms,
            now = %world.now(),
            "game loop started"
        );

        let consumer = tokio::spawn(consume(world, observer, events_rx, view_tx, halt_rx));
        let physics = tokio::spawn(physics_timer(config.physics_period(), events_tx.clone(), stop_rx.clone()));
        let ai = tokio::spawn(ai_timer(config.ai_period(), ai, events_tx.clone(), growth_tx, stop_rx));

        GameHandle {
            events: events_tx,
            view: view_rx,
            growth: growth_rx,
            stop: stop_tx,
            halt: halt_tx,
            consumer,
            physics,
            ai,
        }
    }
}

// ── GameHandle ────────────────────────────────────────────────────────────────

/// Front-end side of a running [`GameLoop`].
pub struct GameHandle {
    events:   mpsc::UnboundedSender<Event>,
    view:     watch::Receiver<Arc<WorldView>>,
    growth:   watch::Receiver<SavedGrowth>,
    stop:     watch::Sender<bool>,
    halt:     oneshot::Sender<()>,
    consumer: JoinHandle<World>,
    physics:  JoinHandle<()>,
    ai:       JoinHandle<SimResult<AiRunner>>,
}

/// What is left after [`GameHandle::shutdown`].
#[derive(Debug)]
pub struct StoppedGame {
    pub world:  World,
    pub growth: SavedGrowth,
}

impl StoppedGame {
    pub fn save(&self) -> SavedGame {
        tc_save::capture(&self.world, self.growth)
    }
}

impl GameHandle {
    /// Queue an event.  Never blocks.
    pub fn add_event(&self, event: Event) -> SimResult<()> {
        self.events.send(event).map_err(|_| SimError::Stopped)
    }

    /// A sender for producers living elsewhere (input handlers, scripts).
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.events.clone()
    }

    /// The most recently published view.
    pub fn view(&self) -> Arc<WorldView> {
        Arc::clone(&self.view.borrow())
    }

    /// Receiver notified on every published view.
    pub fn subscribe(&self) -> watch::Receiver<Arc<WorldView>> {
        self.view.clone()
    }

    /// Run `f` against the live world between two events.
    pub async fn query<R, F>(&self, f: F) -> SimResult<R>
    where
        F: FnOnce(&World) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.add_event(Event::Inspect(Inspector::new(move |world| {
            let _ = tx.send(f(world));
        })))?;
        rx.await.map_err(|_| SimError::Stopped)
    }

    /// Capture a save of the running game.
    pub async fn save(&self) -> SimResult<SavedGame> {
        let growth = *self.growth.borrow();
        self.query(move |world| tc_save::capture(world, growth)).await
    }

    /// Stop both timers, apply whatever is still queued, and hand back the
    /// world.
    pub async fn shutdown(self) -> SimResult<StoppedGame> {
        let _ = self.stop.send(true);
        self.physics.await?;
        let ai = self.ai.await??;
        let _ = self.halt.send(());
        let world = self.consumer.await?;
        info!(now = %world.now(), version = world.version(), "game loop stopped");
        Ok(StoppedGame { world, growth: ai.growth_state() })
    }
}

// ── Tasks ─────────────────────────────────────────────────────────────────────

async fn consume(
    mut world:    World,
    mut observer: Box<dyn WorldObserver>,
    mut events:   mpsc::UnboundedReceiver<Event>,
    view:         watch::Sender<Arc<WorldView>>,
    mut halt:     oneshot::Receiver<()>,
) -> World {
    let mut published = world.version();
    loop {
        tokio::select! {
            biased;
            _ = &mut halt => break,
            next = events.recv() => {
                let Some(event) = next else { break };
                apply_event(&mut world, observer.as_mut(), event);
                // Drain what is already queued before publishing once.
                while let Ok(event) = events.try_recv() {
                    apply_event(&mut world, observer.as_mut(), event);
                }
                if world.version() != published {
                    published = world.version();
                    view.send_replace(Arc::new(WorldView::of(&world)));
                }
            }
        }
    }

    events.close();
    while let Ok(event) = events.try_recv() {
        apply_event(&mut world, observer.as_mut(), event);
    }
    world
}

async fn physics_timer(period: Duration, events: mpsc::UnboundedSender<Event>, mut stop: watch::Receiver<bool>) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if events.send(Event::AdvanceTime).is_err() {
                    break;
                }
            }
            _ = stop.changed() => break,
        }
    }
    debug!("physics timer stopped");
}

async fn ai_timer(
    period:     Duration,
    mut ai:     AiRunner,
    events:     mpsc::UnboundedSender<Event>,
    growth:     watch::Sender<SavedGrowth>,
    mut stop:   watch::Receiver<bool>,
) -> SimResult<AiRunner> {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop.changed() => break,
        }

        let (snapshot_tx, snapshot_rx) = oneshot::channel();
        let inspect = Inspector::new(move |world: &World| {
            let snapshot = (!world.speed().is_paused()).then(|| Snapshot::capture(world));
            let _ = snapshot_tx.send(snapshot);
        });
        if events.send(Event::Inspect(inspect)).is_err() {
            break;
        }
        let snapshot = match snapshot_rx.await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                trace!("paused, AI tick skipped");
                continue;
            }
            Err(_) => break,
        };

        let mut runner = ai;
        let decided = task::spawn_blocking(move || {
            let batch = runner.decide(&snapshot);
            (runner, batch)
        })
        .await;
        let batch = match decided {
            Ok((runner, batch)) => {
                ai = runner;
                batch
            }
            Err(err) => {
                error!(%err, "AI task failed");
                return Err(err.into());
            }
        };

        growth.send_replace(ai.growth_state());
        if !batch.is_empty() && events.send(Event::composite(batch)).is_err() {
            break;
        }
    }
    debug!("AI timer stopped");
    Ok(ai)
}
