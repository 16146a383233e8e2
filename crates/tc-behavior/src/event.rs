//! World events — the only way anything outside the consumer mutates a world.
//!
//! Producers (physics timer, AI, user input) build [`Event`] values and hand
//! them to the single consumer, which applies them in arrival order.  Each
//! variant maps to exactly one `World` method; [`Event::Composite`] applies
//! its children in sequence.
//!
//! # Outcomes
//!
//! Growth events carry an optional [`OutcomeSender`].  When applied they
//! report `Some(time)` if something was placed and `None` otherwise.  The
//! producer keeps the matching [`PendingOutcome`] and polls it on later
//! ticks without ever blocking.

use std::fmt;

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use tc_core::{CarId, GameSpeed, NotificationId, PassengerId, SimTime};
use tc_spatial::CellCoord;
use tc_world::{Mood, PhysicsReport, World};

// ── Outcome channel ───────────────────────────────────────────────────────────

/// Write half of an event's outcome slot.
#[derive(Debug)]
pub struct OutcomeSender(oneshot::Sender<Option<SimTime>>);

impl OutcomeSender {
    /// Report the outcome.  A receiver that has gone away is ignored.
    pub fn send(self, outcome: Option<SimTime>) {
        let _ = self.0.send(outcome);
    }
}

/// Read half of an event's outcome slot.
#[derive(Debug)]
pub struct PendingOutcome(oneshot::Receiver<Option<SimTime>>);

/// State of a [`PendingOutcome`] at the time it was polled.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutcomeState {
    /// The event has not been applied yet.
    Pending,
    /// Applied; `Some(t)` if it succeeded at simulated time `t`.
    Resolved(Option<SimTime>),
    /// The event was dropped without being applied.
    Dropped,
}

impl PendingOutcome {
    /// Non-blocking check.
    pub fn poll(&mut self) -> OutcomeState {
        match self.0.try_recv() {
            Ok(outcome) => OutcomeState::Resolved(outcome),
            Err(TryRecvError::Empty) => OutcomeState::Pending,
            Err(TryRecvError::Closed) => OutcomeState::Dropped,
        }
    }
}

pub fn outcome_channel() -> (OutcomeSender, PendingOutcome) {
    let (tx, rx) = oneshot::channel();
    (OutcomeSender(tx), PendingOutcome(rx))
}

// ── Inspector ─────────────────────────────────────────────────────────────────

/// Read-only callback run by the consumer between two events.
pub struct Inspector(Box<dyn FnOnce(&World) + Send>);

impl Inspector {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&World) + Send + 'static,
    {
        Self(Box::new(f))
    }
}

impl fmt::Debug for Inspector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Inspector(..)")
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum Event {
    // Player edits.
    ToggleTile(CellCoord),
    SetTilesToRoad(Vec<CellCoord>),
    AddTaxiStation(CellCoord),
    AddCarToStation(CellCoord),
    ExpandMap { width: u32, height: u32 },
    SetGameSpeed(GameSpeed),
    RemoveNotification(NotificationId),
    AdjustMoney(i64),

    // Car AI.
    SetPath { car: CarId, path: Vec<CellCoord> },
    ClearPath(CarId),

    // City growth.
    AddPassenger { at: CellCoord, outcome: Option<OutcomeSender> },
    AddHouse { outcome: Option<OutcomeSender> },
    AddBusiness { outcome: Option<OutcomeSender> },
    SetPassengerMood { passenger: PassengerId, mood: Mood },
    RemoveUpsetPassenger(PassengerId),

    /// One fast (physics) tick.
    AdvanceTime,

    /// Apply the children in order.
    Composite(Vec<Event>),

    /// Look at the world without changing it.
    Inspect(Inspector),
}

impl Event {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ToggleTile(_)           => "toggle_tile",
            Event::SetTilesToRoad(_)       => "set_tiles_to_road",
            Event::AddTaxiStation(_)       => "add_taxi_station",
            Event::AddCarToStation(_)      => "add_car_to_station",
            Event::ExpandMap { .. }        => "expand_map",
            Event::SetGameSpeed(_)         => "set_game_speed",
            Event::RemoveNotification(_)   => "remove_notification",
            Event::AdjustMoney(_)          => "adjust_money",
            Event::SetPath { .. }          => "set_path",
            Event::ClearPath(_)            => "clear_path",
            Event::AddPassenger { .. }     => "add_passenger",
            Event::AddHouse { .. }         => "add_house",
            Event::AddBusiness { .. }      => "add_business",
            Event::SetPassengerMood { .. } => "set_passenger_mood",
            Event::RemoveUpsetPassenger(_) => "remove_upset_passenger",
            Event::AdvanceTime             => "advance_time",
            Event::Composite(_)            => "composite",
            Event::Inspect(_)              => "inspect",
        }
    }

    /// Wrap `events` in a composite, unwrapping the single-event case.
    pub fn composite(mut events: Vec<Event>) -> Event {
        if events.len() == 1 {
            if let Some(event) = events.pop() {
                return event;
            }
        }
        Event::Composite(events)
    }

    /// `true` for an empty composite (nested ones included).
    pub fn is_empty(&self) -> bool {
        match self {
            Event::Composite(events) => events.iter().all(Event::is_empty),
            _ => false,
        }
    }

    pub fn apply(self, world: &mut World) {
        self.apply_observed(world, &mut |_| {});
    }

    /// Apply, passing the report of every physics tick to `on_physics`.
    pub fn apply_observed(self, world: &mut World, on_physics: &mut dyn FnMut(PhysicsReport)) {
        match self {
            Event::ToggleTile(cell) => world.toggle_tile(cell),
            Event::SetTilesToRoad(cells) => {
                world.set_tiles_to_road(&cells);
            }
            Event::AddTaxiStation(cell) => {
                world.add_taxi_station(cell);
            }
            Event::AddCarToStation(cell) => {
                world.add_car_to_station(cell);
            }
            Event::ExpandMap { width, height } => {
                if let Err(err) = world.expand_to(width, height) {
                    tracing::warn!(%err, width, height, "map expansion rejected");
                }
            }
            Event::SetGameSpeed(speed) => {
                if world.speed() != speed {
                    tracing::info!(from = %world.speed(), to = %speed, "game speed changed");
                }
                world.set_speed(speed);
            }
            Event::RemoveNotification(id) => {
                world.remove_notification(id);
            }
            Event::AdjustMoney(delta) => world.adjust_money(delta),
            Event::SetPath { car, path } => {
                world.set_car_path(car, &path);
            }
            Event::ClearPath(car) => {
                world.clear_car_path(car);
            }
            Event::AddPassenger { at, outcome } => {
                let placed = world.add_passenger_at(at).map(|_| world.now());
                report(outcome, placed);
            }
            Event::AddHouse { outcome } => {
                let placed = world.add_random_house();
                report(outcome, placed);
            }
            Event::AddBusiness { outcome } => {
                let placed = world.add_random_business();
                report(outcome, placed);
            }
            Event::SetPassengerMood { passenger, mood } => {
                world.set_passenger_mood(passenger, mood);
            }
            Event::RemoveUpsetPassenger(passenger) => {
                world.remove_upset_passenger(passenger);
            }
            Event::AdvanceTime => on_physics(world.advance_physics()),
            Event::Composite(events) => {
                for event in events {
                    event.apply_observed(world, on_physics);
                }
            }
            Event::Inspect(Inspector(f)) => f(world),
        }
    }
}

fn report(outcome: Option<OutcomeSender>, placed: Option<SimTime>) {
    if let Some(tx) = outcome {
        tx.send(placed);
    }
}
