//! `tc-behavior` — world events and the AI systems that produce them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`event`]    | `Event`, outcome channel, `Inspector`                         |
//! | [`snapshot`] | `Snapshot` — immutable per-AI-tick copy of the world          |
//! | [`model`]    | `AiSystem` trait                                              |
//! | [`dispatch`] | `TaxiDispatch` — car AI over a shared fair search queue       |
//! | [`growth`]   | `CityGrowth`, `DurationConstraint`, `GrowthConfig`            |
//! | [`noop`]     | `NoopAi` — placeholder that never produces events             |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! The slow (AI) tick in tc-sim works as follows:
//!
//! 1. **Capture**: the world's single event consumer builds a [`Snapshot`]
//!    between two events and hands it out.
//!
//! 2. **Decide** (off the consumer): every [`AiSystem`] reads the snapshot
//!    and returns `Vec<Event>`.  Nothing here touches the live world.
//!
//! 3. **Apply**: the events go back through the queue and are applied in
//!    arrival order.  Growth events report success through their outcome
//!    channel, which the emitting rate limiter polls on later ticks.
//!
//! Decisions may therefore act on a world that has moved a few physics ticks
//! since capture; every `World` method tolerates stale ids and occupied
//! tiles by doing nothing.

pub mod dispatch;
pub mod error;
pub mod event;
pub mod growth;
pub mod model;
pub mod noop;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use dispatch::TaxiDispatch;
pub use error::{BehaviorError, BehaviorResult};
pub use event::{outcome_channel, Event, Inspector, OutcomeSender, OutcomeState, PendingOutcome};
pub use growth::{CityGrowth, DurationConstraint, GrowthConfig};
pub use model::AiSystem;
pub use noop::NoopAi;
pub use snapshot::{CarSnapshot, PassengerSnapshot, Snapshot, TileSnapshot};
