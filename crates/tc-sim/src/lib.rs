//! `tc-sim` — drivers for the taxi-town simulation.
//!
//! # Two ways to run a world
//!
//! ```text
//! Sim (synchronous, deterministic)        GameLoop (tokio, real time)
//!   for tick in 0..n:                       physics timer ─┐
//!     ① apply AdvanceTime                   AI timer ──────┼─► mpsc ─► consumer
//!     ② every k ticks:                      add_event ─────┘           │
//!          Snapshot → AI → apply events                                ▼
//!                                                          watch<Arc<WorldView>>
//! ```
//!
//! Both apply the same [`Event`][tc_behavior::Event]s to the same
//! [`World`][tc_world::World] through one writer, and both run car dispatch
//! plus city growth ([`AiRunner`]) on an immutable snapshot.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Car dispatch and city growth decide concurrently (Rayon).  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tc_sim::SimBuilder;
//!
//! let handle = SimBuilder::new(config).world(town).build_loop()?.spawn();
//! handle.add_event(Event::SetGameSpeed(GameSpeed::Fast))?;
//! tokio::time::sleep(Duration::from_secs(5)).await;
//! let stopped = handle.shutdown().await?;
//! tc_save::save_to_path(&JsonCodec::new(), &stopped.save(), path)?;
//! ```

pub mod ai;
pub mod builder;
pub mod error;
pub mod game_loop;
pub mod observer;
pub mod sim;
pub mod view;


pub use ai::AiRunner;
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use game_loop::{GameHandle, GameLoop, StoppedGame};
pub use observer::{NoopObserver, WorldObserver};
pub use sim::Sim;
pub use view::{CarView, PassengerView, WorldView};
