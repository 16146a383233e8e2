//! `tc-core` — foundational types for the taxi-town simulation.
//!
//! This crate is a dependency of every other `tc-*` crate.  It has no `tc-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `CarId`, `PassengerId`, `NotificationId`, `IdGenerator`   |
//! | [`geo`]     | `Pos` — continuous (row, col) position in world units     |
//! | [`time`]    | `SimTime`, `GameSpeed`, `GameClock`, `SimConfig`          |
//! | [`rng`]     | `SimRng` (seeded `SmallRng` wrapper)                      |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `tc-save`.                                     |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Pos;
pub use ids::{CarId, IdGenerator, NotificationId, PassengerId};
pub use rng::SimRng;
pub use time::{GameClock, GameSpeed, SimConfig, SimTime};
