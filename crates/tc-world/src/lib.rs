//! `tc-world` — the mutable game world.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`tile`]         | `TileContent` — grass, road, house, business, station     |
//! | [`path`]         | `Path` — waypoint list followed by a car                  |
//! | [`car`]          | `Car` — taxi state and per-tick movement                  |
//! | [`passenger`]    | `Passenger`, `Mood`                                       |
//! | [`player`]       | `Player` — money, delivered/missed counters, prices       |
//! | [`notification`] | `Notifications` — money made/lost messages                |
//! | [`world`]        | `World`, `WorldConfig`, `PhysicsReport`                   |
//! | [`error`]        | `WorldError`, `WorldResult<T>`                            |
//!
//! # Failure model
//!
//! Gameplay operations never return `Err`.  A placement on an occupied tile,
//! an unaffordable purchase, or a lookup of a vanished entity is a no-op
//! reported as `false`/`None`.  `WorldResult` is reserved for building a
//! world from external data (configs, saved games).
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `WorldConfig`,          |
//! |         | `TileContent`, and `Mood`.                                   |

pub mod car;
pub mod error;
pub mod notification;
pub mod passenger;
pub mod path;
pub mod player;
pub mod tile;
pub mod world;

#[cfg(test)]
mod tests;

pub use car::{Car, CAR_SPEED_PER_MINUTE};
pub use error::{WorldError, WorldResult};
pub use notification::{Notification, NotificationKind, Notifications};
pub use passenger::{Mood, Passenger};
pub use path::Path;
pub use player::Player;
pub use tile::TileContent;
pub use world::{Delivery, PhysicsReport, World, WorldConfig, TILE_SIZE};
