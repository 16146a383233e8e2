//! `tc-save` — saved games for the taxi-town simulation.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`record`] | `SavedGame`, `SavedCity`, `SavedPlayer`, `SavedGrowth`, …    |
//! | [`codec`]  | `SaveCodec` trait, `JsonCodec`                               |
//! | [`store`]  | `capture`, `restore`, `save_to_path`, `load_from_path`       |
//! | [`error`]  | `SaveError`, `SaveResult<T>`                                 |
//!
//! # Usage
//!
//! ```rust,ignore
//! use tc_save::{capture, load_from_path, restore, save_to_path, JsonCodec, SavedGrowth};
//!
//! let game = capture(&world, SavedGrowth::default());
//! save_to_path(&JsonCodec::new(), &game, Path::new("city.json"))?;
//!
//! if let Some(game) = load_from_path(&JsonCodec::new(), Path::new("city.json"))? {
//!     let restored = restore(&game, seed)?;
//! }
//! ```

pub mod codec;
pub mod error;
pub mod record;
pub mod store;


pub use codec::{JsonCodec, SaveCodec};
pub use error::{SaveError, SaveResult};
pub use record::{SavedCar, SavedCity, SavedGame, SavedGrowth, SavedPassenger, SavedPlayer, SAVE_FORMAT_VERSION};
pub use store::{capture, load_from_path, restore, save_to_path, RestoredGame};
