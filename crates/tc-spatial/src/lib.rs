//! `tc-spatial` — tile grid, breadth-first search, and fair multi-agent search.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`grid`]       | `Grid<T>`, `CellCoord` — row-major cells + nearest lookup  |
//! | [`bfs`]        | `sequential_path` — single-search reference BFS            |
//! | [`fair_queue`] | `FairSharedQueue`, `SharedQueueScope`, `SearchAgent`       |
//! | [`search`]     | `register_path_search` — BFS agent driven by the queue     |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Sequential vs. fair search
//!
//! [`bfs::sequential_path`] runs one search to completion and is the
//! correctness reference.  [`search::register_path_search`] runs the same
//! expansion as an agent of a [`FairSharedQueue`], so many searches advance
//! interleaved, one frontier entry at a time, in FIFO order.  A single agent
//! alone in a queue finds a path of the same hop length as the reference.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `CellCoord`.            |

pub mod bfs;
pub mod error;
pub mod fair_queue;
pub mod grid;
pub mod search;


pub use bfs::sequential_path;
pub use error::{SpatialError, SpatialResult};
pub use fair_queue::{AgentHandle, FairSharedQueue, SearchAgent, SharedQueueScope};
pub use grid::{CellCoord, Grid};
pub use search::register_path_search;
