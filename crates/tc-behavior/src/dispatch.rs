//! Taxi dispatch: every car searches for work in one shared fair drain.
//!
//! # Per-tick algorithm
//!
//! ```text
//! phase 1  one FairSharedQueue, reservation set X = ∅
//!          car carrying a passenger → BFS to that passenger's destination
//!          free car, passengers waiting → BFS to the first tile with a
//!                                         waiting passenger not yet in X
//!                                         (claiming it inserts into X)
//!          execute()
//! phase 2  second queue for every free car that found nothing and is
//!          away from its station → BFS back to the station
//!          execute()
//! result   path found → SetPath, otherwise → ClearPath
//! ```
//!
//! The reservation set is plain data owned by this tick's drain; the
//! queue's single-threaded FIFO order is what makes claiming race-free, and
//! earlier cars in the snapshot win ties for equally distant passengers.

use rustc_hash::FxHashSet;
use tracing::trace;

use tc_spatial::{register_path_search, AgentHandle, CellCoord, FairSharedQueue};

use crate::snapshot::TileSnapshot;
use crate::{AiSystem, Event, Snapshot};

type Reserved = FxHashSet<CellCoord>;

/// Car AI.  Stateless between ticks.
#[derive(Copy, Clone, Debug, Default)]
pub struct TaxiDispatch;

impl TaxiDispatch {
    pub fn new() -> Self {
        Self
    }

    /// Plan every car and return one `SetPath` or `ClearPath` per car, in
    /// snapshot order.
    pub fn plan(&self, snapshot: &Snapshot) -> Vec<Event> {
        let cars = &snapshot.cars;
        if cars.is_empty() {
            return Vec::new();
        }
        let grid = &snapshot.grid;
        let can_visit = |_: CellCoord, tile: &TileSnapshot| tile.content.can_car_go();
        let starts: Vec<CellCoord> = cars.iter().map(|c| grid.nearest_cell(c.pos)).collect();

        // Phase 1: committed deliveries and passenger claims.
        let mut paths: Vec<Option<Vec<CellCoord>>> = vec![None; cars.len()];
        let mut reserved = Reserved::default();
        {
            let mut queue: FairSharedQueue<'_, CellCoord, Vec<CellCoord>, Reserved> = FairSharedQueue::new();
            let mut handles: Vec<(usize, AgentHandle)> = Vec::with_capacity(cars.len());
            for (i, car) in cars.iter().enumerate() {
                let handle = match car.committed_target {
                    Some(target) => register_path_search(
                        &mut queue,
                        grid,
                        starts[i],
                        can_visit,
                        move |c, _, _: &mut Reserved| c == target,
                    ),
                    None if snapshot.has_waiting_passengers() => register_path_search(
                        &mut queue,
                        grid,
                        starts[i],
                        can_visit,
                        |c, tile: &TileSnapshot, reserved: &mut Reserved| {
                            tile.has_passenger() && reserved.insert(c)
                        },
                    ),
                    None => continue,
                };
                handles.push((i, handle));
            }
            let steps = queue.execute(&mut reserved);
            trace!(searches = handles.len(), steps, claimed = reserved.len(), "dispatch phase 1");
            for (i, handle) in handles {
                paths[i] = queue.take(handle);
            }
        }

        // Phase 2: idle cars away from home drive back.
        {
            let mut queue: FairSharedQueue<'_, CellCoord, Vec<CellCoord>, ()> = FairSharedQueue::new();
            let mut handles: Vec<(usize, AgentHandle)> = Vec::new();
            for (i, car) in cars.iter().enumerate() {
                if paths[i].is_some() || car.committed_target.is_some() || starts[i] == car.base {
                    continue;
                }
                let base = car.base;
                let handle = register_path_search(&mut queue, grid, starts[i], can_visit, move |c, _, _: &mut ()| c == base);
                handles.push((i, handle));
            }
            if !handles.is_empty() {
                let steps = queue.execute(&mut ());
                trace!(searches = handles.len(), steps, "dispatch phase 2");
                for (i, handle) in handles {
                    paths[i] = queue.take(handle);
                }
            }
        }

        cars.iter()
            .zip(paths)
            .map(|(car, path)| match path {
                Some(path) => Event::SetPath { car: car.id, path },
                None => Event::ClearPath(car.id),
            })
            .collect()
    }
}

impl AiSystem for TaxiDispatch {
    fn name(&self) -> &'static str {
        "taxi_dispatch"
    }

    fn decide(&mut self, snapshot: &Snapshot) -> Vec<Event> {
        self.plan(snapshot)
    }
}
