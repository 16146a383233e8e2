//! BFS agent for [`FairSharedQueue`].
//!
//! Same expansion as [`crate::bfs::sequential_path`], split into one step per
//! dequeued cell so many searches can share one drain.  The target predicate
//! receives the queue's shared context, which is where tick-scoped
//! reservations live.

use rustc_hash::FxHashMap;

use crate::bfs::build_path;
use crate::{AgentHandle, CellCoord, FairSharedQueue, Grid, SearchAgent, SharedQueueScope};

/// Per-search state: the grid being searched and a visited map
/// (`cell → predecessor`).
struct PathSearch<'g, T, V, P> {
    grid:      &'g Grid<T>,
    start:     CellCoord,
    visited:   FxHashMap<CellCoord, CellCoord>,
    can_visit: V,
    is_target: P,
}

impl<T, X, V, P> SearchAgent<CellCoord, Vec<CellCoord>, X> for PathSearch<'_, T, V, P>
where
    X: ?Sized,
    V: FnMut(CellCoord, &T) -> bool,
    P: FnMut(CellCoord, &T, &mut X) -> bool,
{
    fn step(
        &mut self,
        scope:  &mut SharedQueueScope<'_, CellCoord, Vec<CellCoord>>,
        shared: &mut X,
        cell:   CellCoord,
    ) {
        if !self.grid.contains(cell) {
            return;
        }
        if (self.is_target)(cell, self.grid.get(cell), shared) {
            scope.finish(build_path(&self.visited, self.start, cell));
            return;
        }
        for next in self.grid.neighbors(cell) {
            if self.visited.contains_key(&next) || !(self.can_visit)(next, self.grid.get(next)) {
                continue;
            }
            self.visited.insert(next, cell);
            scope.enqueue(next);
        }
    }
}

/// Register a BFS from `start` with `queue`.
///
/// After [`FairSharedQueue::execute`], `queue.take(handle)` yields the path
/// (same shape as [`crate::sequential_path`]) or `None` if no reachable cell
/// satisfied `is_target` before the queue drained.
pub fn register_path_search<'a, T, X, V, P>(
    queue:     &mut FairSharedQueue<'a, CellCoord, Vec<CellCoord>, X>,
    grid:      &'a Grid<T>,
    start:     CellCoord,
    can_visit: V,
    is_target: P,
) -> AgentHandle
where
    T: 'a,
    X: ?Sized + 'a,
    V: FnMut(CellCoord, &T) -> bool + 'a,
    P: FnMut(CellCoord, &T, &mut X) -> bool + 'a,
{
    let mut visited = FxHashMap::default();
    visited.insert(start, start);
    queue.register(
        start,
        PathSearch { grid, start, visited, can_visit, is_target },
    )
}
