//! Sequential breadth-first search over a [`Grid`].
//!
//! This is the reference implementation: [`crate::search`] runs the same
//! expansion as an agent of a shared fair queue and must agree with it on hop
//! length for a lone search.
//!
//! # Path shape
//!
//! The returned path lists cells from the first step to the target,
//! excluding `start`.  When `start` itself satisfies the target predicate the
//! path is `[start]`, a zero-hop path that still names the cell to drive to.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::{CellCoord, Grid};

/// Run a BFS from `start` and return a hop-shortest path to the first cell
/// (in BFS order) for which `is_target` holds.
///
/// `can_visit` gates expansion into a neighbour; it is never consulted for
/// `start`.  Returns `None` when no reachable cell satisfies `is_target`, or
/// when `start` is outside the grid.
pub fn sequential_path<T, V, P>(
    grid:          &Grid<T>,
    start:         CellCoord,
    mut can_visit: V,
    mut is_target: P,
) -> Option<Vec<CellCoord>>
where
    V: FnMut(CellCoord, &T) -> bool,
    P: FnMut(CellCoord, &T) -> bool,
{
    if !grid.contains(start) {
        return None;
    }

    // visited[cell] = predecessor; start maps to itself.
    let mut visited: FxHashMap<CellCoord, CellCoord> = FxHashMap::default();
    let mut queue = VecDeque::new();
    visited.insert(start, start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if is_target(cell, grid.get(cell)) {
            return Some(build_path(&visited, start, cell));
        }
        for next in grid.neighbors(cell) {
            if visited.contains_key(&next) || !can_visit(next, grid.get(next)) {
                continue;
            }
            visited.insert(next, cell);
            queue.push_back(next);
        }
    }
    None
}

/// Walk predecessors back from `target` and return the forward path,
/// excluding `start` (see module docs for the `start == target` case).
pub(crate) fn build_path(
    visited: &FxHashMap<CellCoord, CellCoord>,
    start:   CellCoord,
    target:  CellCoord,
) -> Vec<CellCoord> {
    let mut cells = vec![target];
    let mut current = target;
    loop {
        match visited.get(&current) {
            Some(&prev) if prev != current && prev != start => {
                cells.push(prev);
                current = prev;
            }
            _ => break,
        }
    }
    cells.reverse();
    cells
}
