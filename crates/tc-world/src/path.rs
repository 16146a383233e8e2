//! Waypoint paths followed by cars.

use tc_core::Pos;

/// A waypoint counts as reached once the car is within this distance.
pub const CLOSE_ENOUGH: f32 = 1.0;

/// An ordered list of world positions plus a cursor to the next one.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<Pos>,
    index:     usize,
}

impl Path {
    pub fn new(waypoints: Vec<Pos>) -> Self {
        Self { waypoints, index: 0 }
    }

    /// The waypoint to head for from `pos`.
    ///
    /// Reaching a waypoint advances the cursor but still returns the reached
    /// waypoint once, so the caller can settle exactly on it.  `None` once
    /// every waypoint has been reached.
    pub fn target(&mut self, pos: Pos) -> Option<Pos> {
        let target = *self.waypoints.get(self.index)?;
        if target.dist(pos) <= CLOSE_ENOUGH {
            self.index += 1;
        }
        Some(target)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.index >= self.waypoints.len()
    }

    #[inline]
    pub fn waypoints(&self) -> &[Pos] {
        &self.waypoints
    }

    /// Waypoints not yet reached.
    #[inline]
    pub fn remaining(&self) -> &[Pos] {
        &self.waypoints[self.index.min(self.waypoints.len())..]
    }

    /// Final waypoint, if any.
    pub fn destination(&self) -> Option<Pos> {
        self.waypoints.last().copied()
    }
}
