//! Continuous world positions.
//!
//! Positions are expressed in world units (screen pixels):
//! a tile of size `TILE_SIZE` at `(row, col)` spans
//! `[row * TILE_SIZE, (row + 1) * TILE_SIZE)` vertically.

/// Distances below this are treated as "already there" by [`Pos::step_towards`].
const MIN_STEP: f64 = 0.2;

/// A continuous 2-D position stored as (row, col) in world units.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub row: f32,
    pub col: f32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { row: 0.0, col: 0.0 };

    #[inline]
    pub fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }

    /// Euclidean distance.
    #[inline]
    pub fn dist(self, other: Pos) -> f32 {
        let dr = other.row - self.row;
        let dc = other.col - self.col;
        (dr * dr + dc * dc).sqrt()
    }

    /// Move up to `distance` units towards `target`, never overshooting.
    ///
    /// Returns `self` unchanged when the reachable distance is negligible.
    pub fn step_towards(self, target: Pos, distance: f64) -> Pos {
        let length = self.dist(target) as f64;
        let available = distance.min(length);
        if available < MIN_STEP {
            return self;
        }
        let scale = (available / length) as f32;
        Pos {
            row: self.row + (target.row - self.row) * scale,
            col: self.col + (target.col - self.col) * scale,
        }
    }

    /// Heading from `self` to `target` in degrees, 0° pointing north and
    /// increasing clockwise.
    pub fn heading_to(self, target: Pos) -> f32 {
        let dr = target.row - self.row;
        let dc = target.col - self.col;
        (dr.atan2(dc).to_degrees() + 90.0).rem_euclid(360.0)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.row, self.col)
    }
}
