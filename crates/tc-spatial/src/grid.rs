//! Row-major tile grid.
//!
//! # Data layout
//!
//! Cells are stored in one flat `Vec<T>` in row-major order:
//!
//! ```text
//! index = row * width + col
//! ```
//!
//! Every in-bounds `CellCoord` maps to exactly one index; out-of-bounds
//! lookups go through the `maybe_*` methods, which return `None`.
//!
//! # Continuous positions
//!
//! Each cell is a `unit_size × unit_size` square in world units.
//! [`Grid::nearest_cell`] clamps positions outside the grid onto the edge
//! cells, so a car drifting past the border still resolves to a tile.

use std::fmt;

use tc_core::Pos;

use crate::{SpatialError, SpatialResult};

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Integer (row, col) coordinate of a grid cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Manhattan (hop) distance.
    #[inline]
    pub fn manhattan(self, other: CellCoord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// A fixed-size `height × width` grid of cells of type `T`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width:     u32,
    height:    u32,
    unit_size: f32,
    cells:     Vec<T>,
}

impl<T> Grid<T> {
    /// Wrap an existing row-major cell list.
    pub fn new(width: u32, height: u32, unit_size: f32, cells: Vec<T>) -> SpatialResult<Self> {
        if unit_size.is_nan() || unit_size <= 0.0 {
            return Err(SpatialError::BadUnitSize(unit_size));
        }
        let expected = width as usize * height as usize;
        if expected == 0 || cells.len() != expected {
            return Err(SpatialError::CellCountMismatch {
                width,
                height,
                expected,
                got: cells.len(),
            });
        }
        Ok(Self { width, height, unit_size, cells })
    }

    /// Build a grid by calling `f` once per cell in row-major order.
    pub fn from_fn<F>(width: u32, height: u32, unit_size: f32, mut f: F) -> SpatialResult<Self>
    where
        F: FnMut(CellCoord) -> T,
    {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                cells.push(f(CellCoord::new(row, col)));
            }
        }
        Self::new(width, height, unit_size, cells)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn unit_size(&self) -> f32 {
        self.unit_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of every cell.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    // ── Indexing ──────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Flat index for a possibly out-of-range coordinate.
    pub fn maybe_index_of(&self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || row >= self.height as i64 {
            return None;
        }
        if col < 0 || col >= self.width as i64 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    /// Flat index of an in-bounds cell.
    ///
    /// # Panics
    /// Panics if `cell` is outside the grid.
    #[inline]
    pub fn index_of(&self, cell: CellCoord) -> usize {
        assert!(self.contains(cell), "cell {cell} outside {}x{} grid", self.width, self.height);
        cell.row as usize * self.width as usize + cell.col as usize
    }

    #[inline]
    pub fn coord_of(&self, index: usize) -> CellCoord {
        let width = self.width as usize;
        CellCoord::new((index / width) as u32, (index % width) as u32)
    }

    /// # Panics
    /// Panics if `cell` is outside the grid.
    #[inline]
    pub fn get(&self, cell: CellCoord) -> &T {
        &self.cells[self.index_of(cell)]
    }

    /// # Panics
    /// Panics if `cell` is outside the grid.
    #[inline]
    pub fn get_mut(&mut self, cell: CellCoord) -> &mut T {
        let index = self.index_of(cell);
        &mut self.cells[index]
    }

    pub fn maybe_get(&self, row: i64, col: i64) -> Option<&T> {
        self.maybe_index_of(row, col).map(|i| &self.cells[i])
    }

    pub fn try_get(&self, cell: CellCoord) -> SpatialResult<&T> {
        if self.contains(cell) {
            Ok(self.get(cell))
        } else {
            Err(SpatialError::OutOfBounds(cell))
        }
    }

    // ── Continuous positions ──────────────────────────────────────────────

    /// The cell containing `pos`, clamping positions outside the grid onto
    /// the nearest edge cell.
    pub fn nearest_cell(&self, pos: Pos) -> CellCoord {
        CellCoord::new(
            clamp_axis(pos.row, self.unit_size, self.height),
            clamp_axis(pos.col, self.unit_size, self.width),
        )
    }

    /// The cell containing `pos`, or `None` when `pos` lies outside the grid.
    pub fn nearest_cell_if_in_bounds(&self, pos: Pos) -> Option<CellCoord> {
        let row = (pos.row / self.unit_size).floor();
        let col = (pos.col / self.unit_size).floor();
        if !row.is_finite() || !col.is_finite() {
            return None;
        }
        let index = self.maybe_index_of(row as i64, col as i64)?;
        Some(self.coord_of(index))
    }

    /// World-space center of `cell`.
    #[inline]
    pub fn center_of(&self, cell: CellCoord) -> Pos {
        Pos::new(
            cell.row as f32 * self.unit_size + self.unit_size / 2.0,
            cell.col as f32 * self.unit_size + self.unit_size / 2.0,
        )
    }

    // ── Neighbourhood ─────────────────────────────────────────────────────

    /// In-bounds orthogonal neighbours of `cell`, always in the order
    /// north, west, south, east.  BFS determinism depends on this order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        let (w, h) = (self.width, self.height);
        let north = cell.row.checked_sub(1).map(|r| CellCoord::new(r, cell.col));
        let west = cell.col.checked_sub(1).map(|c| CellCoord::new(cell.row, c));
        let south = (cell.row + 1 < h).then(|| CellCoord::new(cell.row + 1, cell.col));
        let east = (cell.col + 1 < w).then(|| CellCoord::new(cell.row, cell.col + 1));
        [north, west, south, east].into_iter().flatten()
    }

    /// `(coord, &cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> {
        self.cells.iter().enumerate().map(|(i, c)| (self.coord_of(i), c))
    }

    /// Build a same-shaped grid by mapping every cell.
    pub fn map<U, F>(&self, mut f: F) -> Grid<U>
    where
        F: FnMut(CellCoord, &T) -> U,
    {
        Grid {
            width:     self.width,
            height:    self.height,
            unit_size: self.unit_size,
            cells:     self.iter().map(|(coord, cell)| f(coord, cell)).collect(),
        }
    }
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(width: u32, height: u32, unit_size: f32, value: T) -> SpatialResult<Self> {
        Self::from_fn(width, height, unit_size, |_| value.clone())
    }

    /// Copy into a larger grid.  Existing cells keep their coordinates; new
    /// cells come from `fill`.
    pub fn expanded<F>(&self, width: u32, height: u32, mut fill: F) -> SpatialResult<Grid<T>>
    where
        F: FnMut(CellCoord) -> T,
    {
        if width < self.width || height < self.height {
            return Err(SpatialError::Shrink {
                from_w: self.width,
                from_h: self.height,
                to_w:   width,
                to_h:   height,
            });
        }
        Grid::from_fn(width, height, self.unit_size, |coord| {
            if self.contains(coord) {
                self.get(coord).clone()
            } else {
                fill(coord)
            }
        })
    }
}

/// Clamp a continuous coordinate onto `[0, cells - 1]`.
fn clamp_axis(value: f32, unit_size: f32, cells: u32) -> u32 {
    let cell = (value / unit_size).floor();
    if cell.is_nan() || cell <= 0.0 {
        0
    } else if cell >= (cells - 1) as f32 {
        cells - 1
    } else {
        cell as u32
    }
}
