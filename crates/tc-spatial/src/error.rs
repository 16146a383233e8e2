//! Spatial-subsystem error type.

use thiserror::Error;

use crate::CellCoord;

/// Errors produced by `tc-spatial`.
#[derive(Debug, Error, PartialEq)]
pub enum SpatialError {
    #[error("grid {width}x{height} needs {expected} cells, got {got}")]
    CellCountMismatch {
        width:    u32,
        height:   u32,
        expected: usize,
        got:      usize,
    },

    #[error("cell {0} is outside the grid")]
    OutOfBounds(CellCoord),

    #[error("unit size must be positive, got {0}")]
    BadUnitSize(f32),

    #[error("cannot shrink grid from {from_w}x{from_h} to {to_w}x{to_h}")]
    Shrink {
        from_w: u32,
        from_h: u32,
        to_w:   u32,
        to_h:   u32,
    },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
