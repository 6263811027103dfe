//! Canvas coordinates and unit movement steps.
//!
//! All coordinates are **0-indexed** and canvas-local: `(0, 0)` is the
//! top-left drawable cell, whatever the screen offset of the canvas is.
//! Translating to screen cells is the renderer's job, never this module's.

use std::fmt;

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// A cell on the canvas: (row, col), both 0-indexed.
///
/// # Ordering
///
/// Row first, then column — the order cells appear when reading the screen.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: u16,
    pub col: u16,
}

impl Coordinate {
    #[inline]
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Step by `delta`. `None` if the step would leave the `u16` range
    /// (i.e. go above row 0 or left of column 0).
    ///
    /// This knows nothing about the canvas extent; the canvas checks the
    /// upper bounds itself.
    #[inline]
    #[must_use]
    pub fn offset(self, delta: Delta) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(i16::from(delta.d_row))?,
            col: self.col.checked_add_signed(i16::from(delta.d_col))?,
        })
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, col {}", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Delta
// ---------------------------------------------------------------------------

/// A single cursor step: each axis moves by -1, 0, or +1.
///
/// The fields are private so a `Delta` can never be larger than one cell:
/// the direction constants are the only way to get one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delta {
    d_row: i8,
    d_col: i8,
}

impl Delta {
    pub const UP: Self = Self { d_row: -1, d_col: 0 };
    pub const DOWN: Self = Self { d_row: 1, d_col: 0 };
    pub const LEFT: Self = Self { d_row: 0, d_col: -1 };
    pub const RIGHT: Self = Self { d_row: 0, d_col: 1 };

    pub const UP_LEFT: Self = Self { d_row: -1, d_col: -1 };
    pub const UP_RIGHT: Self = Self { d_row: -1, d_col: 1 };
    pub const DOWN_LEFT: Self = Self { d_row: 1, d_col: -1 };
    pub const DOWN_RIGHT: Self = Self { d_row: 1, d_col: 1 };
}

impl fmt::Debug for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Δ({:+}, {:+})", self.d_row, self.d_col)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
