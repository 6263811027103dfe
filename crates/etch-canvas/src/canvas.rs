//! The canvas: a bounded cursor and the trail it leaves behind.
//!
//! A `Canvas` has a fixed extent (`height` × `width`), a cursor that always
//! sits inside it, and the set of cells the cursor has painted. Moving
//! paints: every cell the cursor steps onto joins the trail, and the trail
//! never shrinks through movement. The starting cell is painted from the
//! moment the canvas exists.
//!
//! # Boundary policy
//!
//! A step that would leave `[0, height) × [0, width)` is refused outright:
//! the cursor stays put, nothing is painted, and the caller gets
//! [`MovementResult::Blocked`]. There is no clamping — the same rule
//! applies at every edge and corner.

use std::collections::HashSet;

use thiserror::Error;

use crate::position::{Coordinate, Delta};

/// What happened when the cursor was asked to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementResult {
    /// The cursor moved from `from` to `to`, and `to` is now painted.
    Moved { from: Coordinate, to: Coordinate },
    /// The step would have left the canvas. Nothing changed.
    Blocked,
}

/// A canvas that can't be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("canvas must be at least 1x1, got {height}x{width}")]
    EmptyCanvas { height: u16, width: u16 },

    #[error("start cell {start} is outside the {height}x{width} canvas")]
    StartOutOfBounds {
        start: Coordinate,
        height: u16,
        width: u16,
    },
}

/// The drawing model: extent, cursor, and painted cells.
#[derive(Debug, Clone)]
pub struct Canvas {
    height: u16,
    width: u16,
    cursor: Coordinate,
    painted: HashSet<Coordinate>,
}

impl Canvas {
    /// A canvas with the cursor at its center, `(height / 2, width / 2)`.
    ///
    /// # Errors
    ///
    /// [`CanvasError::EmptyCanvas`] if either dimension is zero.
    pub fn new(height: u16, width: u16) -> Result<Self, CanvasError> {
        Self::with_start(height, width, Coordinate::new(height / 2, width / 2))
    }

    /// A canvas with the cursor at `start`.
    ///
    /// # Errors
    ///
    /// [`CanvasError::EmptyCanvas`] if either dimension is zero, and
    /// [`CanvasError::StartOutOfBounds`] if `start` isn't on the canvas.
    pub fn with_start(height: u16, width: u16, start: Coordinate) -> Result<Self, CanvasError> {
        if height == 0 || width == 0 {
            return Err(CanvasError::EmptyCanvas { height, width });
        }
        if start.row >= height || start.col >= width {
            return Err(CanvasError::StartOutOfBounds {
                start,
                height,
                width,
            });
        }

        let mut painted = HashSet::new();
        painted.insert(start);
        Ok(Self {
            height,
            width,
            cursor: start,
            painted,
        })
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Where the cursor is now.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Coordinate {
        self.cursor
    }

    /// Whether `coord` lies on the canvas.
    #[inline]
    #[must_use]
    pub const fn contains(&self, coord: Coordinate) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    /// Whether `coord` has been painted.
    #[inline]
    #[must_use]
    pub fn is_painted(&self, coord: Coordinate) -> bool {
        self.painted.contains(&coord)
    }

    /// Number of painted cells (the cursor cell included).
    #[inline]
    #[must_use]
    pub fn painted_len(&self) -> usize {
        self.painted.len()
    }

    /// Every painted cell, in no particular order.
    pub fn painted(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.painted.iter().copied()
    }

    // -- Mutation -----------------------------------------------------------

    /// Step the cursor by `delta`, painting the cell it lands on.
    ///
    /// Returns [`MovementResult::Blocked`] without touching anything if the
    /// destination is off the canvas.
    pub fn apply_movement(&mut self, delta: Delta) -> MovementResult {
        let Some(candidate) = self.cursor.offset(delta).filter(|&c| self.contains(c)) else {
            return MovementResult::Blocked;
        };

        let from = self.cursor;
        self.cursor = candidate;
        self.painted.insert(candidate);
        MovementResult::Moved {
            from,
            to: candidate,
        }
    }

    /// Wipe the trail. The cursor stays where it is and its cell stays
    /// painted.
    ///
    /// Returns the erased cells (everything that was painted except the
    /// cursor cell), sorted row-major so redraws sweep top to bottom.
    pub fn clear(&mut self) -> Vec<Coordinate> {
        let cursor = self.cursor;
        let mut erased: Vec<Coordinate> = self.painted.drain().filter(|&c| c != cursor).collect();
        erased.sort_unstable();
        self.painted.insert(cursor);
        erased
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
