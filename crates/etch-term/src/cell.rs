// SPDX-License-Identifier: MIT
//
// A single terminal cell: one character and the pen it was drawn with.
//
// The sketch never draws wide characters or text attributes, so a cell is
// just a `char` plus a `Pen`. `MemorySurface` stores a grid of these and
// `CellWriter` turns them into escape sequences.

use crate::color::Pen;

/// One character cell on a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Character to display. A space for an empty cell.
    pub ch: char,
    /// Foreground/background colors.
    pub pen: Pen,
}

impl Cell {
    /// An empty cell: space, terminal default colors.
    pub const EMPTY: Self = Self {
        ch: ' ',
        pen: Pen::PLAIN,
    };

    #[inline]
    #[must_use]
    pub const fn new(ch: char, pen: Pen) -> Self {
        Self { ch, pen }
    }

    /// Whether this cell looks blank: a space in the default colors.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CellColor;

    #[test]
    fn empty_is_space_with_plain_pen() {
        assert_eq!(Cell::EMPTY.ch, ' ');
        assert_eq!(Cell::EMPTY.pen, Pen::PLAIN);
        assert!(Cell::EMPTY.is_empty());
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(Cell::default(), Cell::EMPTY);
    }

    #[test]
    fn colored_space_is_not_empty() {
        let cell = Cell::new(' ', Pen::new(CellColor::Default, CellColor::BLUE));
        assert!(!cell.is_empty());
    }

    #[test]
    fn glyph_is_not_empty() {
        assert!(!Cell::new('#', Pen::PLAIN).is_empty());
    }
}
