// SPDX-License-Identifier: MIT
//
// Screen layout: where the help line, the border, and the canvas go.
//
//   ┌──────────────────────────────┐
//   │ help line                    │  ← row 0 (optional)
//   ├──────────────────────────────┤
//   │ +--------------------------+ │  ← border (optional)
//   │ |         canvas           | │
//   │ +--------------------------+ │
//   └──────────────────────────────┘
//
// The canvas is anchored top-left under the help line. Canvas coordinates
// are canvas-local; `to_screen` adds the origin. Nothing else in the
// program does that arithmetic.

use etch_canvas::Coordinate;
use etch_term::terminal::Size;
use tracing::warn;

use crate::error::EtchError;

/// Computed placement of every screen region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// The help line's row, if shown.
    pub help_row: Option<u16>,
    /// Whether a box is drawn around the canvas.
    pub border: bool,
    /// Screen cell of canvas `(0, 0)`.
    pub origin: (u16, u16),
    /// Canvas rows.
    pub height: u16,
    /// Canvas columns.
    pub width: u16,
}

impl Layout {
    /// Fit a canvas onto a `screen`-sized surface.
    ///
    /// `requested` is `(height, width)`; `None` takes all the room there is.
    /// Requests bigger than the viewport are clamped.
    ///
    /// # Errors
    ///
    /// [`EtchError::Config`] when the help line and border leave no room
    /// for even a single canvas cell.
    pub fn compute(
        screen: Size,
        help: bool,
        border: bool,
        requested: (Option<u16>, Option<u16>),
    ) -> Result<Self, EtchError> {
        let top = u16::from(help);
        let frame = if border { 2 } else { 0 };

        let avail_rows = screen.rows.saturating_sub(top + frame);
        let avail_cols = screen.cols.saturating_sub(frame);
        if avail_rows == 0 || avail_cols == 0 {
            return Err(EtchError::Config(format!(
                "a {}x{} terminal leaves no room for the canvas",
                screen.rows, screen.cols
            )));
        }

        let height = clamp("height", requested.0, avail_rows);
        let width = clamp("width", requested.1, avail_cols);
        let inset = u16::from(border);

        Ok(Self {
            help_row: help.then_some(0),
            border,
            origin: (top + inset, inset),
            height,
            width,
        })
    }

    /// Screen cell of a canvas coordinate.
    #[inline]
    #[must_use]
    pub const fn to_screen(&self, coord: Coordinate) -> (u16, u16) {
        (self.origin.0 + coord.row, self.origin.1 + coord.col)
    }

    /// Screen rectangle of the border box as `(top, left, bottom, right)`,
    /// inclusive. `None` without a border.
    #[must_use]
    pub const fn border_rect(&self) -> Option<(u16, u16, u16, u16)> {
        if !self.border {
            return None;
        }
        let top = self.origin.0 - 1;
        let left = self.origin.1 - 1;
        Some((top, left, self.origin.0 + self.height, self.origin.1 + self.width))
    }
}

fn clamp(what: &str, requested: Option<u16>, available: u16) -> u16 {
    match requested {
        Some(n) if n > available => {
            warn!(requested = n, available, "canvas {what} clamped to the viewport");
            available
        }
        Some(n) => n,
        None => available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_screen_with_help_and_border() {
        let l = Layout::compute(Size::new(24, 80), true, true, (None, None)).unwrap();
        assert_eq!(l.help_row, Some(0));
        assert_eq!(l.origin, (2, 1));
        assert_eq!((l.height, l.width), (21, 78));
        assert_eq!(l.border_rect(), Some((1, 0, 23, 79)));
    }

    #[test]
    fn bare_canvas_fills_the_screen() {
        let l = Layout::compute(Size::new(24, 80), false, false, (None, None)).unwrap();
        assert_eq!(l.help_row, None);
        assert_eq!(l.origin, (0, 0));
        assert_eq!((l.height, l.width), (24, 80));
        assert_eq!(l.border_rect(), None);
    }

    #[test]
    fn help_without_border() {
        let l = Layout::compute(Size::new(10, 10), true, false, (None, None)).unwrap();
        assert_eq!(l.origin, (1, 0));
        assert_eq!((l.height, l.width), (9, 10));
    }

    #[test]
    fn requested_size_is_honored() {
        let l = Layout::compute(Size::new(24, 80), true, true, (Some(10), Some(20))).unwrap();
        assert_eq!((l.height, l.width), (10, 20));
        assert_eq!(l.border_rect(), Some((1, 0, 12, 21)));
    }

    #[test]
    fn oversized_request_is_clamped() {
        let l = Layout::compute(Size::new(24, 80), true, true, (Some(500), Some(500))).unwrap();
        assert_eq!((l.height, l.width), (21, 78));
    }

    #[test]
    fn too_small_is_a_config_error() {
        let err = Layout::compute(Size::new(3, 80), true, true, (None, None)).unwrap_err();
        assert!(matches!(err, EtchError::Config(_)));
        assert!(Layout::compute(Size::new(3, 2), false, true, (None, None)).is_err());
    }

    #[test]
    fn smallest_possible_canvas() {
        let l = Layout::compute(Size::new(4, 3), true, true, (None, None)).unwrap();
        assert_eq!((l.height, l.width), (1, 1));
    }

    #[test]
    fn to_screen_adds_origin() {
        let l = Layout::compute(Size::new(24, 80), true, true, (None, None)).unwrap();
        assert_eq!(l.to_screen(Coordinate::new(0, 0)), (2, 1));
        assert_eq!(l.to_screen(Coordinate::new(20, 77)), (22, 78));
    }

    #[test]
    fn canvas_stays_inside_the_border() {
        let l = Layout::compute(Size::new(12, 30), true, true, (None, None)).unwrap();
        let (top, left, bottom, right) = l.border_rect().unwrap();
        let far = l.to_screen(Coordinate::new(l.height - 1, l.width - 1));
        assert!(far.0 < bottom && far.1 < right);
        let near = l.to_screen(Coordinate::new(0, 0));
        assert!(near.0 > top && near.1 > left);
        assert!(bottom < 12 && right < 30);
    }
}
