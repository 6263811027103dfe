// SPDX-License-Identifier: MIT
//
// Display surfaces — where the sketch draws.
//
// The render loop never talks to stdout directly. It draws cells into a
// `DisplaySurface` and flushes once per keystroke. Two implementations:
//
//   TerminalSurface — encodes cells as ANSI through a `CellWriter` into an
//   `OutputBuffer`, and writes the buffer to its sink on `flush`. The sink
//   is stdout in a real session, a `Vec<u8>` in tests.
//
//   MemorySurface — a plain grid of `Cell`s. Lets tests assert on exactly
//   what's on screen without a terminal attached.
//
// Both bound-check every draw. An out-of-bounds draw is an error, never a
// silent clip: the sketch's own bounds checks should make it impossible,
// so if one happens the caller needs to know.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::cell::Cell;
use crate::color::Pen;
use crate::error::SurfaceError;
use crate::output::{CellWriter, OutputBuffer};
use crate::terminal::Size;

// ─── DisplaySurface ─────────────────────────────────────────────────────────

/// A rectangular grid of character cells that can be drawn on.
pub trait DisplaySurface {
    /// Surface dimensions.
    fn size(&self) -> Size;

    /// Blank every cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be written.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Draw one character at `(row, col)` with `pen`.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::OutOfBounds`] if `(row, col)` is off the surface.
    fn draw_cell(&mut self, row: u16, col: u16, ch: char, pen: Pen) -> Result<(), SurfaceError>;

    /// Push everything drawn so far to the screen.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output fails.
    fn flush(&mut self) -> Result<(), SurfaceError>;

    /// Draw `text` left-to-right starting at `(row, col)`, one cell per
    /// character, stopping at the right edge. Returns the number of cells
    /// drawn.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::OutOfBounds`] if the starting cell is off the surface.
    fn draw_text(&mut self, row: u16, col: u16, text: &str, pen: Pen) -> Result<u16, SurfaceError> {
        let size = self.size();
        if !size.contains(row, col) {
            return Err(SurfaceError::OutOfBounds { row, col, size });
        }

        let mut x = col;
        for ch in text.chars() {
            // Skip zero-width and wide characters: one char, one cell.
            if ch.width() != Some(1) {
                continue;
            }
            if x >= size.cols {
                break;
            }
            self.draw_cell(row, x, ch, pen)?;
            x += 1;
        }
        Ok(x - col)
    }
}

// ─── TerminalSurface ────────────────────────────────────────────────────────

/// A surface backed by a terminal speaking ANSI.
///
/// Draw calls only encode into memory; [`flush`](DisplaySurface::flush)
/// wraps the pending bytes in synchronized-output markers and writes them
/// in one go.
pub struct TerminalSurface<W: Write> {
    out: W,
    buf: OutputBuffer,
    writer: CellWriter,
    size: Size,
}

impl TerminalSurface<io::Stdout> {
    /// A surface drawing to this process's stdout.
    #[must_use]
    pub fn stdout(size: Size) -> Self {
        Self::new(io::stdout(), size)
    }
}

impl<W: Write> TerminalSurface<W> {
    #[must_use]
    pub fn new(out: W, size: Size) -> Self {
        Self {
            out,
            buf: OutputBuffer::new(),
            writer: CellWriter::new(),
            size,
        }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        ansi::reset(&mut self.buf)?;
        ansi::clear_screen(&mut self.buf)?;
        self.writer.reset_state();
        Ok(())
    }

    fn draw_cell(&mut self, row: u16, col: u16, ch: char, pen: Pen) -> Result<(), SurfaceError> {
        if !self.size.contains(row, col) {
            return Err(SurfaceError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        self.writer.render_cell(&mut self.buf, row, col, &Cell::new(ch, pen));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let mut frame = OutputBuffer::new();
        ansi::begin_sync(&mut frame)?;
        frame.write_all(self.buf.as_bytes())?;
        ansi::end_sync(&mut frame)?;
        frame.flush_to(&mut self.out)?;
        self.buf.clear();
        Ok(())
    }
}

// ─── MemorySurface ──────────────────────────────────────────────────────────

/// An in-memory surface: a row-major grid of cells.
///
/// Also counts draw calls and flushes so tests can check that a no-op
/// keystroke really drew nothing.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    size: Size,
    cells: Vec<Cell>,
    draws: usize,
    flushes: usize,
}

impl MemorySurface {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::EMPTY; size.area() as usize],
            draws: 0,
            flushes: 0,
        }
    }

    /// The cell at `(row, col)`, or `None` off the surface.
    #[must_use]
    pub fn cell(&self, row: u16, col: u16) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// The characters of one row as a `String`.
    #[must_use]
    pub fn row_text(&self, row: u16) -> Option<String> {
        if row >= self.size.rows {
            return None;
        }
        let start = usize::from(row) * usize::from(self.size.cols);
        Some(
            self.cells[start..start + usize::from(self.size.cols)]
                .iter()
                .map(|c| c.ch)
                .collect(),
        )
    }

    /// Every non-empty cell as `(row, col, cell)`, in row-major order.
    pub fn painted(&self) -> impl Iterator<Item = (u16, u16, Cell)> + '_ {
        let cols = usize::from(self.size.cols.max(1));
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(move |(i, c)| {
                #[allow(clippy::cast_possible_truncation)] // i < rows × cols.
                let (row, col) = ((i / cols) as u16, (i % cols) as u16);
                (row, col, *c)
            })
    }

    /// Total `draw_cell` calls that succeeded.
    #[must_use]
    pub const fn draw_count(&self) -> usize {
        self.draws
    }

    /// Total `flush` calls.
    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    fn index(&self, row: u16, col: u16) -> Option<usize> {
        self.size
            .contains(row, col)
            .then(|| usize::from(row) * usize::from(self.size.cols) + usize::from(col))
    }
}

impl DisplaySurface for MemorySurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.cells.fill(Cell::EMPTY);
        Ok(())
    }

    fn draw_cell(&mut self, row: u16, col: u16, ch: char, pen: Pen) -> Result<(), SurfaceError> {
        let i = self.index(row, col).ok_or(SurfaceError::OutOfBounds {
            row,
            col,
            size: self.size,
        })?;
        self.cells[i] = Cell::new(ch, pen);
        self.draws += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        self.flushes += 1;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::CellColor;
    use pretty_assertions::assert_eq;

    const TRAIL: Pen = Pen::new(CellColor::WHITE, CellColor::BLUE);

    // ── MemorySurface ───────────────────────────────────────────────────

    #[test]
    fn memory_starts_blank() {
        let s = MemorySurface::new(Size::new(3, 4));
        assert_eq!(s.painted().count(), 0);
        assert_eq!(s.row_text(0).as_deref(), Some("    "));
    }

    #[test]
    fn memory_draw_and_read_back() {
        let mut s = MemorySurface::new(Size::new(3, 4));
        s.draw_cell(1, 2, '#', TRAIL).unwrap();
        assert_eq!(s.cell(1, 2), Some(Cell::new('#', TRAIL)));
        assert_eq!(s.row_text(1).as_deref(), Some("  # "));
        assert_eq!(s.draw_count(), 1);
    }

    #[test]
    fn memory_painted_lists_row_major() {
        let mut s = MemorySurface::new(Size::new(3, 4));
        s.draw_cell(2, 0, 'b', TRAIL).unwrap();
        s.draw_cell(0, 3, 'a', TRAIL).unwrap();
        let cells: Vec<(u16, u16, char)> = s.painted().map(|(r, c, cell)| (r, c, cell.ch)).collect();
        assert_eq!(cells, vec![(0, 3, 'a'), (2, 0, 'b')]);
    }

    #[test]
    fn memory_out_of_bounds_is_error() {
        let mut s = MemorySurface::new(Size::new(3, 4));
        let err = s.draw_cell(3, 0, '#', TRAIL).unwrap_err();
        assert!(matches!(err, SurfaceError::OutOfBounds { row: 3, col: 0, .. }));
        assert!(s.draw_cell(0, 4, '#', TRAIL).is_err());
        assert_eq!(s.draw_count(), 0);
    }

    #[test]
    fn memory_clear_blanks_everything() {
        let mut s = MemorySurface::new(Size::new(2, 2));
        s.draw_cell(0, 0, '#', TRAIL).unwrap();
        s.clear().unwrap();
        assert_eq!(s.painted().count(), 0);
    }

    #[test]
    fn memory_counts_flushes() {
        let mut s = MemorySurface::new(Size::new(1, 1));
        s.flush().unwrap();
        s.flush().unwrap();
        assert_eq!(s.flush_count(), 2);
    }

    // ── draw_text ───────────────────────────────────────────────────────

    #[test]
    fn draw_text_writes_run() {
        let mut s = MemorySurface::new(Size::new(1, 8));
        assert_eq!(s.draw_text(0, 1, "etch", Pen::PLAIN).unwrap(), 4);
        assert_eq!(s.row_text(0).as_deref(), Some(" etch   "));
    }

    #[test]
    fn draw_text_stops_at_right_edge() {
        let mut s = MemorySurface::new(Size::new(1, 5));
        assert_eq!(s.draw_text(0, 2, "abcdef", Pen::PLAIN).unwrap(), 3);
        assert_eq!(s.row_text(0).as_deref(), Some("  abc"));
    }

    #[test]
    fn draw_text_skips_wide_chars() {
        let mut s = MemorySurface::new(Size::new(1, 5));
        assert_eq!(s.draw_text(0, 0, "a中b", Pen::PLAIN).unwrap(), 2);
        assert_eq!(s.row_text(0).as_deref(), Some("ab   "));
    }

    #[test]
    fn draw_text_start_off_surface_is_error() {
        let mut s = MemorySurface::new(Size::new(1, 5));
        assert!(s.draw_text(1, 0, "x", Pen::PLAIN).is_err());
    }

    // ── TerminalSurface ─────────────────────────────────────────────────

    #[test]
    fn terminal_draw_is_buffered_until_flush() {
        let mut s = TerminalSurface::new(Vec::new(), Size::new(5, 5));
        s.draw_cell(0, 0, '@', TRAIL).unwrap();
        assert!(s.out.is_empty());
        s.flush().unwrap();
        assert!(!s.out.is_empty());
    }

    #[test]
    fn terminal_flush_is_synchronized() {
        let mut s = TerminalSurface::new(Vec::new(), Size::new(5, 5));
        s.draw_cell(1, 1, '#', TRAIL).unwrap();
        s.flush().unwrap();
        let out = String::from_utf8(s.out.clone()).unwrap();
        assert_eq!(out, "\x1b[?2026h\x1b[2;2H\x1b[37m\x1b[44m#\x1b[?2026l");
    }

    #[test]
    fn terminal_empty_flush_writes_nothing() {
        let mut s = TerminalSurface::new(Vec::new(), Size::new(5, 5));
        s.flush().unwrap();
        assert!(s.out.is_empty());
    }

    #[test]
    fn terminal_out_of_bounds_is_error() {
        let mut s = TerminalSurface::new(Vec::new(), Size::new(5, 5));
        assert!(matches!(
            s.draw_cell(0, 5, '#', TRAIL),
            Err(SurfaceError::OutOfBounds { .. })
        ));
        s.flush().unwrap();
        assert!(s.out.is_empty());
    }

    #[test]
    fn terminal_clear_resets_tracking() {
        let mut s = TerminalSurface::new(Vec::new(), Size::new(5, 5));
        s.draw_cell(0, 0, '#', TRAIL).unwrap();
        s.clear().unwrap();
        s.draw_cell(0, 1, '#', TRAIL).unwrap();
        s.flush().unwrap();
        let out = String::from_utf8(s.out.clone()).unwrap();
        // After the clear, position and colors are emitted again.
        assert!(out.ends_with("\x1b[1;2H\x1b[37m\x1b[44m#\x1b[?2026l"));
    }
}
