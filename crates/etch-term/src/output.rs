// SPDX-License-Identifier: MIT
//
// Output buffering and stateful cell rendering.
//
// Two components keep terminal I/O small:
//
//   OutputBuffer — accumulates ANSI bytes in memory so one cursor step
//   (old cell repainted, new cell painted) goes out in a single write().
//
//   CellWriter — remembers where the terminal cursor is and which colors
//   are active, and skips escape sequences that would change nothing.
//   Painting a trail left-to-right emits one CUP for the whole run and no
//   SGR at all after the first cell.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::ansi;
use crate::cell::Cell;
use crate::color::CellColor;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output for a single `write()` call.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a character as UTF-8.
    pub fn write_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to `w`, flush it, and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is kept on
    /// error so nothing is silently dropped.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op: real flushing goes through flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Stateful cell renderer that tracks terminal state to skip redundant escapes.
///
/// - **Cursor**: skipped when the next cell is exactly where the terminal
///   cursor already sits after the previous character.
/// - **Colors**: skipped when unchanged since the last emit.
#[allow(clippy::struct_field_names)] // The `last_` prefix IS the grouping.
pub struct CellWriter {
    /// Row the terminal cursor is on, if known.
    last_row: Option<u16>,
    /// Column the terminal cursor will be at after the last character.
    next_col: Option<u16>,
    last_fg: Option<CellColor>,
    last_bg: Option<CellColor>,
}

impl CellWriter {
    /// Create a writer with no tracked state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_row: None,
            next_col: None,
            last_fg: None,
            last_bg: None,
        }
    }

    /// Forget all tracked state. Call after a screen clear or SGR reset.
    #[allow(clippy::missing_const_for_fn)] // *self = Self::new() isn't const-evaluable.
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Render one cell at `(row, col)`, emitting only what changed.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, row: u16, col: u16, cell: &Cell) {
        if self.last_row != Some(row) || self.next_col != Some(col) {
            ansi::cursor_to(out, row, col).ok();
        }

        if self.last_fg != Some(cell.pen.fg) {
            ansi::fg(out, cell.pen.fg).ok();
            self.last_fg = Some(cell.pen.fg);
        }
        if self.last_bg != Some(cell.pen.bg) {
            ansi::bg(out, cell.pen.bg).ok();
            self.last_bg = Some(cell.pen.bg);
        }

        out.write_char(cell.ch);

        #[allow(clippy::cast_possible_truncation)] // Char widths are 0..=2.
        let advance = cell.ch.width().unwrap_or(0) as u16;
        self.last_row = Some(row);
        self.next_col = Some(col.saturating_add(advance));
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Pen;

    fn text(out: &OutputBuffer) -> String {
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    // ── OutputBuffer ────────────────────────────────────────────────────

    #[test]
    fn output_buffer_new_is_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.as_bytes(), b"");
    }

    #[test]
    fn output_buffer_write_trait() {
        let mut buf = OutputBuffer::new();
        write!(buf, "hello {}", 42).unwrap();
        assert_eq!(buf.as_bytes(), b"hello 42");
    }

    #[test]
    fn output_buffer_write_char_unicode() {
        let mut buf = OutputBuffer::new();
        buf.write_char('█');
        assert_eq!(buf.as_bytes(), "█".as_bytes());
    }

    #[test]
    fn output_buffer_flush_to_drains() {
        let mut buf = OutputBuffer::new();
        buf.write_char('x');
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"x");
        assert!(buf.is_empty());
    }

    #[test]
    fn output_buffer_flush_empty_writes_nothing() {
        let mut buf = OutputBuffer::new();
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert!(sink.is_empty());
    }

    // ── CellWriter ──────────────────────────────────────────────────────

    #[test]
    fn first_cell_emits_position_and_colors() {
        let mut out = OutputBuffer::new();
        let mut w = CellWriter::new();
        let pen = Pen::new(CellColor::WHITE, CellColor::BLUE);
        w.render_cell(&mut out, 2, 5, &Cell::new('#', pen));
        assert_eq!(text(&out), "\x1b[3;6H\x1b[37m\x1b[44m#");
    }

    #[test]
    fn adjacent_cell_same_pen_is_just_the_char() {
        let mut out = OutputBuffer::new();
        let mut w = CellWriter::new();
        let pen = Pen::new(CellColor::WHITE, CellColor::BLUE);
        w.render_cell(&mut out, 0, 0, &Cell::new('#', pen));
        out.clear();
        w.render_cell(&mut out, 0, 1, &Cell::new('#', pen));
        assert_eq!(text(&out), "#");
    }

    #[test]
    fn non_adjacent_cell_repositions() {
        let mut out = OutputBuffer::new();
        let mut w = CellWriter::new();
        w.render_cell(&mut out, 0, 0, &Cell::new('a', Pen::PLAIN));
        out.clear();
        w.render_cell(&mut out, 1, 0, &Cell::new('b', Pen::PLAIN));
        assert_eq!(text(&out), "\x1b[2;1Hb");
    }

    #[test]
    fn pen_change_emits_only_changed_half() {
        let mut out = OutputBuffer::new();
        let mut w = CellWriter::new();
        w.render_cell(&mut out, 0, 0, &Cell::new('#', Pen::new(CellColor::WHITE, CellColor::BLUE)));
        out.clear();
        w.render_cell(&mut out, 0, 1, &Cell::new('@', Pen::new(CellColor::WHITE, CellColor::GREEN)));
        assert_eq!(text(&out), "\x1b[42m@");
    }

    #[test]
    fn wide_char_advances_two_columns() {
        let mut out = OutputBuffer::new();
        let mut w = CellWriter::new();
        w.render_cell(&mut out, 0, 0, &Cell::new('中', Pen::PLAIN));
        out.clear();
        w.render_cell(&mut out, 0, 2, &Cell::new('x', Pen::PLAIN));
        assert_eq!(text(&out), "x");
    }

    #[test]
    fn reset_state_forces_full_emit() {
        let mut out = OutputBuffer::new();
        let mut w = CellWriter::new();
        w.render_cell(&mut out, 0, 0, &Cell::new('a', Pen::PLAIN));
        w.reset_state();
        out.clear();
        w.render_cell(&mut out, 0, 1, &Cell::new('b', Pen::PLAIN));
        assert_eq!(text(&out), "\x1b[1;2H\x1b[39m\x1b[49mb");
    }
}
