// SPDX-License-Identifier: MIT
//
// The render loop.
//
// One keystroke at a time:
//
//   event source → keymap → canvas → draw the changed cells → flush
//
// Only cells that changed are drawn. A move repaints two cells: the old
// cursor cell in the trail pen and the new one in the cursor pen. A
// blocked move or an unbound key draws nothing and doesn't flush.
//
// The loop owns its surface and event source outright. It never touches
// the terminal modes; whoever built the surface restores the terminal
// after `run` returns, whatever it returned.

use etch_canvas::{Action, Canvas, Coordinate, Keymap, MovementResult};
use etch_term::color::Pen;
use etch_term::input::KeyEvent;
use etch_term::reader::EventSource;
use etch_term::surface::DisplaySurface;
use tracing::{debug, error, info, trace};

use crate::config::SketchConfig;
use crate::error::{EtchError, InputError};
use crate::layout::Layout;

const BORDER_CORNER: char = '+';
const BORDER_HORIZONTAL: char = '-';
const BORDER_VERTICAL: char = '|';

/// Whether the loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

/// A drawing session: canvas, bindings, and the I/O it draws through.
pub struct Sketch<S: DisplaySurface, E: EventSource> {
    canvas: Canvas,
    keymap: Keymap,
    layout: Layout,
    surface: S,
    events: E,
    cursor_pen: Pen,
    trail_pen: Pen,
    cursor_char: char,
    trail_char: char,
    state: SessionState,
}

impl<S: DisplaySurface, E: EventSource> Sketch<S, E> {
    /// Lay out a canvas on `surface`.
    ///
    /// # Errors
    ///
    /// [`EtchError::Config`] if the surface is too small for a canvas.
    pub fn new(config: &SketchConfig, surface: S, events: E) -> Result<Self, EtchError> {
        let layout = Layout::compute(
            surface.size(),
            config.help,
            config.border,
            (config.height, config.width),
        )?;
        let canvas = Canvas::new(layout.height, layout.width)?;
        info!(
            height = layout.height,
            width = layout.width,
            start = ?canvas.cursor(),
            "canvas ready"
        );

        Ok(Self {
            canvas,
            keymap: config.keymap,
            layout,
            surface,
            events,
            cursor_pen: config.cursor_pen,
            trail_pen: config.trail_pen,
            cursor_char: config.cursor_char,
            trail_char: config.trail_char,
            state: SessionState::Running,
        })
    }

    /// Draw the first frame, then handle keys until the user quits.
    ///
    /// # Errors
    ///
    /// Any draw failure, and the event source running dry or failing.
    /// The loop stops at the first error.
    pub fn run(&mut self) -> Result<(), EtchError> {
        let result = self.draw_initial().and_then(|()| {
            while self.state == SessionState::Running {
                self.step()?;
            }
            Ok(())
        });

        match &result {
            Ok(()) => info!(painted = self.canvas.painted_len(), "session terminated"),
            Err(err) => error!(%err, "render loop stopped"),
        }
        result
    }

    /// Clear the surface and draw the help line, the border, and the
    /// start cell.
    ///
    /// # Errors
    ///
    /// Any draw or flush failure.
    pub fn draw_initial(&mut self) -> Result<(), EtchError> {
        self.surface.clear()?;
        if let Some(row) = self.layout.help_row {
            self.surface.draw_text(row, 0, self.keymap.help_text(), Pen::PLAIN)?;
        }
        self.draw_border()?;
        self.draw_cursor(self.canvas.cursor())?;
        self.surface.flush()?;
        Ok(())
    }

    /// Handle one keystroke.
    ///
    /// # Errors
    ///
    /// [`InputError::Eof`] / [`InputError::Read`] from the event source,
    /// and any draw failure.
    pub fn step(&mut self) -> Result<SessionState, EtchError> {
        let event = self.next_event()?;
        let action = self.keymap.map_event(&event);
        if action == Action::Ignore {
            trace!(?event, "unbound key");
        } else {
            debug!(?event, ?action, "key");
        }
        self.apply(action)?;
        Ok(self.state)
    }

    fn next_event(&mut self) -> Result<KeyEvent, EtchError> {
        match self.events.next_event() {
            Ok(Some(event)) => Ok(event),
            Ok(None) => Err(InputError::Eof.into()),
            Err(err) => Err(InputError::Read(err).into()),
        }
    }

    fn apply(&mut self, action: Action) -> Result<(), EtchError> {
        match action {
            Action::Terminate => self.state = SessionState::Terminated,
            Action::Ignore => {}
            Action::Move(delta) => match self.canvas.apply_movement(delta) {
                MovementResult::Moved { from, to } => {
                    self.draw_trail(from)?;
                    self.draw_cursor(to)?;
                    self.surface.flush()?;
                }
                MovementResult::Blocked => trace!(?delta, at = ?self.canvas.cursor(), "blocked"),
            },
            Action::Clear => {
                let erased = self.canvas.clear();
                debug!(cells = erased.len(), "cleared");
                for coord in erased {
                    let (row, col) = self.layout.to_screen(coord);
                    self.surface.draw_cell(row, col, ' ', Pen::PLAIN)?;
                }
                self.draw_cursor(self.canvas.cursor())?;
                self.surface.flush()?;
            }
        }
        Ok(())
    }

    fn draw_cursor(&mut self, at: Coordinate) -> Result<(), EtchError> {
        let (row, col) = self.layout.to_screen(at);
        self.surface.draw_cell(row, col, self.cursor_char, self.cursor_pen)?;
        Ok(())
    }

    fn draw_trail(&mut self, at: Coordinate) -> Result<(), EtchError> {
        let (row, col) = self.layout.to_screen(at);
        self.surface.draw_cell(row, col, self.trail_char, self.trail_pen)?;
        Ok(())
    }

    fn draw_border(&mut self) -> Result<(), EtchError> {
        let Some((top, left, bottom, right)) = self.layout.border_rect() else {
            return Ok(());
        };
        for col in left + 1..right {
            self.surface.draw_cell(top, col, BORDER_HORIZONTAL, Pen::PLAIN)?;
            self.surface.draw_cell(bottom, col, BORDER_HORIZONTAL, Pen::PLAIN)?;
        }
        for row in top + 1..bottom {
            self.surface.draw_cell(row, left, BORDER_VERTICAL, Pen::PLAIN)?;
            self.surface.draw_cell(row, right, BORDER_VERTICAL, Pen::PLAIN)?;
        }
        for (row, col) in [(top, left), (top, right), (bottom, left), (bottom, right)] {
            self.surface.draw_cell(row, col, BORDER_CORNER, Pen::PLAIN)?;
        }
        Ok(())
    }
}

// Test-only accessors.
#[cfg(test)]
impl<S: DisplaySurface, E: EventSource> Sketch<S, E> {
    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
