// SPDX-License-Identifier: MIT
//
// Error types for the terminal layer.

use std::io;

use thiserror::Error;

use crate::terminal::Size;

/// A display surface refused or failed to draw.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A draw landed outside the surface. Callers bound-check before
    /// drawing, so this always means a logic bug upstream.
    #[error("draw at row {row}, col {col} is outside the {}x{} surface", size.rows, size.cols)]
    OutOfBounds { row: u16, col: u16, size: Size },

    /// Writing to the underlying terminal failed.
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
}

/// The terminal cannot be used for an interactive session.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Stdin is not a terminal, so there is no keyboard to read.
    #[error("stdin is not a terminal")]
    NotATty,

    /// The window size query (`TIOCGWINSZ`) failed or reported zero.
    #[error("cannot determine the terminal size")]
    SizeUnavailable,

    /// termios or escape-sequence output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
