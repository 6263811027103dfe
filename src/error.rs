// SPDX-License-Identifier: MIT
//
// Application errors and their exit codes.
//
//   0 — the user quit
//   1 — the sketch itself went wrong: a draw off the surface, a failed
//       write, a configuration that leaves no room to draw
//   2 — the input side went wrong: no terminal, no size, stdin closed

use std::io;

use etch_canvas::CanvasError;
use etch_term::{SurfaceError, TerminalError};
use thiserror::Error;

/// Exit code for a failure inside the sketch.
pub const EXIT_FATAL: i32 = 1;

/// Exit code for an unusable input source.
pub const EXIT_INPUT: i32 = 2;

/// Anything that ends a session early.
#[derive(Debug, Error)]
pub enum EtchError {
    /// The keyboard is gone or was never there.
    #[error("input source: {0}")]
    InputSource(#[from] InputError),

    /// A draw landed off the surface. Movement is bound-checked, so this
    /// is a bug, not a user error.
    #[error("invariant violated: {0}")]
    InvariantViolation(SurfaceError),

    /// Writing to the terminal failed.
    #[error("render failed: {0}")]
    Render(io::Error),

    /// The requested canvas can't be built.
    #[error("configuration: {0}")]
    Config(String),
}

/// Why no more keystrokes can be read.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Terminal(#[from] TerminalError),

    #[error("stdin closed")]
    Eof,

    #[error("read failed: {0}")]
    Read(io::Error),
}

impl EtchError {
    /// The process exit code this error maps to.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InputSource(_) => EXIT_INPUT,
            Self::InvariantViolation(_) | Self::Render(_) | Self::Config(_) => EXIT_FATAL,
        }
    }
}

impl From<SurfaceError> for EtchError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::OutOfBounds { .. } => Self::InvariantViolation(err),
            SurfaceError::Io(io) => Self::Render(io),
        }
    }
}

impl From<TerminalError> for EtchError {
    fn from(err: TerminalError) -> Self {
        match err {
            // Raw mode or escape output failing is a render problem, not
            // a missing keyboard.
            TerminalError::Io(io) => Self::Render(io),
            other => Self::InputSource(InputError::Terminal(other)),
        }
    }
}

impl From<CanvasError> for EtchError {
    fn from(err: CanvasError) -> Self {
        Self::Config(err.to_string())
    }
}
