// SPDX-License-Identifier: MIT
//
// etch-term — Terminal control for etch.
//
// The thin layer between the sketch and the terminal: raw mode and the
// alternate screen with guaranteed restore, ANSI escape encoding, a
// keystroke parser for raw stdin bytes, and the `DisplaySurface`
// abstraction the render loop draws into.
//
// No TUI framework sits underneath. Raw termios for input, hand-written
// escape sequences for output. The sketch only ever sees `KeyEvent`s
// coming in and `draw_cell` calls going out.

pub mod ansi;
pub mod cell;
pub mod color;
pub mod error;
pub mod input;
pub mod output;
pub mod reader;
pub mod surface;
pub mod terminal;

pub use error::{SurfaceError, TerminalError};
