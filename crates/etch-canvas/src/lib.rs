//! # etch-canvas — the drawing model behind etch
//!
//! Everything here is pure state: no terminal, no I/O.
//!
//! - **[`position`]** — `Coordinate` (row, col) and unit-step `Delta`
//! - **[`canvas`]** — `Canvas`: the bounded cursor and its permanent trail
//! - **[`keymap`]** — `Keymap`: keystroke → `Action` (move, clear, quit, ignore)
//!
//! The render loop in the `etch` binary owns one of each and does the drawing.

pub mod canvas;
pub mod keymap;
pub mod position;

pub use canvas::{Canvas, CanvasError, MovementResult};
pub use keymap::{Action, Keymap, Movement};
pub use position::{Coordinate, Delta};
