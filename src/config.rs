// SPDX-License-Identifier: MIT
//
// Command-line flags and the session configuration built from them.
//
// clap parses the raw flags into `Cli`; `SketchConfig::from_cli` checks
// what clap can't (glyphs that don't fit one cell) and folds the flags
// into the shape the render loop wants.

use std::path::PathBuf;

use clap::Parser;
use etch_canvas::{Keymap, Movement};
use etch_term::color::{CellColor, Pen};
use unicode_width::UnicodeWidthChar;

use crate::error::EtchError;

/// Draw in your terminal: move the cursor and it leaves a trail.
#[derive(Parser, Debug)]
#[command(name = "etch", version, about = "A terminal Etch A Sketch")]
pub struct Cli {
    /// Colors of the cursor cell: FG/BG, or a single color for the background.
    #[arg(long, value_name = "FG[/BG]", default_value = "white/green")]
    pub cursor_color: Pen,

    /// Colors of trail cells: FG/BG, or a single color for the background.
    #[arg(long, value_name = "FG[/BG]", default_value = "white/blue")]
    pub trail_color: Pen,

    /// Character drawn in the cursor cell.
    #[arg(long, value_name = "C", default_value_t = '@')]
    pub cursor_char: char,

    /// Character drawn in trail cells.
    #[arg(long, value_name = "C", default_value_t = '#')]
    pub trail_char: char,

    /// Canvas width in columns (defaults to the whole viewport).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub width: Option<u16>,

    /// Canvas height in rows (defaults to the whole viewport).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub height: Option<u16>,

    /// Allow diagonal moves with y/u/b/n.
    #[arg(long)]
    pub diagonals: bool,

    /// Don't draw a box around the canvas.
    #[arg(long)]
    pub no_border: bool,

    /// Don't show the key help on the top line.
    #[arg(long)]
    pub no_help: bool,

    /// Write a debug log to PATH (filter with RUST_LOG).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Everything the render loop needs to know before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchConfig {
    pub cursor_pen: Pen,
    pub trail_pen: Pen,
    pub cursor_char: char,
    pub trail_char: char,
    pub keymap: Keymap,
    pub border: bool,
    pub help: bool,
    /// Requested canvas size; `None` fills the viewport.
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl SketchConfig {
    /// Validate the parsed flags.
    ///
    /// # Errors
    ///
    /// [`EtchError::Config`] if a glyph isn't a single-cell printable
    /// character.
    pub fn from_cli(cli: &Cli) -> Result<Self, EtchError> {
        let cursor_char = check_glyph("--cursor-char", cli.cursor_char)?;
        let trail_char = check_glyph("--trail-char", cli.trail_char)?;
        let movement = if cli.diagonals {
            Movement::EightWay
        } else {
            Movement::FourWay
        };

        Ok(Self {
            cursor_pen: cli.cursor_color,
            trail_pen: cli.trail_color,
            cursor_char,
            trail_char,
            keymap: Keymap::new(movement),
            border: !cli.no_border,
            help: !cli.no_help,
            width: cli.width,
            height: cli.height,
        })
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            cursor_pen: Pen::new(CellColor::WHITE, CellColor::GREEN),
            trail_pen: Pen::new(CellColor::WHITE, CellColor::BLUE),
            cursor_char: '@',
            trail_char: '#',
            keymap: Keymap::default(),
            border: true,
            help: true,
            width: None,
            height: None,
        }
    }
}

/// A glyph must occupy exactly one terminal cell.
fn check_glyph(flag: &str, ch: char) -> Result<char, EtchError> {
    if ch.is_control() || ch.width() != Some(1) {
        return Err(EtchError::Config(format!(
            "{flag} must be a single-width printable character, got {ch:?}"
        )));
    }
    Ok(ch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("etch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_default_config() {
        let config = SketchConfig::from_cli(&parse(&[])).unwrap();
        assert_eq!(config, SketchConfig::default());
    }

    #[test]
    fn colors_parse() {
        let cli = parse(&["--cursor-color", "black/bright-yellow", "--trail-color", "red"]);
        let config = SketchConfig::from_cli(&cli).unwrap();
        assert_eq!(config.cursor_pen.fg, CellColor::BLACK);
        assert_eq!(config.cursor_pen.bg, CellColor::named("bright-yellow").unwrap());
        assert_eq!(config.trail_pen, Pen::new(CellColor::Default, CellColor::RED));
    }

    #[test]
    fn bad_color_is_a_usage_error() {
        let err = Cli::try_parse_from(["etch", "--trail-color", "mauve"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn zero_width_is_a_usage_error() {
        assert!(Cli::try_parse_from(["etch", "--width", "0"]).is_err());
    }

    #[test]
    fn switches() {
        let cli = parse(&["--diagonals", "--no-border", "--no-help", "--width", "30"]);
        let config = SketchConfig::from_cli(&cli).unwrap();
        assert_eq!(config.keymap, Keymap::new(Movement::EightWay));
        assert!(!config.border);
        assert!(!config.help);
        assert_eq!(config.width, Some(30));
        assert_eq!(config.height, None);
    }

    #[test]
    fn glyphs() {
        let config = SketchConfig::from_cli(&parse(&["--cursor-char", "X", "--trail-char", "."]))
            .unwrap();
        assert_eq!(config.cursor_char, 'X');
        assert_eq!(config.trail_char, '.');
    }

    #[test]
    fn wide_glyph_rejected() {
        let err = SketchConfig::from_cli(&parse(&["--trail-char", "你"])).unwrap_err();
        assert!(matches!(err, EtchError::Config(_)));
        assert!(err.to_string().contains("--trail-char"));
    }

    #[test]
    fn control_glyph_rejected() {
        let err = SketchConfig::from_cli(&parse(&["--cursor-char", "\t"])).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn log_file_is_optional() {
        assert_eq!(parse(&[]).log_file, None);
        assert_eq!(
            parse(&["--log-file", "/tmp/etch.log"]).log_file,
            Some(PathBuf::from("/tmp/etch.log"))
        );
    }
}
