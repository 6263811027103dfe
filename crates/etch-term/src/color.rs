// SPDX-License-Identifier: MIT
//
// Colors and pens.
//
// A sketch needs very little color: one pen for the cursor cell, one for
// the trail, the terminal default for everything else. `CellColor` is the
// compact per-cell color written to the terminal; `Pen` pairs a foreground
// and background the way a curses color pair does.
//
// Both parse from the strings users type on the command line:
//
//   red           → ANSI 1
//   bright-blue   → ANSI 12
//   #ff8800       → TrueColor
//   default       → terminal default
//   white/green   → Pen { fg: white, bg: green }
//   green         → Pen { fg: default, bg: green }

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Compact color for a terminal cell.
///
/// Small and cheap to compare, so the cell writer can skip redundant SGR
/// sequences by plain equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index. 0–7 standard, 8–15 bright.
    Ansi256(u8),

    /// Terminal default color (inherits from the user's theme).
    #[default]
    Default,
}

/// The eight standard ANSI color names, in palette order.
const ANSI_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

impl CellColor {
    pub const BLACK: Self = Self::Ansi256(0);
    pub const RED: Self = Self::Ansi256(1);
    pub const GREEN: Self = Self::Ansi256(2);
    pub const YELLOW: Self = Self::Ansi256(3);
    pub const BLUE: Self = Self::Ansi256(4);
    pub const MAGENTA: Self = Self::Ansi256(5);
    pub const CYAN: Self = Self::Ansi256(6);
    pub const WHITE: Self = Self::Ansi256(7);

    /// Look up a named color: the eight ANSI names, `bright-<name>`
    /// (also `bright_<name>` and `brightname`), or `default`.
    /// Case-insensitive.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        if lower == "default" {
            return Some(Self::Default);
        }

        let (base, bright) = lower
            .strip_prefix("bright-")
            .or_else(|| lower.strip_prefix("bright_"))
            .or_else(|| lower.strip_prefix("bright"))
            .map_or((lower.as_str(), false), |rest| (rest, true));

        let idx = ANSI_NAMES.iter().position(|&n| n == base)?;
        #[allow(clippy::cast_possible_truncation)] // idx < 8.
        let idx = idx as u8;
        Some(Self::Ansi256(if bright { idx + 8 } else { idx }))
    }

    /// Parse `#RRGGBB` or `#RGB` (the `#` is optional).
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#').unwrap_or_else(|| s.trim());
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Self::Rgb(r, g, b))
            }
            3 => {
                // #abc → #aabbcc
                let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok();
                let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
                Some(Self::Rgb(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }
}

impl FromStr for CellColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('#') {
            return Self::hex(trimmed).ok_or_else(|| ColorParseError(s.to_string()));
        }
        Self::named(trimmed).ok_or_else(|| ColorParseError(s.to_string()))
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) if *idx < 8 => f.write_str(ANSI_NAMES[*idx as usize]),
            Self::Ansi256(idx) if *idx < 16 => {
                write!(f, "bright-{}", ANSI_NAMES[(*idx - 8) as usize])
            }
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => f.write_str("default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A color string that is neither a known name nor a valid hex code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown color `{0}` (expected a color name like `blue`, `bright-red`, `default`, or `#rrggbb`)")]
pub struct ColorParseError(pub String);

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// A foreground/background pair used to paint a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pen {
    pub fg: CellColor,
    pub bg: CellColor,
}

impl Pen {
    /// The terminal's own colors. Used to erase cells.
    pub const PLAIN: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
    };

    #[inline]
    #[must_use]
    pub const fn new(fg: CellColor, bg: CellColor) -> Self {
        Self { fg, bg }
    }
}

impl FromStr for Pen {
    type Err = ColorParseError;

    /// `FG/BG`, or a single color which becomes the background.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((fg, bg)) => Ok(Self::new(fg.parse()?, bg.parse()?)),
            None => Ok(Self::new(CellColor::Default, s.parse()?)),
        }
    }
}

impl fmt::Display for Pen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fg, self.bg)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_standard_colors() {
        assert_eq!(CellColor::named("black"), Some(CellColor::BLACK));
        assert_eq!(CellColor::named("blue"), Some(CellColor::BLUE));
        assert_eq!(CellColor::named("white"), Some(CellColor::WHITE));
    }

    #[test]
    fn named_is_case_insensitive() {
        assert_eq!(CellColor::named("Green"), Some(CellColor::GREEN));
        assert_eq!(CellColor::named("  RED "), Some(CellColor::RED));
    }

    #[test]
    fn named_bright_variants() {
        assert_eq!(CellColor::named("bright-red"), Some(CellColor::Ansi256(9)));
        assert_eq!(CellColor::named("bright_cyan"), Some(CellColor::Ansi256(14)));
        assert_eq!(CellColor::named("brightwhite"), Some(CellColor::Ansi256(15)));
    }

    #[test]
    fn named_default() {
        assert_eq!(CellColor::named("default"), Some(CellColor::Default));
    }

    #[test]
    fn named_unknown() {
        assert_eq!(CellColor::named("chartreuse"), None);
        assert_eq!(CellColor::named("bright-"), None);
    }

    #[test]
    fn hex_six_digits() {
        assert_eq!(CellColor::hex("#ff8000"), Some(CellColor::Rgb(255, 128, 0)));
        assert_eq!(CellColor::hex("0a0b0c"), Some(CellColor::Rgb(10, 11, 12)));
    }

    #[test]
    fn hex_three_digits_expand() {
        assert_eq!(CellColor::hex("#fa0"), Some(CellColor::Rgb(255, 170, 0)));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(CellColor::hex("#12345"), None);
        assert_eq!(CellColor::hex("#gg0000"), None);
        assert_eq!(CellColor::hex(""), None);
    }

    #[test]
    fn from_str_dispatches() {
        assert_eq!("#000000".parse::<CellColor>(), Ok(CellColor::Rgb(0, 0, 0)));
        assert_eq!("yellow".parse::<CellColor>(), Ok(CellColor::YELLOW));
        assert!("#xyz".parse::<CellColor>().is_err());
        assert!("mauve".parse::<CellColor>().is_err());
    }

    #[test]
    fn parse_error_mentions_input() {
        let err = "mauve".parse::<CellColor>().unwrap_err();
        assert!(err.to_string().contains("mauve"));
    }

    #[test]
    fn display_round_names() {
        assert_eq!(CellColor::BLUE.to_string(), "blue");
        assert_eq!(CellColor::Ansi256(9).to_string(), "bright-red");
        assert_eq!(CellColor::Ansi256(200).to_string(), "ansi(200)");
        assert_eq!(CellColor::Rgb(1, 2, 255).to_string(), "#0102ff");
        assert_eq!(CellColor::Default.to_string(), "default");
    }

    #[test]
    fn default_is_terminal_default() {
        assert_eq!(CellColor::default(), CellColor::Default);
    }

    // ── Pen ─────────────────────────────────────────────────────────────

    #[test]
    fn pen_fg_bg_pair() {
        assert_eq!(
            "white/green".parse::<Pen>(),
            Ok(Pen::new(CellColor::WHITE, CellColor::GREEN))
        );
    }

    #[test]
    fn pen_single_color_is_background() {
        assert_eq!(
            "blue".parse::<Pen>(),
            Ok(Pen::new(CellColor::Default, CellColor::BLUE))
        );
    }

    #[test]
    fn pen_mixed_hex_and_name() {
        assert_eq!(
            "#ffffff/bright-black".parse::<Pen>(),
            Ok(Pen::new(CellColor::Rgb(255, 255, 255), CellColor::Ansi256(8)))
        );
    }

    #[test]
    fn pen_bad_half_is_error() {
        assert!("white/nope".parse::<Pen>().is_err());
        assert!("nope/white".parse::<Pen>().is_err());
    }

    #[test]
    fn pen_plain_is_all_default() {
        assert_eq!(Pen::PLAIN, Pen::default());
    }

    #[test]
    fn pen_display() {
        assert_eq!(Pen::new(CellColor::WHITE, CellColor::BLUE).to_string(), "white/blue");
    }
}
