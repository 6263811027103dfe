// SPDX-License-Identifier: MIT
//
// Keystroke parser.
//
// Turns raw stdin bytes into `KeyEvent`s. Covers what a terminal in raw
// mode sends for an ordinary keyboard:
//
// - ASCII printable characters and UTF-8 multi-byte characters
// - Control characters (Ctrl+letter, Enter, Tab, Backspace)
// - Legacy CSI sequences (arrows, Home/End, editing and function keys),
//   with xterm modifier parameters (`ESC [ 1 ; 5 C` = Ctrl+Right)
// - SS3 sequences (arrows and F1-F4 in application cursor mode)
// - Alt+key (ESC followed by a printable character)
//
// Complete sequences we don't recognize are consumed and dropped, so a
// stray mouse report or an exotic function key never desynchronizes the
// stream.
//
// # Design
//
// Escape sequences can span `read()` calls, so the parser keeps a small
// byte buffer. Feed bytes with [`Parser::advance`]; when no more bytes
// arrive within a short timeout, call [`Parser::flush`] to turn a pending
// lone ESC into an Escape keypress.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// One keystroke: key identity plus held modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with the given modifiers.
    #[inline]
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A plain printable character.
    #[inline]
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    /// Ctrl + a character.
    #[inline]
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::with(KeyCode::Char(ch), Modifiers::CTRL)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags, in xterm's CSI encoding
    /// (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
        const SUPER = 0b0000_1000;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental keystroke parser.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte could be the Escape key or the first byte of a
/// sequence. The parser holds it back until either more bytes arrive or
/// the caller decides the wait is over and calls [`flush`](Parser::flush).
pub struct Parser {
    /// Raw bytes not yet turned into events.
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32),
        }
    }

    /// Feed raw bytes and return every key that can be parsed so far.
    ///
    /// An incomplete trailing sequence stays buffered for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    events.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there buffered bytes waiting for the rest of a sequence?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up waiting and emit pending bytes as literal keys.
    ///
    /// A lone ESC becomes [`KeyCode::Escape`]; an unfinished sequence
    /// like `ESC [` becomes Escape followed by `[`.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let events = self
            .buf
            .iter()
            .filter_map(|&byte| match byte {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x7F => Some(KeyEvent::plain(KeyCode::Backspace)),
                b @ 0x01..=0x1A => Some(KeyEvent::ctrl((b + b'a' - 1) as char)),
                b @ 0x20..=0x7E => Some(KeyEvent::char(b as char)),
                _ => None,
            })
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// Each function reads from the front of a slice and reports what it found
// plus how many bytes that took. No mutable state.

enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Need more bytes.
    Incomplete,
    /// Unrecognized, drop `usize` bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Key(KeyEvent::ctrl('@'), 1),
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        b @ 0x01..=0x1A => Parsed::Key(KeyEvent::ctrl((b + b'a' - 1) as char), 1),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::char(b as char), 1),
        0xC0..=0xFF => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Key(KeyEvent::with(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::with(KeyCode::Char(b as char), Modifiers::ALT), 2),
        // Anything else: the ESC stood alone.
        _ => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Scan for the final byte (0x40..=0x7E). Parameter bytes are
    // 0x30..=0x3F, intermediates 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            // Not a CSI after all. Drop what came before the offending
            // byte; it may start the next key.
            return Parsed::Skip(end);
        }
        end += 1;
    }
    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params_raw = &buf[2..end];
    let consumed = end + 1;

    // Private-marker sequences (`ESC [ <`, `ESC [ ?`) are mouse reports or
    // mode replies, never keys.
    if params_raw.first().is_some_and(|b| (0x3C..=0x3F).contains(b)) {
        return Parsed::Skip(consumed);
    }

    let params = parse_params(params_raw);
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = if final_byte == b'~' {
        match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            15 => KeyCode::F(5),
            17 => KeyCode::F(6),
            18 => KeyCode::F(7),
            19 => KeyCode::F(8),
            20 => KeyCode::F(9),
            21 => KeyCode::F(10),
            23 => KeyCode::F(11),
            24 => KeyCode::F(12),
            _ => return Parsed::Skip(consumed),
        }
    } else {
        match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'P' => KeyCode::F(1),
            b'Q' => KeyCode::F(2),
            b'R' => KeyCode::F(3),
            b'S' => KeyCode::F(4),
            b'Z' => return Parsed::Key(KeyEvent::with(KeyCode::Tab, Modifiers::SHIFT), consumed),
            _ => return Parsed::Skip(consumed),
        }
    };

    Parsed::Key(KeyEvent::with(code, modifiers), consumed)
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Parsed::Skip(3),
    };

    Parsed::Key(KeyEvent::plain(code), 3)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| Parsed::Key(KeyEvent::char(ch), expected))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Parse `;`-separated decimal CSI parameters. Colon sub-parameters are
/// ignored. Empty fields read as 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

/// Decode an xterm modifier parameter (`1 + bitmask`) into flags.
#[allow(clippy::cast_possible_truncation)] // Only the low bits carry flags.
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
