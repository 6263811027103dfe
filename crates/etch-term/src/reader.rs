// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Blocking keystroke source.
//
// The sketch is single-threaded: it waits for a key, acts on it, draws,
// and waits again. `KeyReader` does the waiting. It blocks in `read()` on
// stdin, feeds the bytes to the `Parser`, and hands keys out one at a
// time from a small queue (a paste or a fast typist can deliver several
// keys in one read).
//
// The one timed wait: a lone ESC byte could be the Escape key or the
// start of an arrow-key sequence. When the parser is left holding bytes,
// we `poll()` stdin for `ESC_TIMEOUT_MS`. If nothing follows, the bytes
// are flushed as literal keys.

use std::collections::VecDeque;
use std::io;

use crate::input::{KeyEvent, Parser};

/// Read buffer size. A keypress is 1-6 bytes; a paste can be more.
const READ_BUF_SIZE: usize = 1024;

/// How long to wait for the rest of an escape sequence (milliseconds).
///
/// Terminals send a whole sequence in one write, so the bytes are almost
/// always already there. 25ms covers slow links without making Escape
/// feel laggy.
const ESC_TIMEOUT_MS: i32 = 25;

// ─── EventSource ────────────────────────────────────────────────────────────

/// Where the render loop gets its raw input events.
///
/// `next_event` blocks until a key is available. `Ok(None)` means the
/// source is exhausted (stdin hit EOF) and no more keys will ever come.
pub trait EventSource {
    /// Block for the next keystroke.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input cannot be read.
    fn next_event(&mut self) -> io::Result<Option<KeyEvent>>;
}

/// Scripted keystrokes, for driving a session without a terminal.
impl EventSource for VecDeque<KeyEvent> {
    fn next_event(&mut self) -> io::Result<Option<KeyEvent>> {
        Ok(self.pop_front())
    }
}

// ─── KeyReader ──────────────────────────────────────────────────────────────

/// Blocking keystroke reader over stdin.
///
/// Meant to be used while the terminal is in raw mode; in cooked mode the
/// kernel only releases input a line at a time.
pub struct KeyReader {
    parser: Parser,
    queue: VecDeque<KeyEvent>,
}

impl KeyReader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            queue: VecDeque::new(),
        }
    }

    /// Blocking read of one chunk from stdin. `Ok(0)` is EOF.
    #[cfg(unix)]
    fn read_chunk(buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
            if n >= 0 {
                #[allow(clippy::cast_sign_loss)] // n >= 0 checked.
                return Ok(n as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    #[cfg(not(unix))]
    fn read_chunk(buf: &mut [u8]) -> io::Result<usize> {
        use std::io::Read;
        io::stdin().lock().read(buf)
    }

    /// Wait up to `timeout_ms` for stdin to become readable.
    #[cfg(unix)]
    fn wait_readable(timeout_ms: i32) -> bool {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };
        ready > 0
    }

    #[cfg(not(unix))]
    fn wait_readable(_timeout_ms: i32) -> bool {
        false
    }

    /// Read until at least one key is queued or stdin ends.
    fn fill(&mut self) -> io::Result<()> {
        let mut buf = [0u8; READ_BUF_SIZE];

        while self.queue.is_empty() {
            let n = Self::read_chunk(&mut buf)?;
            if n == 0 {
                // EOF: whatever the parser holds is all there will be.
                self.queue.extend(self.parser.flush());
                return Ok(());
            }
            self.queue.extend(self.parser.advance(&buf[..n]));

            while self.parser.has_pending() {
                if !Self::wait_readable(ESC_TIMEOUT_MS) {
                    self.queue.extend(self.parser.flush());
                    break;
                }
                let n = Self::read_chunk(&mut buf)?;
                if n == 0 {
                    self.queue.extend(self.parser.flush());
                    return Ok(());
                }
                self.queue.extend(self.parser.advance(&buf[..n]));
            }
        }

        Ok(())
    }
}

impl EventSource for KeyReader {
    fn next_event(&mut self) -> io::Result<Option<KeyEvent>> {
        if self.queue.is_empty() {
            self.fill()?;
        }
        Ok(self.queue.pop_front())
    }
}

impl Default for KeyReader {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
