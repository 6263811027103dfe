// SPDX-License-Identifier: MIT
//
// The session's terminal: raw mode, the alternate screen, and restoring
// both on the way out.
//
// `unsafe` is confined to the libc calls: tcgetattr/tcsetattr, the
// TIOCGWINSZ ioctl, isatty, and one raw write in the panic hook.
#![allow(unsafe_code)]
//
// `Terminal` owns the session's terminal state. `enter` switches to raw
// mode (one key per read, no echo, no line buffering), the alternate
// screen, and a hidden cursor. `leave` undoes all of it, and so does
// `Drop`, so every exit path of the sketch restores the shell.
//
// A panic while the terminal is raw would leave the user with no echo and
// an invisible error message. The panic hook writes a pre-built restore
// sequence straight to fd 1 (no stdout lock, which the panicking frame
// may be holding), restores termios from a global backup, then hands off
// to the original hook so the message prints to a working terminal.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::TerminalError;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Screen extent in cells, rows by columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Number of columns (width).
    pub cols: u16,
    /// Number of rows (height).
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }

    /// Whether `(row, col)` lies inside `[0, rows) × [0, cols)`.
    #[inline]
    #[must_use]
    pub const fn contains(self, row: u16, col: u16) -> bool {
        row < self.rows && col < self.cols
    }
}

// ─── Queries ────────────────────────────────────────────────────────────────

/// Window size of the terminal on stdout, via `TIOCGWINSZ`.
///
/// `None` when stdout isn't a terminal or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal, i.e. there's a keyboard to read.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// Global backup of the original termios for the panic hook, which has no
/// access to the `Terminal` value.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Put the saved termios back. Errors are ignored; we're already panicking.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Restore sequence for emergency use: end synchronized output, reset
/// SGR attributes, show cursor, exit alternate screen. Alternate screen
/// exit is last so the shell content comes back clean.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install the restore-then-report panic hook (once per process).
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write [`EMERGENCY_RESTORE`] directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

/// Alternate screen, hidden cursor, blank screen.
fn write_enter_sequence(w: &mut impl Write) -> io::Result<()> {
    ansi::enter_alt_screen(w)?;
    ansi::cursor_hide(w)?;
    ansi::clear_screen(w)?;
    w.flush()
}

/// The inverse of [`write_enter_sequence`], plus an SGR reset and a sync
/// end in case a frame was cut off mid-write.
fn write_leave_sequence(w: &mut impl Write) -> io::Result<()> {
    ansi::end_sync(w)?;
    ansi::reset(w)?;
    ansi::cursor_show(w)?;
    ansi::exit_alt_screen(w)?;
    w.flush()
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Exclusive handle on the controlling terminal. Dropping it restores the
/// terminal if the session is still active.
///
/// # Example
///
/// ```no_run
/// use etch_term::terminal::Terminal;
///
/// let mut term = Terminal::open()?;
/// term.enter()?;
/// // ... draw, read keys ...
/// // dropping `term` restores the shell
/// # Ok::<(), etch_term::TerminalError>(())
/// ```
pub struct Terminal {
    /// Cooked-mode settings, put back by `leave`.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Terminal size captured at open time.
    size: Size,

    /// Whether we're in raw mode on the alternate screen.
    active: bool,
}

impl Terminal {
    /// Open the controlling terminal for an interactive session.
    ///
    /// Does **not** enter raw mode — call [`enter`](Self::enter) for that.
    ///
    /// # Errors
    ///
    /// [`TerminalError::NotATty`] when stdin is not a terminal, and
    /// [`TerminalError::SizeUnavailable`] when the window size can't be read.
    pub fn open() -> Result<Self, TerminalError> {
        if !is_tty() {
            return Err(TerminalError::NotATty);
        }
        let size = get_size().ok_or(TerminalError::SizeUnavailable)?;

        Ok(Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        })
    }

    /// Terminal size (columns, rows) as of [`open`](Self::open).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Enter raw mode, switch to the alternate screen, hide the cursor,
    /// clear the screen.
    ///
    /// Does nothing if the session is already active.
    ///
    /// # Errors
    ///
    /// [`TerminalError::Io`] if termios or terminal output fails. Once raw
    /// mode is on the session counts as active, so a failed escape write
    /// is still undone by [`leave`](Self::leave) or `Drop`.
    pub fn enter(&mut self) -> Result<(), TerminalError> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;
        self.activate(&mut io::stdout().lock())
    }

    /// Mark the session active, then draw the entry sequence to `out`.
    fn activate(&mut self, out: &mut impl Write) -> Result<(), TerminalError> {
        self.active = true;
        write_enter_sequence(out)?;
        Ok(())
    }

    /// Leave raw mode and restore the terminal.
    ///
    /// Does nothing if the session was never entered or already left.
    /// termios is restored even when the restore sequence can't be written.
    ///
    /// # Errors
    ///
    /// [`TerminalError::Io`] if the restore sequence can't be written or
    /// termios can't be reset.
    pub fn leave(&mut self) -> Result<(), TerminalError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let written = write_leave_sequence(&mut io::stdout().lock());
        self.disable_raw_mode()?;
        written?;
        Ok(())
    }

    // ── termios ─────────────────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // cfmakeraw equivalent. ISIG is off too, so Ctrl+C arrives as
            // a key and the sketch can quit through its normal path.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
