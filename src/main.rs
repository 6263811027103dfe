// SPDX-License-Identifier: MIT
//
// etch — a terminal Etch A Sketch.
//
// This is the binary that wires the crates together:
//
//   etch-term   → terminal modes, key parsing, display surfaces
//   etch-canvas → cursor, trail, key bindings
//
// Startup order matters. The terminal is opened and put in raw mode, the
// session runs, and the terminal is restored before anything is printed
// to stderr, so error messages land on the normal screen and not on the
// alternate one that's about to vanish.
//
// Exit codes: 0 on quit, 1 when the sketch itself fails, 2 when there's
// no usable keyboard (clap also uses 2 for bad flags).

mod config;
mod error;
mod layout;
mod sketch;

use std::path::Path;
use std::process;

use clap::Parser;
use etch_term::reader::KeyReader;
use etch_term::surface::TerminalSurface;
use etch_term::terminal::Terminal;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, SketchConfig};
use crate::error::EtchError;
use crate::sketch::Sketch;

fn main() {
    let cli = Cli::parse();
    let log_guard = cli.log_file.as_deref().and_then(configure_logging);

    let code = match run(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("etch: {err}");
            err.exit_code()
        }
    };

    info!(code, "exiting");
    // process::exit skips destructors; flush the log writer first.
    drop(log_guard);
    process::exit(code);
}

/// Build the session, run it, and restore the terminal.
fn run(cli: &Cli) -> Result<(), EtchError> {
    let config = SketchConfig::from_cli(cli)?;

    let mut terminal = Terminal::open()?;
    info!(rows = terminal.size().rows, cols = terminal.size().cols, "terminal opened");
    terminal.enter()?;

    let surface = TerminalSurface::stdout(terminal.size());
    let result = Sketch::new(&config, surface, KeyReader::new()).and_then(|mut sketch| sketch.run());

    // Restore before the caller prints anything. Drop would do it too,
    // but a failure here is worth logging.
    if let Err(err) = terminal.leave() {
        error!(%err, "terminal restore failed");
    }
    result
}

/// Send `tracing` output to `path`. Stdout is the drawing surface, so the
/// log never goes there.
///
/// Each run starts the file over. The filter comes from `RUST_LOG`,
/// defaulting to `info`. Returns the writer's guard, which must live until
/// the process exits.
fn configure_logging(path: &Path) -> Option<WorkerGuard> {
    let Some(file_name) = path.file_name() else {
        eprintln!("etch: --log-file {} is not a file path", path.display());
        return None;
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    discard_previous_log(path);
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}

/// `rolling::never` appends, so the last session's log goes first.
fn discard_previous_log(path: &Path) {
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
}
