#![forbid(unsafe_code)]

//! Tessel demo binary entry point.
//!
//! Acts as the display driver: polls the terminal size, renders a frame per
//! tick, writes it, and feeds key presses to the focused element.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;
use std::time::Instant;

use crossterm::{cursor, event, execute, terminal};
use tessel::style::control::{EraseMode, erase_display};
use tessel::{Canvas, KeyEvent, RenderConfig, RenderError, Tree, write_frame};
use tessel_demo::{app, cli};

/// Raw mode plus alternate screen for the lifetime of the value.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(opts: &cli::Opts) -> io::Result<()> {
    let Some(path) = &opts.log_path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn run(opts: &cli::Opts) -> tessel::Result<()> {
    let mut tree = Tree::new(RenderConfig::from_env());
    tree.set_root(app::counter_app());
    tree.focus_next();

    let _guard = TerminalGuard::enter()?;
    let mut out = BufWriter::new(io::stdout().lock());
    let started = Instant::now();
    let mut shown: Option<Canvas> = None;

    loop {
        let (width, height) = terminal::size()?;
        match tree.render(width, height) {
            Ok(frame) => {
                if shown.as_ref().is_none_or(|prev| prev.size() != frame.size()) {
                    out.write_all(erase_display(EraseMode::All).as_bytes())?;
                }
                if shown.as_ref() != Some(&frame) {
                    write_frame(&mut out, &frame)?;
                    shown = Some(frame);
                }
            }
            // Keep the previous frame on screen until the terminal is big
            // enough again.
            Err(RenderError::Geometry(err)) => {
                tracing::warn!(%err, width, height, "frame skipped");
            }
            Err(err) => return Err(err.into()),
        }

        if !opts.exit_after.is_zero() && started.elapsed() >= opts.exit_after {
            break;
        }
        if !event::poll(opts.tick)? {
            continue;
        }
        let Some(key) = KeyEvent::from_crossterm(event::read()?) else {
            continue;
        };
        if app::is_quit(&key) {
            break;
        }
        let outcome = tree.dispatch_key(&key);
        tracing::debug!(?key, ?outcome, "key dispatched");
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let opts = cli::Opts::parse();
    if let Err(e) = init_logging(&opts) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }
    if let Err(e) = run(&opts) {
        tracing::error!(%e, "demo aborted");
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
