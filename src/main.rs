//! Terminal blockfall runner (default binary).
//!
//! Polls crossterm for key events, feeds them to a [`Session`] and draws the
//! field with the framebuffer renderer. Logs go to a file because stdout is
//! the game screen.

use std::cell::Cell;
use std::fs::File;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing_subscriber::EnvFilter;

use blockfall::core::{Rules, Session};
use blockfall::input::{map_key, should_quit, ReleaseTimeout};
use blockfall::term::{FieldView, FrameBuffer, RunStats, TerminalRenderer, Viewport};
use blockfall::types::{Command, NotificationKind};

const FRAME: Duration = Duration::from_millis(16);

/// Falling-block puzzle in the terminal
#[derive(Parser, Debug)]
#[command(name = "blockfall", version, about, long_about = None)]
struct Args {
    /// Seed for the piece randomizer (defaults to the clock)
    #[arg(long, env = "BLOCKFALL_SEED")]
    seed: Option<u32>,

    /// Starting level
    #[arg(long, env = "BLOCKFALL_LEVEL", default_value_t = 1)]
    level: u32,

    /// JSON file overriding scores and timings
    #[arg(long, env = "BLOCKFALL_RULES")]
    rules: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let rules = match &args.rules {
        Some(path) => Rules::from_path(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => Rules::default(),
    };
    let seed = args.seed.unwrap_or_else(clock_seed);
    let session = Session::with_rules(seed, args.level, rules).context("invalid rules")?;
    tracing::info!(seed, level = args.level, "starting session");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, session);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!("runner stopped: {err:#}");
    }
    result
}

fn init_logging() -> Result<()> {
    let path = std::env::var_os("BLOCKFALL_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("blockfall.log"));
    let log_file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, mut session: Session) -> Result<()> {
    let rows_cleared = Rc::new(Cell::new(0u32));
    {
        let rows_cleared = Rc::clone(&rows_cleared);
        session.subscribe_to(NotificationKind::RowCleared, move |_| {
            rows_cleared.set(rows_cleared.get() + 1);
        });
    }

    let view = FieldView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut releases = ReleaseTimeout::default();
    let synthesize_releases = !term.reports_releases();
    let mut last_frame = Instant::now();

    loop {
        let timeout = FRAME.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    let mapped = match map_key(key) {
                        Some(command) if synthesize_releases => {
                            releases.filter(command, Instant::now())
                        }
                        other => other,
                    };
                    if let Some(command) = mapped {
                        if command == Command::Restart {
                            rows_cleared.set(0);
                        }
                        session.handle(command);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        if synthesize_releases {
            for command in releases.expire(now) {
                session.handle(command);
            }
        }

        let dt = now.duration_since(last_frame);
        if dt < FRAME {
            continue;
        }
        last_frame = now;
        session.update(dt.as_secs_f64());

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let stats = RunStats {
            rows_cleared: rows_cleared.get(),
        };
        view.render_into_with_stats(&session, Some(&stats), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}
