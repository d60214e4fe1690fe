use std::{path::PathBuf, time::Duration};

use bentris_engine::{Game, GameConfig, ShapeSeed};

use crate::{tui::Runtime, util};

use self::app::PlayApp;

mod app;
mod keys;

/// Longer than the usual OS auto-repeat delay, so a held key keeps its
/// engine repeat timing until the terminal starts repeating it.
const DEFAULT_RELEASE_TIMEOUT_MS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct PlayArg {
    /// Game tick period in milliseconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Delay after the last key event before a held key counts as released,
    /// used when the terminal cannot report key releases. Values below the
    /// system key repeat delay make held keys stutter.
    #[arg(long, default_value_t = DEFAULT_RELEASE_TIMEOUT_MS)]
    release_timeout_ms: u64,
    /// Seed for the shape sequence (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Write log records to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            tick_ms: 10,
            release_timeout_ms: DEFAULT_RELEASE_TIMEOUT_MS,
            seed: None,
            log_file: None,
        }
    }
}

impl PlayArg {
    pub(crate) fn release_timeout(&self) -> Duration {
        Duration::from_millis(self.release_timeout_ms)
    }
}

pub(crate) fn run(config: GameConfig, arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        tick_ms,
        release_timeout_ms: _,
        seed,
        log_file,
    } = arg;

    util::init_logging("warn", log_file.as_deref())?;

    let game = match seed {
        Some(seed) => Game::with_seed(config, ShapeSeed::from(*seed)),
        None => Game::new(config),
    };
    let mut app = PlayApp::new(
        game,
        Duration::from_millis(*tick_ms),
        arg.release_timeout(),
    );
    Runtime::new().run(&mut app)?;

    let stats = app.game().stats();
    eprintln!(
        "Final score: {} ({} pieces, {} rows)",
        stats.score(),
        stats.landed_pieces(),
        stats.total_cleared_rows()
    );
    Ok(())
}
