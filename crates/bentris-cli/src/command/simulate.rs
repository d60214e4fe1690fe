use std::{
    collections::VecDeque,
    path::PathBuf,
    time::{Duration, Instant},
};

use bentris_engine::{Action, Game, GameConfig, GameStats, InputEdge, ShapeSeed};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for both the shape sequence and the scripted player
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated session length in seconds
    #[arg(long, default_value_t = 60)]
    duration_secs: u64,
    /// Game tick period in milliseconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Output file path (defaults to stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(config: GameConfig, arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        duration_secs,
        tick_ms,
        output,
    } = arg;

    util::init_logging("info", None)?;

    eprintln!("Simulating {duration_secs}s of play with seed {seed}...");
    let summary = simulate(
        config,
        *seed,
        Duration::from_secs(*duration_secs),
        Duration::from_millis(*tick_ms),
    );
    eprintln!(
        "Simulation finished: score {}, {} pieces, {} rows{}",
        summary.stats.score(),
        summary.stats.landed_pieces(),
        summary.stats.total_cleared_rows(),
        if summary.ended { " (topped out)" } else { "" }
    );

    Output::save_json(&summary, output.as_deref())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SimulationSummary {
    seed: u64,
    shape_seed: ShapeSeed,
    #[serde(flatten)]
    stats: GameStats,
    ended: bool,
    elapsed_ms: u64,
    grid: Vec<String>,
}

/// Plays one session on a virtual clock until it ends or `duration` passes.
fn simulate(config: GameConfig, seed: u64, duration: Duration, tick: Duration) -> SimulationSummary {
    let shape_seed = ShapeSeed::from(seed);
    let mut game = Game::with_seed(config, shape_seed);
    let mut player = ScriptedPlayer::new(seed);

    let t0 = Instant::now();
    let mut now = t0;
    let mut last_tick = t0;
    game.start(now);
    while game.phase().is_running() && now - t0 < duration {
        if let Some(edge) = player.next_edge(&game, now) {
            game.handle_input(edge);
        }
        game.tick(now);
        last_tick = now;
        now += tick;
    }
    // a run that lasts out the duration is credited with the full span
    let ended_at = if game.phase().is_running() { now } else { last_tick };

    SimulationSummary {
        seed,
        shape_seed,
        stats: game.stats().clone(),
        ended: game.phase().is_ended(),
        elapsed_ms: u64::try_from(game.elapsed(ended_at).as_millis()).unwrap_or(u64::MAX),
        grid: game.frame().to_string().lines().map(str::to_owned).collect(),
    }
}

/// Taps a random number of rotations and horizontal moves for every new
/// piece, then hard-drops it.
///
/// Each tap is a press on one tick and a release on the next, so no action
/// auto-repeats.
#[derive(Debug)]
struct ScriptedPlayer {
    rng: Pcg32,
    plan: VecDeque<Action>,
    held: Option<Action>,
    planned_for: Option<usize>,
}

impl ScriptedPlayer {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            plan: VecDeque::new(),
            held: None,
            planned_for: None,
        }
    }

    fn next_edge(&mut self, game: &Game, now: Instant) -> Option<InputEdge> {
        if let Some(action) = self.held.take() {
            return Some(InputEdge::release(action, now));
        }

        let landed = game.stats().landed_pieces();
        if self.planned_for != Some(landed) {
            self.planned_for = Some(landed);
            self.plan = self.make_plan();
        }

        let action = self.plan.pop_front()?;
        self.held = Some(action);
        Some(InputEdge::press(action, now))
    }

    fn make_plan(&mut self) -> VecDeque<Action> {
        let rotations = self.rng.random_range(0..4);
        let shift: i32 = self.rng.random_range(-5..=5);
        let step = if shift < 0 {
            Action::MoveLeft
        } else {
            Action::MoveRight
        };

        let mut plan = VecDeque::new();
        plan.extend((0..rotations).map(|_| Action::Rotate));
        plan.extend((0..shift.unsigned_abs()).map(|_| step));
        plan.push_back(Action::HardDrop);
        plan
    }
}
