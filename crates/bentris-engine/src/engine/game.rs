use std::time::{Duration, Instant};

use log::{debug, info};
use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::core::{grid::Grid, piece::random_shape};

use super::{
    config::GameConfig,
    game_stats::GameStats,
    gravity::GravityScheduler,
    input::{FiredActions, InputEdge, InputScheduler},
    playfield::{PieceControl, Placement, Playfield},
    seed::ShapeSeed,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    NotStarted,
    Running,
    Ended,
}

/// What happened to the active piece during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The game is not running; nothing was done.
    Inactive,
    /// The piece is still in play.
    Falling,
    /// The piece locked and a new one spawned.
    Landed { cleared_rows: usize },
    /// The piece locked but the next one could not spawn; the game ended.
    ToppedOut { cleared_rows: usize },
}

/// Result of [`Game::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Input actions fired this tick, in service order.
    pub fired: FiredActions,
    pub outcome: TickOutcome,
}

impl TickReport {
    const INACTIVE: Self = Self {
        fired: FiredActions::new_const(),
        outcome: TickOutcome::Inactive,
    };
}

/// One player's game: the playfield, score, and the two schedulers that move
/// the active piece.
///
/// The game never reads the clock. The host passes the current [`Instant`]
/// into [`Self::start`] and [`Self::tick`], and stamps every input edge.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use bentris_engine::{Action, Game, GameConfig, InputEdge, ShapeSeed};
///
/// let mut game = Game::with_seed(GameConfig::default(), ShapeSeed::from(1_u64));
/// let t0 = Instant::now();
/// game.start(t0);
/// assert!(game.phase().is_running());
///
/// // slam the first piece down; it locks on the next gravity fire
/// game.handle_input(InputEdge::press(Action::HardDrop, t0));
/// game.tick(t0);
/// let report = game.tick(t0 + Duration::from_secs(1));
/// assert!(report.outcome.is_landed());
/// assert_eq!(game.score(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    seed: ShapeSeed,
    phase: GamePhase,
    playfield: Playfield,
    stats: GameStats,
    started_at: Option<Instant>,
    input: InputScheduler,
    gravity: GravityScheduler,
    rng: Pcg32,
}

impl Game {
    /// Creates a game with a random shape seed.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a deterministic
    /// sequence of shapes.
    #[must_use]
    pub fn with_seed(config: GameConfig, seed: ShapeSeed) -> Self {
        Self {
            config,
            seed,
            phase: GamePhase::NotStarted,
            playfield: Playfield::new(),
            stats: GameStats::new(),
            started_at: None,
            input: InputScheduler::new(config.input),
            gravity: GravityScheduler::new(config.gravity),
            rng: seed.rng(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> ShapeSeed {
        self.seed
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// The committed grid, without the active piece.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.playfield.grid()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Placement> {
        self.playfield.active()
    }

    /// The grid as the player sees it, with the active piece drawn in.
    #[must_use]
    pub fn frame(&self) -> Grid {
        self.playfield.frame()
    }

    #[must_use]
    pub fn input(&self) -> &InputScheduler {
        &self.input
    }

    #[must_use]
    pub fn gravity(&self) -> &GravityScheduler {
        &self.gravity
    }

    /// Session time at `now`; zero before the first start.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |started| now.saturating_duration_since(started))
    }

    /// Begins a new session on an empty grid.
    ///
    /// Allowed in any phase. The shape sequence continues from the seeded
    /// source; score and statistics start from zero.
    pub fn start(&mut self, now: Instant) {
        self.playfield = Playfield::new();
        self.stats = GameStats::new();
        self.started_at = Some(now);
        self.input.reset();
        self.gravity.reset(now);
        self.phase = GamePhase::Running;
        info!("session started (seed {})", self.seed);

        if !self.spawn() {
            self.end();
        }
    }

    /// Applies a key edge. Returns whether it changed any key state; edges
    /// outside a running session are dropped.
    pub fn handle_input(&mut self, edge: InputEdge) -> bool {
        if !self.phase.is_running() {
            return false;
        }
        self.input.apply_edge(edge)
    }

    /// Advances the session to `now`: runs the input scheduler, then gravity,
    /// and locks the piece once gravity finds it blocked.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        if !self.phase.is_running() {
            return TickReport::INACTIVE;
        }

        let fired = self.input.run(now, &mut self.playfield);
        let elapsed = self.elapsed(now);
        let outcome = if self.gravity.run(now, elapsed, &mut self.playfield) {
            TickOutcome::Falling
        } else {
            self.lock_and_advance()
        };
        TickReport { fired, outcome }
    }

    /// Locks the active piece, scores it, clears rows and spawns the next
    /// piece, ending the game when the spawn is blocked.
    pub fn lock_and_advance(&mut self) -> TickOutcome {
        if !self.phase.is_running() {
            return TickOutcome::Inactive;
        }
        let Some(cleared_rows) = self.playfield.lock() else {
            return TickOutcome::Inactive;
        };
        self.stats.complete_piece_drop(cleared_rows);
        debug!(
            "piece locked: {cleared_rows} row(s) cleared, score {}",
            self.stats.score()
        );

        if self.spawn() {
            TickOutcome::Landed { cleared_rows }
        } else {
            self.end();
            TickOutcome::ToppedOut { cleared_rows }
        }
    }

    /// Draws a random shape and places it at the spawn position.
    ///
    /// Returns `false` if the spawn position is blocked.
    pub fn spawn(&mut self) -> bool {
        let piece = random_shape(&mut self.rng);
        self.playfield.spawn(piece)
    }

    fn end(&mut self) {
        self.phase = GamePhase::Ended;
        self.playfield.clear_active();
        self.input.reset();
        self.gravity.disarm();
        info!(
            "session ended: score {}, {} piece(s), {} row(s)",
            self.stats.score(),
            self.stats.landed_pieces(),
            self.stats.total_cleared_rows()
        );
    }
}

impl PieceControl for Game {
    fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        self.phase.is_running() && self.playfield.move_piece(dx, dy)
    }

    fn rotate_piece(&mut self, direction: i32) -> bool {
        self.phase.is_running() && self.playfield.rotate_piece(direction)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Action,
        core::{
            grid::{Cell, Row},
            piece::{Piece, PieceKind},
        },
    };

    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn started_game(seed: u64) -> (Game, Instant) {
        let mut game = Game::with_seed(GameConfig::default(), ShapeSeed::from(seed));
        let t0 = Instant::now();
        game.start(t0);
        (game, t0)
    }

    fn put_active(game: &mut Game, grid: Grid, placement: Placement) {
        game.playfield = Playfield::with_grid(grid);
        assert!(game.playfield.place(placement), "placement is illegal");
    }

    #[test]
    fn test_new_game_is_idle() {
        let mut game = Game::new(GameConfig::default());
        let t0 = Instant::now();
        assert!(game.phase().is_not_started());
        assert!(game.active().is_none());
        assert_eq!(game.elapsed(t0), Duration::ZERO);
        assert_eq!(game.tick(t0), TickReport::INACTIVE);
        assert!(!game.handle_input(InputEdge::press(Action::MoveLeft, t0)));
    }

    #[test]
    fn test_start_spawns_and_arms_gravity() {
        let (game, t0) = started_game(3);
        assert!(game.phase().is_running());
        assert!(game.active().is_some());
        assert_eq!(game.score(), 0);
        assert_eq!(game.gravity().next_fire(), Some(t0 + ms(1000)));
        assert_eq!(game.elapsed(t0 + ms(1500)), ms(1500));
    }

    #[test]
    fn test_landing_without_rows_scores_one() {
        let (mut game, _) = started_game(11);
        while game.move_piece(0, 1) {}
        let outcome = game.lock_and_advance();
        assert_eq!(outcome, TickOutcome::Landed { cleared_rows: 0 });
        assert_eq!(game.score(), 1);
        assert_eq!(game.stats().landed_pieces(), 1);
        assert!(game.active().is_some());
    }

    #[test]
    fn test_double_clear_scores_two_hundred_one() {
        let (mut game, _) = started_game(11);
        let gap = Row::filled(PieceKind::L)
            .with_cell(0, Cell::Empty)
            .with_cell(1, Cell::Empty);
        let grid = Grid::EMPTY.with_row(18, gap).with_row(19, gap);
        let square = Placement {
            piece: PieceKind::O.shape(),
            x: 0,
            y: 18,
        };
        put_active(&mut game, grid, square);

        let outcome = game.lock_and_advance();
        assert_eq!(outcome, TickOutcome::Landed { cleared_rows: 2 });
        assert_eq!(game.score(), 201);
        assert_eq!(*game.grid(), Grid::EMPTY);
        assert_eq!(game.stats().row_clear_histogram()[2], 1);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let (mut game, t0) = started_game(5);
        let blocker = Row::filled(PieceKind::S).with_cell(0, Cell::Empty);
        let grid = Grid::EMPTY.with_row(0, blocker).with_row(1, blocker);
        let dot = Placement {
            piece: Piece::from_tags(&[&[1]]).unwrap(),
            x: 0,
            y: 10,
        };
        put_active(&mut game, grid, dot);

        let outcome = game.lock_and_advance();
        assert_eq!(outcome, TickOutcome::ToppedOut { cleared_rows: 0 });
        assert!(game.phase().is_ended());
        assert!(game.active().is_none());
        assert_eq!(game.score(), 1);
        assert_eq!(game.gravity().next_fire(), None);

        // nothing moves once the game is over
        assert_eq!(game.tick(t0 + ms(5000)), TickReport::INACTIVE);
        assert!(!game.handle_input(InputEdge::press(Action::HardDrop, t0)));
        assert!(!game.move_piece(0, 1));
        assert_eq!(game.lock_and_advance(), TickOutcome::Inactive);
    }

    #[test]
    fn test_spawn_reports_blocked_grid() {
        let (mut game, _) = started_game(5);
        let full = Row::filled(PieceKind::Z);
        game.playfield = Playfield::with_grid(Grid::EMPTY.with_row(0, full).with_row(1, full));
        assert!(!game.spawn());
        assert!(game.active().is_none());
    }

    #[test]
    fn test_horizontal_input_moves_piece() {
        let (mut game, t0) = started_game(9);
        let x0 = game.active().unwrap().x;

        assert!(game.handle_input(InputEdge::press(Action::MoveLeft, t0)));
        let report = game.tick(t0);
        assert_eq!(report.fired.as_slice(), &[Action::MoveLeft]);
        assert_eq!(report.outcome, TickOutcome::Falling);
        assert_eq!(game.active().unwrap().x, x0 - 1);

        // no repeat until the first repeat delay has passed
        game.tick(t0 + ms(100));
        assert_eq!(game.active().unwrap().x, x0 - 1);
        game.tick(t0 + ms(250));
        assert_eq!(game.active().unwrap().x, x0 - 2);

        game.handle_input(InputEdge::release(Action::MoveLeft, t0 + ms(260)));
        game.tick(t0 + ms(350));
        assert_eq!(game.active().unwrap().x, x0 - 2);
    }

    #[test]
    fn test_hard_drop_locks_on_next_gravity_fire() {
        let (mut game, t0) = started_game(21);
        game.handle_input(InputEdge::press(Action::HardDrop, t0 + ms(10)));
        let report = game.tick(t0 + ms(10));
        assert_eq!(report.fired.as_slice(), &[Action::HardDrop]);
        assert_eq!(report.outcome, TickOutcome::Falling);
        let landed = *game.active().unwrap();
        assert!(!landed.translated(0, 1).is_legal_on(game.grid()));
        assert_eq!(game.stats().landed_pieces(), 0);

        for t in (20..1000).step_by(10) {
            assert_eq!(game.tick(t0 + ms(t)).outcome, TickOutcome::Falling);
        }
        let report = game.tick(t0 + ms(1000));
        assert_eq!(report.outcome, TickOutcome::Landed { cleared_rows: 0 });
        assert!(report.fired.is_empty());
        assert_eq!(game.score(), 1);
        assert!(game.input().is_pressed(Action::HardDrop));
    }

    #[test]
    fn test_soft_drop_does_not_reset_gravity() {
        let (mut game, t0) = started_game(6);
        let gravity_before = game.gravity().next_fire();
        let y0 = game.active().unwrap().y;

        game.handle_input(InputEdge::press(Action::SoftDrop, t0 + ms(400)));
        let report = game.tick(t0 + ms(400));
        assert_eq!(report.fired.as_slice(), &[Action::SoftDrop]);
        assert_eq!(report.outcome, TickOutcome::Falling);
        assert_eq!(game.active().unwrap().y, y0 + 1);
        assert_eq!(game.gravity().next_fire(), gravity_before);

        // gravity keeps its own schedule
        game.handle_input(InputEdge::release(Action::SoftDrop, t0 + ms(410)));
        game.tick(t0 + ms(1000));
        assert_eq!(game.active().unwrap().y, y0 + 2);
        let interval = game.config().gravity.interval_at(ms(1000));
        assert_eq!(game.gravity().next_fire(), Some(t0 + ms(1000) + interval));
    }

    #[test]
    fn test_gravity_alone_lands_pieces() {
        let (mut game, t0) = started_game(2);
        let mut landings = 0;
        for t in (0..=30_000).step_by(10) {
            if game.tick(t0 + ms(t)).outcome.is_landed() {
                landings += 1;
            }
        }
        assert!(landings >= 1, "no piece landed in 30s");
        assert_eq!(game.stats().landed_pieces(), landings);
    }

    #[test]
    fn test_rotate_zero_is_noop() {
        let (mut game, _) = started_game(4);
        let before = *game.active().unwrap();
        assert!(!game.rotate_piece(0));
        assert_eq!(*game.active().unwrap(), before);
    }

    #[test]
    fn test_restart_resets_session() {
        let (mut game, t0) = started_game(8);
        while game.move_piece(0, 1) {}
        game.lock_and_advance();
        assert_eq!(game.score(), 1);

        let t1 = t0 + ms(5000);
        game.start(t1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.stats().landed_pieces(), 0);
        assert_eq!(game.grid().occupied_count(), 0);
        assert_eq!(game.elapsed(t1), Duration::ZERO);
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = |seed: u64| {
            let (mut game, t0) = started_game(seed);
            let mut kinds = vec![];
            for step in 0..10 {
                let Some(active) = game.active() else { break };
                kinds.push(active.piece);
                let t = t0 + ms(step * 10);
                game.handle_input(InputEdge::press(Action::HardDrop, t));
                game.tick(t);
                game.handle_input(InputEdge::release(Action::HardDrop, t));
                game.lock_and_advance();
            }
            (kinds, game.frame(), game.score())
        };
        assert_eq!(play(77), play(77));
    }
}
