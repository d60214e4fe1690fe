//! Session logic and the time-driven schedulers on top of the core grid model.
//!
//! - [`Game`] - One session: playfield, score, phase and both schedulers
//! - [`Playfield`] - Committed grid plus the active [`Placement`]
//! - [`InputScheduler`] - Key edges to auto-repeating [`Action`]s
//! - [`GravityScheduler`] - Automatic fall with a linear speed-up
//! - [`GameStats`] - Score, landed pieces and row-clear histogram
//! - [`GameConfig`] - Repeat timings and gravity ramp
//! - [`ShapeSeed`] - Seed for a deterministic shape sequence
//!
//! # Game Flow
//!
//! 1. [`Game::start`] clears the grid and spawns the first piece
//! 2. The host feeds key edges through [`Game::handle_input`]
//! 3. Every tick, [`Game::tick`] runs the input scheduler, then gravity
//! 4. When gravity finds the piece blocked it locks, rows clear and the next
//!    piece spawns
//! 5. A blocked spawn ends the session
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use bentris_engine::{Game, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default());
//! let t0 = Instant::now();
//! game.start(t0);
//!
//! let mut now = t0;
//! while game.phase().is_running() && now < t0 + Duration::from_secs(60) {
//!     game.tick(now);
//!     now += Duration::from_millis(10);
//! }
//! assert!(game.stats().landed_pieces() > 0);
//! println!("{}", game.frame());
//! ```

pub use self::{
    config::*, game::*, game_stats::*, gravity::*, input::*, playfield::*, seed::*,
};

mod config;
mod game;
mod game_stats;
mod gravity;
mod input;
mod playfield;
mod seed;
