use std::time::{Duration, Instant};

use bentris_engine::Game;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::{
    command::play::keys::{KeyTracker, action_for},
    tui::{App, Runtime},
    ui::widgets::{GameDisplay, style},
};

#[derive(Debug)]
pub(crate) struct PlayApp {
    game: Game,
    keys: KeyTracker,
    tick_interval: Duration,
    release_timeout: Duration,
    last_tick: Option<Instant>,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(game: Game, tick_interval: Duration, release_timeout: Duration) -> Self {
        Self {
            game,
            keys: KeyTracker::new(None),
            tick_interval,
            release_timeout,
            last_tick: None,
            is_exiting: false,
        }
    }

    pub(crate) fn game(&self) -> &Game {
        &self.game
    }

    fn restart(&mut self, now: Instant) {
        if !self.game.phase().is_not_started() {
            log::info!("restarting after score {}", self.game.score());
        }
        self.keys.clear();
        self.game.start(now);
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_interval(Some(self.tick_interval));
        let timeout = (!runtime.reports_key_release()).then_some(self.release_timeout);
        self.keys = KeyTracker::new(timeout);
        self.restart(Instant::now());
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event, at: Instant) {
        let Some(key) = event.as_key_event() else {
            return;
        };

        if let Some(action) = action_for(key.code) {
            if let Some(edge) = self.keys.key_event(action, key.kind, at) {
                self.game.handle_input(edge);
            }
            return;
        }

        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            KeyCode::Char('r') if self.game.phase().is_ended() => self.restart(at),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |now| self.game.elapsed(now));
        let help_text = if self.game.phase().is_ended() {
            "Controls: R (Restart) | Q (Quit)"
        } else {
            "Controls: ← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | Space (Hard Drop) | Q (Quit)"
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(GameDisplay::new(&self.game, elapsed), main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, now: Instant) {
        for edge in self.keys.expire(now) {
            self.game.handle_input(edge);
        }
        if self.game.phase().is_running() {
            self.last_tick = Some(now);
        }
        self.game.tick(now);
    }
}
