use std::time::Instant;

use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// Application driven by [`Runtime::run`].
pub trait App {
    /// Called once, before the first event. Configure the tick interval here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, ...), stamped with the time
    /// they were read.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event, at: Instant);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application to `now`; called once per tick.
    fn update(&mut self, runtime: &mut Runtime, now: Instant);
}
