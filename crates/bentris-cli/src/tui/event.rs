use std::time::Instant;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone)]
pub(super) enum TuiEvent {
    /// A tick is due; carries the time it was taken.
    Tick(Instant),
    /// The screen is dirty and should be redrawn.
    Render,
    /// Terminal input, with the time it was read.
    Crossterm(CrosstermEvent, Instant),
}
