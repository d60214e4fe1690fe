use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::event::TuiEvent;

/// Produces ticks at a fixed interval, a render after every change, and
/// terminal events in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    next_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Ticks are disabled until an interval is set; the first render is due
    /// immediately.
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            next_tick: Instant::now(),
            dirty: true,
        }
    }

    /// Sets the tick interval; `None` disables ticks. The next tick is due
    /// immediately.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.next_tick = Instant::now();
    }

    /// Blocks until a tick or render is due or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now >= self.next_tick
            {
                self.next_tick += interval;
                // fell more than a tick behind: drop the backlog
                if self.next_tick < now {
                    self.next_tick = now + interval;
                }
                self.dirty = true;
                return Ok(TuiEvent::Tick(now));
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let timeout = self
                .tick_interval
                .map(|_| self.next_tick.saturating_duration_since(now));
            let ready = match timeout {
                Some(timeout) => event::poll(timeout)?,
                None => true,
            };
            if !ready {
                continue;
            }

            let event = event::read()?;
            self.dirty = true;
            return Ok(TuiEvent::Crossterm(event, Instant::now()));
        }
    }
}
