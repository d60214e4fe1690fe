use std::{
    io::{self, Write},
    time::Duration,
};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use ratatui::DefaultTerminal;

use super::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] in the alternate screen until it asks to exit.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
    reports_key_release: bool,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Whether the terminal reports key releases (keyboard enhancement
    /// protocol). Valid from [`App::init`] on.
    #[must_use]
    pub fn reports_key_release(&self) -> bool {
        self.reports_key_release
    }

    /// Runs the application.
    ///
    /// 1. Enables key release reporting when the terminal supports it
    /// 2. Calls `app.init()`
    /// 3. Dispatches events until `app.should_exit()` returns true
    ///    - `Tick`: calls `app.update()`
    ///    - `Render`: calls `app.draw()`
    ///    - `Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|term| {
            self.reports_key_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
            log::debug!("key release reporting: {}", self.reports_key_release);
            if self.reports_key_release {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }

            app.init(&mut self);
            let result = self.dispatch(term, app);

            if self.reports_key_release {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
                io::stdout().flush()?;
            }
            result
        })
    }

    fn dispatch<A>(&mut self, term: &mut DefaultTerminal, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick(now) => app.update(self, now),
                TuiEvent::Render => {
                    term.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event, at) => app.handle_event(self, event, at),
            }
        }
        Ok(())
    }
}
