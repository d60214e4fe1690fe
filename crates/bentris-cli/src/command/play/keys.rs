use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use bentris_engine::{Action, InputEdge};
use crossterm::event::{KeyCode, KeyEventKind};

pub(crate) fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Up => Some(Action::Rotate),
        KeyCode::Down => Some(Action::SoftDrop),
        KeyCode::Char(' ') => Some(Action::HardDrop),
        _ => None,
    }
}

/// Turns terminal key events into debounced press/release edges.
///
/// Terminals without the keyboard enhancement protocol never report releases,
/// only a stream of presses while a key is held. For those, a key counts as
/// released once `release_timeout` passes without another press.
#[derive(Debug)]
pub(crate) struct KeyTracker {
    release_timeout: Option<Duration>,
    last_seen: HashMap<Action, Instant>,
}

impl KeyTracker {
    /// `release_timeout` is `None` when the terminal reports real releases.
    pub(crate) fn new(release_timeout: Option<Duration>) -> Self {
        Self {
            release_timeout,
            last_seen: HashMap::new(),
        }
    }

    pub(crate) fn key_event(
        &mut self,
        action: Action,
        kind: KeyEventKind,
        at: Instant,
    ) -> Option<InputEdge> {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let was_held = self.last_seen.insert(action, at).is_some();
                (!was_held).then_some(InputEdge::press(action, at))
            }
            KeyEventKind::Release => self
                .last_seen
                .remove(&action)
                .map(|_| InputEdge::release(action, at)),
        }
    }

    /// Releases keys that have been silent for longer than the timeout.
    pub(crate) fn expire(&mut self, now: Instant) -> Vec<InputEdge> {
        let Some(timeout) = self.release_timeout else {
            return vec![];
        };
        let mut expired: Vec<Action> = self
            .last_seen
            .iter()
            .filter(|(_, seen)| now.saturating_duration_since(**seen) >= timeout)
            .map(|(action, _)| *action)
            .collect();
        expired.sort_by_key(|action| Action::ALL.iter().position(|a| a == action));
        expired
            .into_iter()
            .map(|action| {
                self.last_seen.remove(&action);
                InputEdge::release(action, now)
            })
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.last_seen.clear();
    }
}
