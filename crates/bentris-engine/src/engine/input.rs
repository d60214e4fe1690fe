use std::time::Instant;

use arrayvec::ArrayVec;
use log::trace;
use serde::{Deserialize, Serialize};

use super::{config::RepeatTimings, playfield::PieceControl};

/// The five logical player actions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
pub enum Action {
    #[display("move left")]
    MoveLeft,
    #[display("move right")]
    MoveRight,
    #[display("rotate")]
    Rotate,
    #[display("soft drop")]
    SoftDrop,
    #[display("hard drop")]
    HardDrop,
}

impl Action {
    pub const LEN: usize = 5;

    /// All actions, in the order the scheduler services them each tick.
    pub const ALL: [Action; Action::LEN] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Rotate,
        Action::SoftDrop,
        Action::HardDrop,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// A debounced press or release of one action at a monotonic time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEdge {
    pub action: Action,
    pub pressed: bool,
    pub at: Instant,
}

impl InputEdge {
    #[must_use]
    pub const fn press(action: Action, at: Instant) -> Self {
        Self {
            action,
            pressed: true,
            at,
        }
    }

    #[must_use]
    pub const fn release(action: Action, at: Instant) -> Self {
        Self {
            action,
            pressed: false,
            at,
        }
    }
}

/// Actions fired during one scheduler run.
pub type FiredActions = ArrayVec<Action, { Action::LEN }>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActionTimer {
    pressed: bool,
    repeating: bool,
    next_fire: Option<Instant>,
}

/// Turns press/release edges into time-scheduled, auto-repeating actions.
///
/// A press arms its action to fire on the next run. After the first fire the
/// action waits [`RepeatTimings::first_repeat_delay`], then repeats at its
/// steady rate until released. Hard drop fires once per press.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use bentris_engine::{Action, InputEdge, InputScheduler, PieceControl, RepeatTimings};
///
/// #[derive(Default)]
/// struct Column(i32);
///
/// impl PieceControl for Column {
///     fn move_piece(&mut self, dx: i32, _dy: i32) -> bool {
///         self.0 += dx;
///         true
///     }
///
///     fn rotate_piece(&mut self, _direction: i32) -> bool {
///         false
///     }
/// }
///
/// let t0 = Instant::now();
/// let mut scheduler = InputScheduler::new(RepeatTimings::default());
/// let mut column = Column::default();
///
/// scheduler.apply_edge(InputEdge::press(Action::MoveRight, t0));
/// scheduler.run(t0, &mut column);
/// scheduler.run(t0 + Duration::from_millis(100), &mut column);
/// assert_eq!(column.0, 1);
///
/// scheduler.run(t0 + Duration::from_millis(250), &mut column);
/// scheduler.run(t0 + Duration::from_millis(350), &mut column);
/// assert_eq!(column.0, 3);
/// ```
#[derive(Debug, Clone)]
pub struct InputScheduler {
    timers: [ActionTimer; Action::LEN],
    timings: RepeatTimings,
}

impl InputScheduler {
    #[must_use]
    pub fn new(timings: RepeatTimings) -> Self {
        Self {
            timers: [ActionTimer::default(); Action::LEN],
            timings,
        }
    }

    #[must_use]
    pub fn timings(&self) -> &RepeatTimings {
        &self.timings
    }

    /// Forgets every pressed key and pending fire.
    pub fn reset(&mut self) {
        self.timers = [ActionTimer::default(); Action::LEN];
    }

    /// Applies an edge; returns whether it changed the pressed state.
    ///
    /// Edges repeating the current state are ignored.
    pub fn apply_edge(&mut self, edge: InputEdge) -> bool {
        let timer = &mut self.timers[edge.action.index()];
        if timer.pressed == edge.pressed {
            return false;
        }
        timer.pressed = edge.pressed;
        timer.repeating = false;
        timer.next_fire = edge.pressed.then_some(edge.at);
        true
    }

    #[must_use]
    pub fn is_pressed(&self, action: Action) -> bool {
        self.timers[action.index()].pressed
    }

    #[must_use]
    pub fn next_fire(&self, action: Action) -> Option<Instant> {
        self.timers[action.index()].next_fire
    }

    /// Fires every armed action that is due at `now` and reschedules it.
    pub fn run<C>(&mut self, now: Instant, control: &mut C) -> FiredActions
    where
        C: PieceControl + ?Sized,
    {
        let mut fired = FiredActions::new();
        let timings = &self.timings;
        for action in Action::ALL {
            let timer = &mut self.timers[action.index()];
            let Some(at) = timer.next_fire else {
                continue;
            };
            if at > now {
                continue;
            }

            trace!("fire {action}");
            perform(action, control);
            fired.push(action);

            let first_delay = timings.first_repeat_delay;
            let repeating = timer.repeating;
            timer.next_fire = timings
                .repeat_interval(action)
                .map(|repeat| now + if repeating { repeat } else { first_delay });
            timer.repeating = true;
        }
        fired
    }
}

fn perform<C>(action: Action, control: &mut C)
where
    C: PieceControl + ?Sized,
{
    match action {
        Action::MoveLeft => {
            control.move_piece(-1, 0);
        }
        Action::MoveRight => {
            control.move_piece(1, 0);
        }
        Action::Rotate => {
            control.rotate_piece(-1);
        }
        Action::SoftDrop => {
            control.move_piece(0, 1);
        }
        Action::HardDrop => while control.move_piece(0, 1) {},
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        moves: Vec<(i32, i32)>,
        rotations: Vec<i32>,
        floor_in: u32,
    }

    impl PieceControl for Recorder {
        fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
            if dy > 0 {
                if self.floor_in == 0 {
                    return false;
                }
                self.floor_in -= 1;
            }
            self.moves.push((dx, dy));
            true
        }

        fn rotate_piece(&mut self, direction: i32) -> bool {
            self.rotations.push(direction);
            true
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn run_until(
        scheduler: &mut InputScheduler,
        recorder: &mut Recorder,
        start: Instant,
        end_ms: u64,
    ) {
        for t in (0..=end_ms).step_by(10) {
            scheduler.run(start + ms(t), recorder);
        }
    }

    #[test]
    fn test_unpressed_scheduler_is_inert() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();
        run_until(&mut scheduler, &mut recorder, t0, 1000);
        assert!(recorder.moves.is_empty());
        assert!(recorder.rotations.is_empty());
    }

    #[test]
    fn test_horizontal_auto_repeat() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();

        assert!(scheduler.apply_edge(InputEdge::press(Action::MoveLeft, t0)));
        // fires at 0, 250, 350, 450, 550
        run_until(&mut scheduler, &mut recorder, t0, 590);
        assert_eq!(recorder.moves, vec![(-1, 0); 5]);

        assert!(scheduler.apply_edge(InputEdge::release(Action::MoveLeft, t0 + ms(595))));
        assert_eq!(scheduler.next_fire(Action::MoveLeft), None);
        run_until(&mut scheduler, &mut recorder, t0 + ms(600), 1000);
        assert_eq!(recorder.moves.len(), 5);
    }

    #[test]
    fn test_first_fire_schedules_first_repeat_delay() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder {
            floor_in: 100,
            ..Recorder::default()
        };

        scheduler.apply_edge(InputEdge::press(Action::SoftDrop, t0));
        let fired = scheduler.run(t0, &mut recorder);
        assert_eq!(fired.as_slice(), &[Action::SoftDrop]);
        assert_eq!(scheduler.next_fire(Action::SoftDrop), Some(t0 + ms(250)));

        scheduler.run(t0 + ms(250), &mut recorder);
        assert_eq!(scheduler.next_fire(Action::SoftDrop), Some(t0 + ms(300)));
    }

    #[test]
    fn test_rotate_repeats_slowly() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();

        scheduler.apply_edge(InputEdge::press(Action::Rotate, t0));
        // fires at 0, 250, 500, 750
        run_until(&mut scheduler, &mut recorder, t0, 800);
        assert_eq!(recorder.rotations, vec![-1; 4]);
    }

    #[test]
    fn test_repeated_press_edge_is_ignored() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();

        scheduler.apply_edge(InputEdge::press(Action::MoveRight, t0));
        scheduler.run(t0, &mut recorder);
        assert!(!scheduler.apply_edge(InputEdge::press(Action::MoveRight, t0 + ms(10))));
        assert_eq!(scheduler.next_fire(Action::MoveRight), Some(t0 + ms(250)));
        assert!(!scheduler.apply_edge(InputEdge::release(Action::HardDrop, t0)));
    }

    #[test]
    fn test_repress_restarts_first_repeat_delay() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();

        scheduler.apply_edge(InputEdge::press(Action::MoveRight, t0));
        run_until(&mut scheduler, &mut recorder, t0, 400);
        scheduler.apply_edge(InputEdge::release(Action::MoveRight, t0 + ms(405)));
        scheduler.apply_edge(InputEdge::press(Action::MoveRight, t0 + ms(410)));
        scheduler.run(t0 + ms(410), &mut recorder);
        assert_eq!(scheduler.next_fire(Action::MoveRight), Some(t0 + ms(660)));
    }

    #[test]
    fn test_hard_drop_is_one_shot() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder {
            floor_in: 6,
            ..Recorder::default()
        };

        scheduler.apply_edge(InputEdge::press(Action::HardDrop, t0));
        let fired = scheduler.run(t0, &mut recorder);
        assert_eq!(fired.as_slice(), &[Action::HardDrop]);
        assert_eq!(recorder.moves, vec![(0, 1); 6]);
        assert_eq!(scheduler.next_fire(Action::HardDrop), None);
        assert!(scheduler.is_pressed(Action::HardDrop));

        // held key does not fire again
        recorder.floor_in = 3;
        run_until(&mut scheduler, &mut recorder, t0, 1000);
        assert_eq!(recorder.moves.len(), 6);

        scheduler.apply_edge(InputEdge::release(Action::HardDrop, t0 + ms(1000)));
        scheduler.apply_edge(InputEdge::press(Action::HardDrop, t0 + ms(1010)));
        scheduler.run(t0 + ms(1010), &mut recorder);
        assert_eq!(recorder.moves.len(), 9);
    }

    #[test]
    fn test_actions_fire_in_fixed_order() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();

        for action in [Action::HardDrop, Action::Rotate, Action::MoveLeft] {
            scheduler.apply_edge(InputEdge::press(action, t0));
        }
        let fired = scheduler.run(t0, &mut recorder);
        assert_eq!(
            fired.as_slice(),
            &[Action::MoveLeft, Action::Rotate, Action::HardDrop]
        );
    }

    #[test]
    fn test_reset_disarms_everything() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();

        for action in Action::ALL {
            scheduler.apply_edge(InputEdge::press(action, t0));
        }
        scheduler.reset();
        for action in Action::ALL {
            assert!(!scheduler.is_pressed(action));
            assert_eq!(scheduler.next_fire(action), None);
        }
        assert!(scheduler.run(t0, &mut recorder).is_empty());
    }

    #[test]
    fn test_press_in_the_future_waits() {
        let t0 = Instant::now();
        let mut scheduler = InputScheduler::new(RepeatTimings::default());
        let mut recorder = Recorder::default();

        scheduler.apply_edge(InputEdge::press(Action::MoveLeft, t0 + ms(5)));
        assert!(scheduler.run(t0, &mut recorder).is_empty());
        assert_eq!(
            scheduler.run(t0 + ms(5), &mut recorder).as_slice(),
            &[Action::MoveLeft]
        );
    }
}
