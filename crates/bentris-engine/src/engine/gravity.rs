use std::time::{Duration, Instant};

use super::{config::GravityRamp, playfield::PieceControl};

/// Time-driven automatic fall of the active piece.
#[derive(Debug, Clone)]
pub struct GravityScheduler {
    ramp: GravityRamp,
    interval: Duration,
    next_fire: Option<Instant>,
}

impl GravityScheduler {
    /// A disarmed scheduler; call [`Self::reset`] to arm it.
    #[must_use]
    pub fn new(ramp: GravityRamp) -> Self {
        Self {
            ramp,
            interval: ramp.max_interval,
            next_fire: None,
        }
    }

    /// Arms the scheduler for a new session starting at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.interval = self.ramp.max_interval;
        self.next_fire = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_fire = None;
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn next_fire(&self) -> Option<Instant> {
        self.next_fire
    }

    /// Moves the piece down one row if the gravity timer is due.
    ///
    /// Returns `false` only when a due move was blocked, which means the
    /// piece has landed.
    pub fn run<C>(&mut self, now: Instant, elapsed: Duration, control: &mut C) -> bool
    where
        C: PieceControl + ?Sized,
    {
        self.interval = self.ramp.interval_at(elapsed);
        let Some(at) = self.next_fire else {
            return true;
        };
        if at > now {
            return true;
        }
        let moved = control.move_piece(0, 1);
        self.next_fire = Some(now + self.interval);
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Floor {
        rows_left: u32,
        moves: u32,
    }

    impl PieceControl for Floor {
        fn move_piece(&mut self, _dx: i32, _dy: i32) -> bool {
            if self.rows_left == 0 {
                return false;
            }
            self.rows_left -= 1;
            self.moves += 1;
            true
        }

        fn rotate_piece(&mut self, _direction: i32) -> bool {
            false
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_disarmed_never_fires() {
        let t0 = Instant::now();
        let mut gravity = GravityScheduler::new(GravityRamp::default());
        let mut floor = Floor {
            rows_left: 0,
            moves: 0,
        };
        assert!(gravity.run(t0 + ms(5000), ms(5000), &mut floor));

        gravity.reset(t0);
        gravity.disarm();
        assert!(gravity.run(t0 + ms(5000), ms(5000), &mut floor));
        assert_eq!(gravity.next_fire(), None);
    }

    #[test]
    fn test_first_fire_after_max_interval() {
        let t0 = Instant::now();
        let mut gravity = GravityScheduler::new(GravityRamp::default());
        let mut floor = Floor {
            rows_left: 10,
            moves: 0,
        };
        gravity.reset(t0);
        assert_eq!(gravity.next_fire(), Some(t0 + ms(1000)));

        assert!(gravity.run(t0 + ms(990), ms(990), &mut floor));
        assert_eq!(floor.moves, 0);
        assert!(gravity.run(t0 + ms(1000), ms(1000), &mut floor));
        assert_eq!(floor.moves, 1);
        assert!(gravity.next_fire().unwrap() < t0 + ms(2000));
    }

    #[test]
    fn test_blocked_move_reports_landing_and_reschedules() {
        let t0 = Instant::now();
        let mut gravity = GravityScheduler::new(GravityRamp::default());
        let mut floor = Floor {
            rows_left: 0,
            moves: 0,
        };
        gravity.reset(t0);
        assert!(!gravity.run(t0 + ms(1000), Duration::ZERO, &mut floor));
        assert_eq!(gravity.next_fire(), Some(t0 + ms(2000)));
    }

    #[test]
    fn test_interval_follows_ramp() {
        let t0 = Instant::now();
        let mut gravity = GravityScheduler::new(GravityRamp::default());
        let mut floor = Floor {
            rows_left: 100,
            moves: 0,
        };
        gravity.reset(t0);
        let now = t0 + Duration::from_secs(600);
        gravity.run(now, Duration::from_secs(600), &mut floor);
        assert_eq!(gravity.interval(), ms(150));
        assert_eq!(gravity.next_fire(), Some(now + ms(150)));
    }
}
