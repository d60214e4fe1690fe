use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::input::Action;

/// Timing knobs for the whole game.
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names:
///
/// ```
/// use std::time::Duration;
///
/// use bentris_engine::GameConfig;
///
/// let config: GameConfig =
///     serde_json::from_str(r#"{ "gravity": { "min_interval_ms": 100 } }"#).unwrap();
/// assert_eq!(config.gravity.min_interval, Duration::from_millis(100));
/// assert_eq!(config.gravity.max_interval, Duration::from_millis(1000));
/// assert_eq!(config.input.horizontal_repeat, Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub input: RepeatTimings,
    pub gravity: GravityRamp,
}

/// Auto-repeat delays of the held-key actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepeatTimings {
    /// Delay between the first fire after a press and the second one.
    #[serde(rename = "first_repeat_delay_ms", with = "millis")]
    pub first_repeat_delay: Duration,
    #[serde(rename = "horizontal_repeat_ms", with = "millis")]
    pub horizontal_repeat: Duration,
    #[serde(rename = "rotate_repeat_ms", with = "millis")]
    pub rotate_repeat: Duration,
    #[serde(rename = "soft_drop_repeat_ms", with = "millis")]
    pub soft_drop_repeat: Duration,
}

impl Default for RepeatTimings {
    fn default() -> Self {
        Self {
            first_repeat_delay: Duration::from_millis(250),
            horizontal_repeat: Duration::from_millis(100),
            rotate_repeat: Duration::from_millis(250),
            soft_drop_repeat: Duration::from_millis(50),
        }
    }
}

impl RepeatTimings {
    /// Steady repeat delay of `action`; `None` for one-shot actions.
    #[must_use]
    pub fn repeat_interval(&self, action: Action) -> Option<Duration> {
        match action {
            Action::MoveLeft | Action::MoveRight => Some(self.horizontal_repeat),
            Action::Rotate => Some(self.rotate_repeat),
            Action::SoftDrop => Some(self.soft_drop_repeat),
            Action::HardDrop => None,
        }
    }
}

/// Linear speed-up of automatic falling over the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GravityRamp {
    /// Interval at the start of a session.
    #[serde(rename = "max_interval_ms", with = "millis")]
    pub max_interval: Duration,
    /// Floor reached once the ramp is over.
    #[serde(rename = "min_interval_ms", with = "millis")]
    pub min_interval: Duration,
    /// Elapsed session time at which the floor is reached.
    #[serde(rename = "ramp_duration_ms", with = "millis")]
    pub ramp_duration: Duration,
}

impl Default for GravityRamp {
    fn default() -> Self {
        Self {
            max_interval: Duration::from_millis(1000),
            min_interval: Duration::from_millis(150),
            ramp_duration: Duration::from_secs(10 * 60),
        }
    }
}

impl GravityRamp {
    /// Gravity interval after `elapsed` session time.
    ///
    /// `max - (max - min) * min(1, elapsed / ramp)`, evaluated in integer
    /// nanoseconds. A floor above the ceiling is treated as the ceiling.
    #[must_use]
    pub fn interval_at(&self, elapsed: Duration) -> Duration {
        let span = self.max_interval.saturating_sub(self.min_interval);
        let ramp = self.ramp_duration.as_nanos();
        if ramp == 0 {
            return self.max_interval - span;
        }
        let progress = elapsed.as_nanos().min(ramp);
        let speedup = span.as_nanos() * progress / ramp;
        let speedup = Duration::from_nanos(u64::try_from(speedup).unwrap_or(u64::MAX));
        self.max_interval.saturating_sub(speedup)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_gravity_ramp_endpoints() {
        let ramp = GravityRamp::default();
        assert_eq!(ramp.interval_at(Duration::ZERO), ms(1000));
        assert_eq!(ramp.interval_at(Duration::from_secs(600)), ms(150));
        assert_eq!(ramp.interval_at(Duration::from_secs(3600)), ms(150));
        assert_eq!(ramp.interval_at(Duration::from_secs(300)), ms(575));
    }

    #[test]
    fn test_gravity_ramp_is_non_increasing() {
        let ramp = GravityRamp::default();
        let mut previous = ramp.interval_at(Duration::ZERO);
        for secs in (0..=700).step_by(7) {
            let interval = ramp.interval_at(Duration::from_secs(secs));
            assert!(
                interval <= previous,
                "interval grew at {secs}s: {interval:?} > {previous:?}"
            );
            assert!(interval >= ms(150) && interval <= ms(1000));
            previous = interval;
        }
    }

    #[test]
    fn test_gravity_ramp_degenerate() {
        let instant = GravityRamp {
            ramp_duration: Duration::ZERO,
            ..GravityRamp::default()
        };
        assert_eq!(instant.interval_at(Duration::ZERO), ms(150));

        let inverted = GravityRamp {
            max_interval: ms(100),
            min_interval: ms(400),
            ..GravityRamp::default()
        };
        assert_eq!(inverted.interval_at(Duration::from_secs(900)), ms(100));
    }

    #[test]
    fn test_repeat_intervals() {
        let timings = RepeatTimings::default();
        assert_eq!(timings.repeat_interval(Action::MoveLeft), Some(ms(100)));
        assert_eq!(timings.repeat_interval(Action::MoveRight), Some(ms(100)));
        assert_eq!(timings.repeat_interval(Action::Rotate), Some(ms(250)));
        assert_eq!(timings.repeat_interval(Action::SoftDrop), Some(ms(50)));
        assert_eq!(timings.repeat_interval(Action::HardDrop), None);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["input"]["first_repeat_delay_ms"], 250);
        assert_eq!(json["gravity"]["ramp_duration_ms"], 600_000);

        let parsed: GameConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let result = serde_json::from_str::<GameConfig>(r#"{ "input": { "das_ms": 10 } }"#);
        assert!(result.is_err());
    }
}
