//! Calendar-aware duration value rendered as an ISO-8601 duration.
//!
//! # Design
//! `std::time::Duration` and `chrono::TimeDelta` are fixed-length spans and
//! cannot express "one month" or "one year". `IsoDuration` keeps each unit
//! as its own magnitude plus a sign flag, which is what the ISO-8601
//! `PnYnMnDTnHnMnS` form describes. Fields are public; the codec rejects
//! values that cannot be rendered.

use std::fmt;

use crate::scalar;

pub(crate) const MICROS_PER_SECOND: u32 = 1_000_000;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// A signed span expressed in ISO-8601 units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IsoDuration {
    /// Negative duration, rendered with a leading `-`.
    pub inverted: bool,
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Fractional seconds. Must be below one second.
    pub microseconds: u32,
}

impl IsoDuration {
    pub fn days(days: u64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    pub fn seconds(seconds: u64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// The same magnitudes with the sign flipped.
    pub fn negated(self) -> Self {
        Self {
            inverted: !self.inverted,
            ..self
        }
    }

    /// `true` when every magnitude is zero, regardless of sign.
    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
            && self.microseconds == 0
    }

    /// Split a non-negative span into days, hours, minutes, seconds and
    /// microseconds. Years and months are never produced because their
    /// length is not fixed.
    fn from_span(total_seconds: u64, subsec_micros: u32, inverted: bool) -> Self {
        Self {
            inverted,
            years: 0,
            months: 0,
            days: total_seconds / SECONDS_PER_DAY,
            hours: total_seconds % SECONDS_PER_DAY / SECONDS_PER_HOUR,
            minutes: total_seconds % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: total_seconds % SECONDS_PER_MINUTE,
            microseconds: subsec_micros,
        }
    }
}

impl From<std::time::Duration> for IsoDuration {
    fn from(d: std::time::Duration) -> Self {
        Self::from_span(d.as_secs(), d.subsec_micros(), false)
    }
}

impl From<chrono::TimeDelta> for IsoDuration {
    fn from(delta: chrono::TimeDelta) -> Self {
        let inverted = delta < chrono::TimeDelta::zero();
        let magnitude = if inverted { -delta } else { delta };
        let total_seconds = magnitude.num_seconds().unsigned_abs();
        let subsec_micros = magnitude.subsec_nanos().unsigned_abs() / 1_000;
        Self::from_span(total_seconds, subsec_micros, inverted)
    }
}

/// Formats with [`scalar::duration_to_string`]. Fails for values it rejects.
impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match scalar::duration_to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}
