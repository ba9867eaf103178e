use std::{fmt, str::FromStr};

use chrono::Timelike;

use crate::error::{OverlayError, OverlayResult};

/// Wall-clock time of day with second resolution.
///
/// Ordering follows the clock: `00:00:00` is the smallest value, `23:59:59`
/// the largest. There is no timezone notion; values are only ever compared
/// against the local wall clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8, second: u8) -> OverlayResult<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(OverlayError::validation(format!(
                "invalid time '{hour:02}:{minute:02}:{second:02}', expected format HH:MM:SS"
            )));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    /// Reads the local wall clock.
    pub fn now_local() -> Self {
        let now = chrono::Local::now();
        Self {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
            second: now.second() as u8,
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn second(self) -> u8 {
        self.second
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl FromStr for TimeOfDay {
    type Err = OverlayError;

    fn from_str(s: &str) -> OverlayResult<Self> {
        let invalid =
            || OverlayError::validation(format!("invalid time '{s}', expected format HH:MM:SS"));

        let bytes = s.as_bytes();
        if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
            return Err(invalid());
        }

        let field = |i: usize| -> Option<u8> {
            let hi = (bytes[i] as char).to_digit(10)?;
            let lo = (bytes[i + 1] as char).to_digit(10)?;
            Some((hi * 10 + lo) as u8)
        };
        let (Some(hour), Some(minute), Some(second)) = (field(0), field(3), field(6)) else {
            return Err(invalid());
        };

        Self::new(hour, minute, second).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = OverlayError;

    fn try_from(s: String) -> OverlayResult<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

/// Evaluates the daily downtime window against `now`.
///
/// A window with `start < end` covers `[start, end]`, inclusive on both ends.
/// A window with `start > end` crosses midnight and covers everything except
/// the daytime gap `[end, start)`. A window with `start == end` never matches;
/// neither branch takes it.
pub fn is_downtime(enabled: bool, now: TimeOfDay, start: TimeOfDay, end: TimeOfDay) -> bool {
    if !enabled {
        return false;
    }

    if start < end {
        now >= start && now <= end
    } else if start > end {
        !(now >= end && now < start)
    } else {
        false
    }
}
