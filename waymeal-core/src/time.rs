//! Wall-clock helpers for departure, eating and arrival times.
//!
//! Times of day are stored as seconds since midnight. Comparisons are naive
//! and same-day: `23:30` is never "before" `00:15`.

use std::str::FromStr;

use thiserror::Error;

const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 3_600;
const SECONDS_PER_DAY: u32 = 86_400;

/// A wall-clock time within a single day.
///
/// # Examples
/// ```
/// use waymeal_core::TimeOfDay;
///
/// let departure: TimeOfDay = "08:00".parse()?;
/// let eat_at: TimeOfDay = "09:30".parse()?;
/// assert_eq!(departure.seconds_until(eat_at), 5_400);
/// assert_eq!(eat_at.to_string(), "09:30");
/// # Ok::<(), waymeal_core::TimeParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

/// Errors returned when parsing a [`TimeOfDay`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    /// The input was empty.
    #[error("time of day is empty")]
    Empty,
    /// The input did not look like `HH:MM` or `HH:MM:SS`.
    #[error("expected HH:MM, found {input:?}")]
    Format {
        /// Text supplied by the caller.
        input: String,
    },
    /// A component exceeded its range, e.g. `25:00`.
    #[error("{component} {value} is out of range in {input:?}")]
    OutOfRange {
        /// Text supplied by the caller.
        input: String,
        /// The offending component name.
        component: &'static str,
        /// The parsed component value.
        value: u32,
    },
}

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: Self = Self(0);

    /// Construct a time from hours and minutes.
    ///
    /// Returns `None` when either component is out of range.
    #[must_use]
    pub const fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        if hours >= 24 || minutes >= 60 {
            return None;
        }
        Some(Self(hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE))
    }

    /// Parse `HH:MM` (or `H:MM`, or `HH:MM:SS`) into a time of day.
    ///
    /// # Errors
    ///
    /// Returns [`TimeParseError`] when the text is empty, malformed or has an
    /// out-of-range component.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TimeParseError::Empty);
        }
        let format_error = || TimeParseError::Format {
            input: trimmed.to_owned(),
        };
        let mut parts = trimmed.split(':');
        let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
            return Err(format_error());
        };
        let s = parts.next();
        if parts.next().is_some() {
            return Err(format_error());
        }

        let hours = parse_component(h, 2).ok_or_else(format_error)?;
        let minutes = parse_component(m, 2)
            .filter(|_| m.len() == 2)
            .ok_or_else(format_error)?;
        let seconds = match s {
            Some(raw) => parse_component(raw, 2)
                .filter(|_| raw.len() == 2)
                .ok_or_else(format_error)?,
            None => 0,
        };

        let check = |component: &'static str, value: u32, limit: u32| {
            if value < limit {
                Ok(value)
            } else {
                Err(TimeParseError::OutOfRange {
                    input: trimmed.to_owned(),
                    component,
                    value,
                })
            }
        };
        let hours = check("hours", hours, 24)?;
        let minutes = check("minutes", minutes, 60)?;
        let seconds = check("seconds", seconds, 60)?;
        Ok(Self(
            hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds,
        ))
    }

    /// Seconds since midnight.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// Signed seconds from `self` until `later` on the same day.
    ///
    /// Negative when `later` is earlier in the day.
    #[must_use]
    pub fn seconds_until(self, later: Self) -> i64 {
        i64::from(later.0) - i64::from(self.0)
    }

    /// The clock reading after `elapsed_s` seconds, wrapping past midnight.
    ///
    /// Non-finite or negative offsets are treated as zero.
    #[must_use]
    pub fn clock_after(self, elapsed_s: f64) -> ClockTime {
        ClockTime::from_seconds(f64::from(self.0) + sanitise_seconds(elapsed_s))
    }
}

fn parse_component(raw: &str, max_len: usize) -> Option<u32> {
    if raw.is_empty() || raw.len() > max_len || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn sanitise_seconds(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clock = ClockTime::from_seconds(f64::from(self.0));
        write!(f, "{:02}:{:02}", clock.hours, clock.minutes)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TimeOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A wall-clock reading split into hours, minutes and seconds.
///
/// Hours wrap modulo 24, so a 26 hour drive reads `02:00:00`. Multi-day
/// journeys therefore show a time of day, not a day count.
///
/// # Examples
/// ```
/// use waymeal_core::ClockTime;
///
/// let clock = ClockTime::from_seconds(90_061.0);
/// assert_eq!(clock.to_string(), "01:01:01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime {
    /// Hours in `0..24`.
    pub hours: u8,
    /// Minutes in `0..60`.
    pub minutes: u8,
    /// Seconds in `0..60`.
    pub seconds: u8,
}

impl ClockTime {
    /// Decompose a number of seconds into a wrapped clock reading.
    ///
    /// Fractional seconds are truncated; negative and non-finite input reads
    /// as midnight.
    #[must_use]
    pub fn from_seconds(total_seconds: f64) -> Self {
        let whole = sanitise_seconds(total_seconds).floor();
        // Reduce before casting so the integer conversion stays in range.
        let within_day = whole.rem_euclid(f64::from(SECONDS_PER_DAY));
        let secs = within_day as u32;
        let hours = secs / SECONDS_PER_HOUR;
        let minutes = (secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let seconds = secs % SECONDS_PER_MINUTE;
        Self {
            hours: clamp_u8(hours),
            minutes: clamp_u8(minutes),
            seconds: clamp_u8(seconds),
        }
    }
}

fn clamp_u8(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}
