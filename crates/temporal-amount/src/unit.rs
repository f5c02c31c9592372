//! Elementary time units and their fixed-length table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_DAY: u128 = 24 * 60 * 60 * NANOS_PER_SECOND;

/// A fixed granularity of time.
///
/// Variants are declared from smallest to largest, so the derived `Ord`
/// matches their lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanos,
    Micros,
    Millis,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
    Decades,
}

impl TimeUnit {
    /// Every unit, smallest first.
    pub const ALL: [TimeUnit; 11] = [
        TimeUnit::Nanos,
        TimeUnit::Micros,
        TimeUnit::Millis,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Weeks,
        TimeUnit::Months,
        TimeUnit::Years,
        TimeUnit::Decades,
    ];

    /// Fixed length in nanoseconds.
    ///
    /// Months count as 30 days and years as 365 days. These are estimates
    /// used for elapsed durations and for formatting; calendar-exact lengths
    /// come from [`Period`](crate::Period) resolution instead.
    pub const fn nanos(self) -> u128 {
        match self {
            TimeUnit::Nanos => 1,
            TimeUnit::Micros => 1_000,
            TimeUnit::Millis => 1_000_000,
            TimeUnit::Seconds => NANOS_PER_SECOND,
            TimeUnit::Minutes => 60 * NANOS_PER_SECOND,
            TimeUnit::Hours => 60 * 60 * NANOS_PER_SECOND,
            TimeUnit::Days => NANOS_PER_DAY,
            TimeUnit::Weeks => 7 * NANOS_PER_DAY,
            TimeUnit::Months => 30 * NANOS_PER_DAY,
            TimeUnit::Years => 365 * NANOS_PER_DAY,
            TimeUnit::Decades => 10 * 365 * NANOS_PER_DAY,
        }
    }

    /// How many of this unit make up the next larger one.
    ///
    /// `None` for years and decades: their counts are never wrapped.
    pub const fn cycle(self) -> Option<u128> {
        match self {
            TimeUnit::Nanos | TimeUnit::Micros | TimeUnit::Millis => Some(1_000),
            TimeUnit::Seconds | TimeUnit::Minutes => Some(60),
            TimeUnit::Hours => Some(24),
            TimeUnit::Days => Some(7),
            TimeUnit::Weeks => Some(4),
            TimeUnit::Months => Some(12),
            TimeUnit::Years | TimeUnit::Decades => None,
        }
    }

    /// Whether the unit is a whole number of days or calendar fields.
    pub const fn is_date_based(self) -> bool {
        matches!(
            self,
            TimeUnit::Days
                | TimeUnit::Weeks
                | TimeUnit::Months
                | TimeUnit::Years
                | TimeUnit::Decades
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            TimeUnit::Nanos => "nanos",
            TimeUnit::Micros => "micros",
            TimeUnit::Millis => "millis",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
            TimeUnit::Decades => "decades",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no [`TimeUnit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time unit '{0}'")]
pub struct UnknownTimeUnit(pub String);

impl FromStr for TimeUnit {
    type Err = UnknownTimeUnit;

    /// Accepts the plural name (`"days"`) or its singular (`"day"`),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TimeUnit::ALL
            .into_iter()
            .find(|unit| {
                let name = unit.name();
                lower == name || Some(lower.as_str()) == name.strip_suffix('s')
            })
            .ok_or_else(|| UnknownTimeUnit(s.to_string()))
    }
}
