//! The two kinds of accumulated totals: fixed elapsed durations and
//! calendar-relative periods.
//!
//! Both implement [`TemporalAmount`], the small interface the parser folds
//! entries through and the formatter converts from.

use std::fmt;

use chrono::{Days, Months, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{FormatError, ParseError};
use crate::provider::DateTimeProvider;
use crate::unit::TimeUnit;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// One `<magnitude><symbol>` token, resolved to its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub magnitude: u64,
    pub unit: TimeUnit,
}

/// A total that entries can be folded into and that can be expressed as a
/// signed nanosecond count.
pub trait TemporalAmount: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Short name used in error messages.
    const KIND: &'static str;

    fn zero() -> Self;

    /// Whether entries of `unit` can be added to this kind of amount.
    fn supports(unit: TimeUnit) -> bool;

    fn plus(self, entry: Entry) -> Result<Self, ParseError>;

    fn negate(self) -> Result<Self, ParseError>;

    /// Convert to a fixed nanosecond count. Calendar-relative amounts read
    /// `reference` exactly once; fixed amounts never read it.
    fn to_nanos(&self, reference: &DateTimeProvider) -> Result<i128, FormatError>;
}

// ── Elapsed ─────────────────────────────────────────────────────────────────

/// A signed, nanosecond-precision duration.
///
/// Backed by an `i128`, so it holds any sum of `u64` magnitudes of the
/// largest unit without wrapping. Conversions to [`TimeDelta`] and
/// [`std::time::Duration`] are fallible for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Elapsed {
    nanos: i128,
}

impl Elapsed {
    pub const ZERO: Elapsed = Elapsed { nanos: 0 };

    pub const fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self::from_nanos(secs as i128 * NANOS_PER_SECOND)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self::of(minutes, TimeUnit::Minutes)
    }

    pub const fn from_hours(hours: i64) -> Self {
        Self::of(hours, TimeUnit::Hours)
    }

    pub const fn from_days(days: i64) -> Self {
        Self::of(days, TimeUnit::Days)
    }

    /// `count` units of the fixed length given by [`TimeUnit::nanos`].
    pub const fn of(count: i64, unit: TimeUnit) -> Self {
        Self::ZERO.plus_count(count, unit)
    }

    // i64 × the largest unit stays far inside i128.
    const fn plus_count(self, count: i64, unit: TimeUnit) -> Self {
        Self::from_nanos(self.nanos + count as i128 * unit.nanos() as i128)
    }

    pub const fn as_nanos(&self) -> i128 {
        self.nanos
    }

    pub const fn is_negative(&self) -> bool {
        self.nanos < 0
    }

    pub const fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    pub fn checked_add(self, other: Elapsed) -> Option<Elapsed> {
        self.nanos.checked_add(other.nanos).map(Self::from_nanos)
    }

    /// `None` if the value exceeds the range of [`TimeDelta`].
    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        let secs = i64::try_from(self.nanos.div_euclid(NANOS_PER_SECOND)).ok()?;
        let subsec = self.nanos.rem_euclid(NANOS_PER_SECOND) as u32;
        TimeDelta::new(secs, subsec)
    }

    /// `None` if negative or beyond `u64` seconds.
    pub fn to_std(&self) -> Option<std::time::Duration> {
        if self.is_negative() {
            return None;
        }
        let secs = u64::try_from(self.nanos / NANOS_PER_SECOND).ok()?;
        let subsec = (self.nanos % NANOS_PER_SECOND) as u32;
        Some(std::time::Duration::new(secs, subsec))
    }
}

impl From<TimeDelta> for Elapsed {
    fn from(delta: TimeDelta) -> Self {
        time_delta_nanos(delta).into()
    }
}

impl From<std::time::Duration> for Elapsed {
    fn from(duration: std::time::Duration) -> Self {
        // u64 seconds in nanoseconds is below i128::MAX.
        Self::from_nanos(duration.as_nanos() as i128)
    }
}

impl From<i128> for Elapsed {
    fn from(nanos: i128) -> Self {
        Self::from_nanos(nanos)
    }
}

impl TemporalAmount for Elapsed {
    const KIND: &'static str = "elapsed";

    fn zero() -> Self {
        Self::ZERO
    }

    fn supports(_unit: TimeUnit) -> bool {
        true
    }

    fn plus(self, entry: Entry) -> Result<Self, ParseError> {
        let product = i128::from(entry.magnitude)
            .checked_mul(entry.unit.nanos() as i128)
            .ok_or(ParseError::Overflow)?;
        self.nanos
            .checked_add(product)
            .map(Self::from_nanos)
            .ok_or(ParseError::Overflow)
    }

    fn negate(self) -> Result<Self, ParseError> {
        self.nanos
            .checked_neg()
            .map(Self::from_nanos)
            .ok_or(ParseError::Overflow)
    }

    fn to_nanos(&self, _reference: &DateTimeProvider) -> Result<i128, FormatError> {
        Ok(self.nanos)
    }
}

// ── Period ──────────────────────────────────────────────────────────────────

/// A calendar amount of years, months and days.
///
/// Its absolute length depends on where it is applied: one month from
/// January 31 is shorter than one month from March 1. Fields are kept
/// separately and only collapsed into nanoseconds against a reference
/// date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Period {
    pub years: i64,
    pub months: i64,
    pub days: i64,
}

impl Period {
    pub const ZERO: Period = Period::new(0, 0, 0);

    pub const fn new(years: i64, months: i64, days: i64) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    pub const fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// Apply the period to `from`: years and months together first, then
    /// days. Month-end dates are clamped (January 31 + 1 month is the last
    /// day of February).
    ///
    /// Returns `None` if the result leaves chrono's supported range.
    pub fn resolve(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        let total_months = self.years.checked_mul(12)?.checked_add(self.months)?;
        let months = Months::new(u32::try_from(total_months.unsigned_abs()).ok()?);
        let shifted = if total_months >= 0 {
            from.checked_add_months(months)?
        } else {
            from.checked_sub_months(months)?
        };

        let days = Days::new(self.days.unsigned_abs());
        if self.days >= 0 {
            shifted.checked_add_days(days)
        } else {
            shifted.checked_sub_days(days)
        }
    }
}

impl TemporalAmount for Period {
    const KIND: &'static str = "calendar";

    fn zero() -> Self {
        Self::ZERO
    }

    fn supports(unit: TimeUnit) -> bool {
        unit.is_date_based()
    }

    fn plus(self, entry: Entry) -> Result<Self, ParseError> {
        let n = i64::try_from(entry.magnitude).map_err(|_| ParseError::Overflow)?;
        let add = |field: i64, factor: i64| {
            n.checked_mul(factor)
                .and_then(|delta| field.checked_add(delta))
                .ok_or(ParseError::Overflow)
        };

        let mut next = self;
        match entry.unit {
            TimeUnit::Days => next.days = add(self.days, 1)?,
            TimeUnit::Weeks => next.days = add(self.days, 7)?,
            TimeUnit::Months => next.months = add(self.months, 1)?,
            TimeUnit::Years => next.years = add(self.years, 1)?,
            TimeUnit::Decades => next.years = add(self.years, 10)?,
            unit => return Err(ParseError::UnsupportedUnit(unit)),
        }
        Ok(next)
    }

    fn negate(self) -> Result<Self, ParseError> {
        let neg = |field: i64| field.checked_neg().ok_or(ParseError::Overflow);
        Ok(Self::new(neg(self.years)?, neg(self.months)?, neg(self.days)?))
    }

    fn to_nanos(&self, reference: &DateTimeProvider) -> Result<i128, FormatError> {
        let base = reference.get();
        let end = self
            .resolve(base)
            .ok_or(FormatError::OutOfRange { reference: base })?;
        Ok(time_delta_nanos(end - base))
    }
}

fn time_delta_nanos(delta: TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * NANOS_PER_SECOND + i128::from(delta.subsec_nanos())
}
