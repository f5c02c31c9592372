//! Reference date-time used to resolve calendar-dependent amounts.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Produces the "current" local date-time a [`Period`](crate::Period) is
/// measured from.
///
/// Cloning is cheap; the underlying function is shared. Use [`fixed`] for
/// deterministic results and [`now`] for a live clock.
///
/// [`fixed`]: DateTimeProvider::fixed
/// [`now`]: DateTimeProvider::now
#[derive(Clone)]
pub struct DateTimeProvider(Arc<dyn Fn() -> NaiveDateTime + Send + Sync>);

impl DateTimeProvider {
    /// Wrap an arbitrary function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// The system clock, in local time.
    pub fn now() -> Self {
        Self::from_fn(|| Local::now().naive_local())
    }

    /// Midnight of the current local day, evaluated on every call.
    pub fn start_of_today() -> Self {
        Self::from_fn(|| Local::now().date_naive().and_time(chrono::NaiveTime::MIN))
    }

    /// Always the given instant.
    pub fn fixed(datetime: NaiveDateTime) -> Self {
        Self::from_fn(move || datetime)
    }

    /// Always midnight of the given date.
    pub fn start_of(date: NaiveDate) -> Self {
        Self::fixed(date.and_time(chrono::NaiveTime::MIN))
    }

    pub fn get(&self) -> NaiveDateTime {
        (self.0)()
    }
}

impl Default for DateTimeProvider {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Debug for DateTimeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DateTimeProvider").finish_non_exhaustive()
    }
}
