//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use mockable::Clock;

/// A clock whose current instant is set by the test.
///
/// # Examples
/// ```
/// use backend::test_support::MutableClock;
/// use chrono::{TimeZone, Utc};
/// use mockable::Clock;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("timestamp");
/// let clock = MutableClock::new(start);
/// clock.advance_seconds(30);
/// assert_eq!(clock.utc().timestamp() - start.timestamp(), 30);
/// ```
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// A clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    /// Jump to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    /// The calendar date services treat as "today".
    pub fn today(&self) -> NaiveDate {
        self.local().date_naive()
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
