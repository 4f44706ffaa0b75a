use chrono::{Local, NaiveDate, NaiveDateTime};

/// Clock abstracts access to the current wall time so reports stay deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local date-time.
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local date. Defaults to `now().date()`.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Real-time clock backed by the system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
