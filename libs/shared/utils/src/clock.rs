use std::time::Instant;

use chrono::{Local, NaiveDate};

/// Source of "now" for debounce windows and the calendar's notion of today.
pub trait Clock: Send + Sync {
    /// Monotonic instant, used for measuring elapsed time.
    fn now(&self) -> Instant;

    /// Today's date in the clinic's local time zone.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
