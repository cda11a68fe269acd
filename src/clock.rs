//! Time source used by license expiry checks.

use chrono::{DateTime, Utc};

/// Source of the current UTC time.
pub trait Clock: Send + Sync {
    /// Get the current UTC time.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant, for expiry tests.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

#[cfg(any(test, feature = "test-seams"))]
impl FixedClock {
    /// Pin the clock at `at`.
    pub fn at(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Pin the clock at an RFC 3339 timestamp.
    ///
    /// # Panics
    /// Panics if `s` is not valid RFC 3339.
    pub fn at_rfc3339(s: &str) -> Self {
        let at = DateTime::parse_from_rfc3339(s)
            .expect("valid RFC 3339")
            .with_timezone(&Utc);
        Self(at)
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
