//! Source of "now" for every component that needs the local wall time.

use time::{OffsetDateTime, UtcOffset};

/// Provides the current local time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Returns the current instant expressed in the local offset.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock pinned to the local offset captured at startup.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Creates a clock reporting time in `offset`.
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Resolves the local offset from the platform, falling back to UTC.
    ///
    /// Must run before any additional threads are spawned; the `time` crate
    /// refuses to read the local offset from a multi-threaded process.
    pub fn from_local_offset() -> Self {
        Self::new(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// Clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    now: OffsetDateTime,
}

impl FixedClock {
    /// Creates a clock that always reports `now`.
    pub fn new(now: OffsetDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.now
    }
}
