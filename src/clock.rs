//! Time sources for token issuance and freshness checks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::ConfigError;

/// Current time as Unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // Pre-epoch system time reads as the epoch
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A clock that only moves when told to. Used for vectors and tests.
#[derive(Debug, Default)]
pub struct FixedClock {
    secs: AtomicU64,
}

impl FixedClock {
    pub fn new(secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(secs),
        }
    }

    /// Parse an RFC 3339 timestamp such as `1985-10-26T01:20:00-07:00`.
    pub fn from_rfc3339(value: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_rfc3339(value)?))
    }

    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> u64 {
        (**self).now()
    }
}

/// Unix seconds of an RFC 3339 timestamp. Instants before 1970 are rejected.
pub fn parse_rfc3339(value: &str) -> Result<u64, ConfigError> {
    let parsed = DateTime::parse_from_rfc3339(value).map_err(|e| ConfigError::InvalidTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    u64::try_from(parsed.timestamp()).map_err(|_| ConfigError::InvalidTimestamp {
        value: value.to_string(),
        reason: "before the Unix epoch".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_timestamps() {
        let clock = FixedClock::from_rfc3339("1985-10-26T01:20:00-07:00").unwrap();
        assert_eq!(clock.now(), 499_162_800);
    }

    #[test]
    fn parses_utc_timestamps() {
        assert_eq!(parse_rfc3339("1988-05-04T00:00:00Z").unwrap(), 578_707_200);
    }

    #[test]
    fn rejects_pre_epoch() {
        let err = parse_rfc3339("1969-12-31T23:59:59Z").unwrap_err();
        assert!(err.to_string().contains("before the Unix epoch"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(FixedClock::from_rfc3339("yesterday").is_err());
    }

    #[test]
    fn fixed_clock_moves_only_when_told() {
        let clock = FixedClock::new(100);
        assert_eq!(clock.now(), 100);
        clock.advance(10);
        assert_eq!(clock.now(), 110);
        clock.set(5);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }
}
