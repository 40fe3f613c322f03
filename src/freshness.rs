//! Issuance timestamps and the TTL / clock-skew acceptance window.
//!
//! Timestamps are Unix seconds, packed as 8 bytes big-endian.

use std::time::Duration;

use crate::error::FreshnessError;

/// Packed timestamp length in bytes.
pub const TIMESTAMP_LENGTH: usize = 8;

/// How far ahead of the verifier's clock a token may claim to be issued.
pub const DEFAULT_MAX_CLOCK_SKEW: Duration = Duration::from_secs(60);

pub fn pack_time(secs: u64) -> [u8; TIMESTAMP_LENGTH] {
    secs.to_be_bytes()
}

pub fn unpack_time(bytes: [u8; TIMESTAMP_LENGTH]) -> u64 {
    u64::from_be_bytes(bytes)
}

/// Acceptance window for token timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    /// Maximum token age. `None` or zero disables expiry. Fractional
    /// seconds round up, so any non-zero ttl expires tokens.
    pub ttl: Option<Duration>,
    pub max_clock_skew: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            ttl: None,
            max_clock_skew: DEFAULT_MAX_CLOCK_SKEW,
        }
    }
}

impl FreshnessPolicy {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    pub fn with_ttl(self, ttl: Option<Duration>) -> Self {
        Self { ttl, ..self }
    }

    pub fn with_max_clock_skew(self, max_clock_skew: Duration) -> Self {
        Self {
            max_clock_skew,
            ..self
        }
    }

    /// Check a token issued at `issued_at` against `now`.
    ///
    /// A token exactly `ttl` seconds old is still fresh.
    pub fn check(&self, issued_at: u64, now: u64) -> Result<(), FreshnessError> {
        if let Some(ttl) = self.ttl.filter(|ttl| !ttl.is_zero()).map(whole_secs_rounded_up) {
            let age = now.saturating_sub(issued_at);
            if age > ttl {
                return Err(FreshnessError::Expired { age, ttl });
            }
        }

        let max_skew = self.max_clock_skew.as_secs();
        if issued_at > now.saturating_add(max_skew) {
            return Err(FreshnessError::TooFarInFuture {
                ahead: issued_at - now,
                max_skew,
            });
        }
        Ok(())
    }
}

fn whole_secs_rounded_up(ttl: Duration) -> u64 {
    ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 578_707_200;

    #[test]
    fn packs_big_endian() {
        assert_eq!(pack_time(NOW), [0, 0, 0, 0, 0x22, 0x7e, 0x5f, 0x00]);
        assert_eq!(unpack_time(pack_time(NOW)), NOW);
    }

    #[test]
    fn age_equal_to_ttl_is_fresh() {
        let policy = FreshnessPolicy::new(Some(Duration::from_secs(5)));
        assert!(policy.check(NOW, NOW + 5).is_ok());
    }

    #[test]
    fn age_past_ttl_is_expired() {
        let policy = FreshnessPolicy::new(Some(Duration::from_secs(5)));
        assert_eq!(
            policy.check(NOW, NOW + 6),
            Err(FreshnessError::Expired { age: 6, ttl: 5 })
        );
    }

    #[test]
    fn zero_ttl_disables_expiry() {
        let policy = FreshnessPolicy::new(Some(Duration::ZERO));
        assert!(policy.check(NOW, NOW + 86_400).is_ok());
    }

    #[test]
    fn sub_second_ttl_still_expires() {
        let policy = FreshnessPolicy::new(Some(Duration::from_millis(900)));
        assert!(policy.check(NOW, NOW + 1).is_ok());
        assert_eq!(
            policy.check(NOW, NOW + 100_000),
            Err(FreshnessError::Expired { age: 100_000, ttl: 1 })
        );
    }

    #[test]
    fn fractional_ttl_rounds_up() {
        let policy = FreshnessPolicy::new(Some(Duration::from_millis(1500)));
        assert!(policy.check(NOW, NOW + 2).is_ok());
        assert_eq!(
            policy.check(NOW, NOW + 3),
            Err(FreshnessError::Expired { age: 3, ttl: 2 })
        );
    }

    #[test]
    fn no_ttl_disables_expiry() {
        assert!(FreshnessPolicy::default().check(0, NOW).is_ok());
    }

    #[test]
    fn future_within_skew_is_accepted() {
        assert!(FreshnessPolicy::default().check(NOW + 60, NOW).is_ok());
    }

    #[test]
    fn future_past_skew_is_rejected() {
        assert_eq!(
            FreshnessPolicy::default().check(NOW + 61, NOW),
            Err(FreshnessError::TooFarInFuture {
                ahead: 61,
                max_skew: 60
            })
        );
    }

    #[test]
    fn skew_check_applies_alongside_ttl() {
        let policy = FreshnessPolicy::new(Some(Duration::from_secs(5)))
            .with_max_clock_skew(Duration::from_secs(10));
        assert!(matches!(
            policy.check(NOW + 11, NOW),
            Err(FreshnessError::TooFarInFuture { .. })
        ));
        assert!(policy.check(NOW + 10, NOW).is_ok());
    }

    #[test]
    fn skew_does_not_overflow_near_u64_max() {
        assert!(FreshnessPolicy::default().check(u64::MAX, u64::MAX - 1).is_ok());
    }
}
