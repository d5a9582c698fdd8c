//! Exponential backoff schedule for retrying remote calls
//!
//! A [`BackoffPolicy`] is a pure description of how long to wait before each
//! retry. It holds no failure counter of its own; every retry sequence counts
//! its own failures and asks the policy for the matching delay.

use std::time::Duration;

use crate::error::SyncError;

/// Default number of delay units before the first retry
pub const DEFAULT_FIRST_DELAY: u64 = 1;

/// Default delay unit
pub const DEFAULT_DELAY_UNIT: Duration = Duration::from_secs(1);

/// Default growth factor between consecutive delays
pub const DEFAULT_FACTOR: f64 = 2.0;

/// Default maximum number of retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Exponential backoff policy
///
/// The delay before the n-th retry (1-indexed) is
/// `round(factor^(n-1) * first_delay)` units.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    first_delay: u64,
    unit: Duration,
    factor: f64,
    max_retries: u32,
}

impl BackoffPolicy {
    /// Create a new backoff policy
    ///
    /// # Arguments
    ///
    /// * `first_delay` - Number of `unit`s to wait before the first retry (>= 1)
    /// * `unit` - Time unit the delays are counted in
    /// * `factor` - Base of the power function growing the delays
    /// * `max_retries` - Number of retries allowed after the initial attempt (>= 1)
    pub fn new(
        first_delay: u64,
        unit: Duration,
        factor: f64,
        max_retries: u32,
    ) -> Result<Self, SyncError> {
        if first_delay < 1 {
            return Err(SyncError::InvalidPolicy("A delay is required.".to_string()));
        }
        if max_retries < 1 {
            return Err(SyncError::InvalidPolicy(
                "A number of retries must be specified.".to_string(),
            ));
        }

        Ok(Self {
            first_delay,
            unit,
            factor,
            max_retries,
        })
    }

    /// Policy applied to every remote call: 1s, 2s, 4s, then give up
    pub fn with_defaults() -> Self {
        Self {
            first_delay: DEFAULT_FIRST_DELAY,
            unit: DEFAULT_DELAY_UNIT,
            factor: DEFAULT_FACTOR,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Maximum number of retries after the initial attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Growth factor between consecutive delays
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Delay before the given retry, or `None` once retries are exhausted
    ///
    /// `retry` is 1-indexed: `delay_for(1)` is the wait after the first failure.
    pub fn delay_for(&self, retry: u32) -> Option<Duration> {
        if retry == 0 || retry > self.max_retries {
            return None;
        }

        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let units = (self.factor.powi(exponent) * self.first_delay as f64).round();
        // Negative or NaN products collapse to an immediate retry
        let units = if units.is_nan() || units <= 0.0 {
            0
        } else {
            units as u64
        };

        let delay = u32::try_from(units)
            .ok()
            .and_then(|n| self.unit.checked_mul(n))
            .unwrap_or(Duration::MAX);

        Some(delay)
    }

    /// Full delay schedule, one entry per allowed retry
    pub fn schedule(&self) -> Vec<Duration> {
        (1..=self.max_retries)
            .filter_map(|retry| self.delay_for(retry))
            .collect()
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // Test 1: Default schedule is 1s, 2s, 4s
    #[test]
    fn test_default_schedule() {
        let policy = BackoffPolicy::with_defaults();

        assert_eq!(policy.max_retries(), 3);
        assert_eq!(
            policy.schedule(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    // Test 2: No delay once retries are exhausted
    #[test]
    fn test_no_delay_after_max_retries() {
        let policy = BackoffPolicy::new(1, Duration::from_secs(1), 2.0, 3).unwrap();

        assert!(policy.delay_for(3).is_some());
        assert_eq!(policy.delay_for(4), None);
        assert_eq!(policy.delay_for(0), None);
    }

    // Test 3: Delays round to the nearest whole unit
    #[test]
    fn test_delay_rounding() {
        let policy = BackoffPolicy::new(3, Duration::from_millis(1), 1.5, 4).unwrap();

        // 3, 4.5, 6.75, 10.125
        assert_eq!(policy.delay_for(1), Some(Duration::from_millis(3)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_millis(5)));
        assert_eq!(policy.delay_for(3), Some(Duration::from_millis(7)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_millis(10)));
    }

    // Test 4: Factor below one shrinks delays
    #[test]
    fn test_shrinking_factor() {
        let policy = BackoffPolicy::new(10, Duration::from_secs(1), 0.5, 3).unwrap();

        assert_eq!(
            policy.schedule(),
            vec![
                Duration::from_secs(10),
                Duration::from_secs(5),
                Duration::from_secs(3)
            ]
        );
    }

    // Test 5: Zero first delay is rejected
    #[test]
    fn test_zero_first_delay_rejected() {
        let err = BackoffPolicy::new(0, Duration::from_secs(1), 2.0, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPolicy);
    }

    // Test 6: Zero max retries is rejected
    #[test]
    fn test_zero_max_retries_rejected() {
        let err = BackoffPolicy::new(1, Duration::from_secs(1), 2.0, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPolicy);
    }

    // Test 7: Schedule length matches max retries
    #[test]
    fn test_schedule_length() {
        let policy = BackoffPolicy::new(1, Duration::from_millis(1), 2.0, 7).unwrap();
        assert_eq!(policy.schedule().len(), 7);
        assert_eq!(policy.delay_for(7), Some(Duration::from_millis(64)));
    }
}
