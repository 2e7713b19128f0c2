use std::time::Duration;

/// Capped exponential backoff over the base poll cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    cadence: Duration,
    max_multiplier: u32,
    consecutive_failures: u32,
}

impl Backoff {
    pub fn new(cadence: Duration, max_multiplier: u32) -> Self {
        Self {
            cadence,
            max_multiplier: max_multiplier.max(1),
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.consecutive_failures = 0;
    }

    /// `cadence * min(2^k, max_multiplier)` for `k` consecutive failures.
    pub fn next_delay(&self) -> Duration {
        let factor = 1u32
            .checked_shl(self.consecutive_failures)
            .unwrap_or(u32::MAX)
            .min(self.max_multiplier);
        self.cadence.saturating_mul(factor)
    }
}
