// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rand::RngExt;
use std::time::Duration;

/// Default first reconnect delay.
const DEFAULT_SEED: Duration = Duration::from_secs(1);

/// Default maximum reconnect delay.
const DEFAULT_CAP: Duration = Duration::from_secs(30);

/// Bounded exponential backoff for stream reconnection.
///
/// The policy is a pure function of the attempt number, which keeps the
/// reconnect schedule testable without real delays: tests call
/// [`BackoffPolicy::delay_for`] directly, and the connection manager adds
/// jitter on top at runtime. The retry count is unbounded; only the delay
/// is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    seed: Duration,
    /// Upper bound for any retry delay.
    cap: Duration,
}

impl BackoffPolicy {
    /// Creates a new backoff policy.
    ///
    /// # Arguments
    ///
    /// * `seed` - Delay before the first retry
    /// * `cap` - Maximum delay; raised to `seed` if smaller
    #[must_use]
    pub fn new(seed: Duration, cap: Duration) -> Self {
        Self {
            seed,
            cap: cap.max(seed),
        }
    }

    /// Returns the delay before retry number `attempt` (0-based).
    ///
    /// Doubles per attempt starting from the seed, saturating at the cap.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        // 2^32 is already far beyond any realistic cap; bounding the
        // exponent keeps the multiplication from overflowing.
        let factor: u32 = 2u32.saturating_pow(attempt.min(16));
        self.seed.saturating_mul(factor).min(self.cap)
    }

    /// Returns the delay for `attempt` with up to 25% random jitter added,
    /// so reconnecting clients do not stampede the server in lockstep.
    #[must_use]
    pub fn jittered(&self, attempt: u32) -> Duration {
        let base: Duration = self.delay_for(attempt);
        let max_jitter_ms: u64 = u64::try_from(base.as_millis() / 4).unwrap_or(u64::MAX);
        let jitter_ms: u64 = rand::rng().random_range(0..=max_jitter_ms);
        base + Duration::from_millis(jitter_ms)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, DEFAULT_CAP)
    }
}
