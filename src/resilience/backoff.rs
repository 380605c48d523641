//! Exponential backoff with optional jitter.

use std::time::Duration;
use rand::Rng;

/// Delay before retrying after the `attempt`-th failure (1-based).
///
/// `base_ms × 2^(attempt-1)`, capped at `max_ms`. Attempt 0 waits nothing.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    Duration::from_millis(delay_ms.min(max_ms))
}

/// Add 0 to 10% jitter, never exceeding `max`.
pub fn apply_jitter(delay: Duration, max: Duration) -> Duration {
    let delay_ms = delay.as_millis() as u64;
    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter).min(max)
}
