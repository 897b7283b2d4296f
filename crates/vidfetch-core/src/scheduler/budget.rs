//! Static bandwidth split.
//!
//! The total budget is divided by the batch size once, up front. Every task
//! builds its own limiter from that share; nothing is shared or rebalanced,
//! so a short final batch leaves part of the budget unused.

use crate::throttle::RateLimiter;

/// Bytes per second each job may use: `total / batch_size`, or 0 (unlimited)
/// when there is no total budget.
pub fn per_job_rate(total_bytes_per_sec: u64, batch_size: usize) -> u64 {
    if total_bytes_per_sec == 0 {
        return 0;
    }
    let share = total_bytes_per_sec / batch_size.max(1) as u64;
    // A budget smaller than the batch would round to "unlimited".
    share.max(1)
}

/// Fresh limiter for one job task (None = unlimited).
pub fn limiter_for_job(per_job_rate: u64) -> Option<RateLimiter> {
    RateLimiter::new(per_job_rate)
}
