//! Token-bucket throughput shaping.
//!
//! A `RateLimiter` belongs to exactly one job task. Readers borrow it through
//! `RateLimitedReader`, so every stream a job opens (asset body, playlists,
//! segments) draws from the same bucket. A rate of 0 means no limiter at all:
//! callers get `None` and use the raw stream.

mod reader;

pub use reader::RateLimitedReader;

use std::time::{Duration, Instant};

/// Largest burst reserve, in bytes.
pub const MAX_BURST: u64 = 16 * 1024;

/// Burst capacity for a rate: at most 100ms of data or 16 KiB, whichever is smaller (never 0).
pub fn burst_for(rate_per_sec: u64) -> u64 {
    (rate_per_sec / 10).min(MAX_BURST).max(1)
}

/// Token bucket refilled continuously at `rate_per_sec`, capped at `burst` tokens.
/// One token = one byte.
#[derive(Debug)]
pub struct RateLimiter {
    rate_per_sec: u64,
    burst: u64,
    tokens: f64,
    last: Instant,
}

impl RateLimiter {
    /// Returns `None` when `rate_per_sec` is 0 (unlimited).
    pub fn new(rate_per_sec: u64) -> Option<Self> {
        Self::new_at(rate_per_sec, Instant::now())
    }

    fn new_at(rate_per_sec: u64, now: Instant) -> Option<Self> {
        if rate_per_sec == 0 {
            return None;
        }
        let burst = burst_for(rate_per_sec);
        Some(Self {
            rate_per_sec,
            burst,
            tokens: burst as f64,
            last: now,
        })
    }

    pub fn rate_per_sec(&self) -> u64 {
        self.rate_per_sec
    }

    pub fn burst(&self) -> u64 {
        self.burst
    }

    /// Takes `n` tokens as of `now` and returns how long the caller must wait
    /// before the bytes are paid for. A request larger than the burst drives
    /// the bucket into debt; later refills repay it.
    pub(crate) fn reserve_at(&mut self, n: u64, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last).as_secs_f64();
        self.last = now;
        self.tokens = (self.tokens + elapsed * self.rate_per_sec as f64).min(self.burst as f64);
        self.tokens -= n as f64;
        if self.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-self.tokens / self.rate_per_sec as f64)
        }
    }

    /// Blocks the calling thread until `n` tokens are available.
    pub fn wait_n(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        let wait = self.reserve_at(n as u64, Instant::now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }
}
