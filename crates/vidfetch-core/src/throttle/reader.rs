//! `Read` adapter that pays for every byte with limiter tokens.

use std::io::{self, Read};

use super::RateLimiter;

/// Wraps a reader; each successful read of `n > 0` bytes blocks until the
/// limiter has `n` tokens. Errors and EOF pass through without waiting.
///
/// Dropping the wrapper drops (closes) the inner reader; `into_inner` hands it back.
pub struct RateLimitedReader<'l, R> {
    inner: R,
    limiter: &'l mut RateLimiter,
}

impl<'l, R: Read> RateLimitedReader<'l, R> {
    pub fn new(inner: R, limiter: &'l mut RateLimiter) -> Self {
        Self { inner, limiter }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for RateLimitedReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.limiter.wait_n(n);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn copies_all_bytes() {
        let body: Vec<u8> = (0u8..=255).cycle().take(5_000).collect();
        let mut limiter = RateLimiter::new(1_000_000).unwrap();
        let mut out = Vec::new();
        let n = io::copy(
            &mut RateLimitedReader::new(&body[..], &mut limiter),
            &mut out,
        )
        .unwrap();
        assert_eq!(n, 5_000);
        assert_eq!(out, body);
    }

    #[test]
    fn throttles_to_rate() {
        // burst 1000, 3000 bytes => at least ~200ms of waiting.
        let body = vec![7u8; 3_000];
        let mut limiter = RateLimiter::new(10_000).unwrap();
        let start = Instant::now();
        let mut out = Vec::new();
        let mut reader = RateLimitedReader::new(&body[..], &mut limiter);
        let mut buf = [0u8; 500];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        let elapsed = start.elapsed();
        assert_eq!(out.len(), 3_000);
        assert!(elapsed >= Duration::from_millis(150), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(3), "elapsed {:?}", elapsed);
    }

    #[test]
    fn error_passes_through_without_tokens() {
        let mut limiter = RateLimiter::new(1).unwrap();
        let start = Instant::now();
        let mut reader = RateLimitedReader::new(FailingReader, &mut limiter);
        let mut buf = [0u8; 16];
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn eof_passes_through_without_tokens() {
        let mut limiter = RateLimiter::new(1).unwrap();
        let start = Instant::now();
        let empty: &[u8] = &[];
        let mut reader = RateLimitedReader::new(empty, &mut limiter);
        let mut buf = [0u8; 16];
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
