//! Successful job results.

use std::path::{Path, PathBuf};
use std::time::Duration;

const MIB: f64 = 1024.0 * 1024.0;

/// How a job reached its destination file.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Bytes were transferred in this run.
    Downloaded {
        path: PathBuf,
        bytes: u64,
        elapsed: Duration,
    },
    /// Destination was already complete; nothing was transferred.
    AlreadyComplete { path: PathBuf, bytes: u64 },
}

impl Completion {
    pub fn path(&self) -> &Path {
        match self {
            Completion::Downloaded { path, .. } | Completion::AlreadyComplete { path, .. } => path,
        }
    }

    pub fn bytes(&self) -> u64 {
        match self {
            Completion::Downloaded { bytes, .. } | Completion::AlreadyComplete { bytes, .. } => {
                *bytes
            }
        }
    }

    pub fn size_mib(&self) -> f64 {
        self.bytes() as f64 / MIB
    }

    /// Effective throughput in MiB/s (None when nothing was transferred).
    pub fn mib_per_sec(&self) -> Option<f64> {
        match self {
            Completion::Downloaded { bytes, elapsed, .. } if !elapsed.is_zero() => {
                Some(*bytes as f64 / elapsed.as_secs_f64() / MIB)
            }
            _ => None,
        }
    }

    /// Effective throughput in megabits per second, as reported for HLS jobs.
    pub fn mbps(&self) -> Option<f64> {
        self.mib_per_sec().map(|m| m * 8.0)
    }
}
