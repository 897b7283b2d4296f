//! Per-job failure taxonomy.
//!
//! Every failure is local to one job: the scheduler catches it at the task
//! boundary, logs it with the job's identity and moves on. Nothing here is
//! retried.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// URL could not be parsed or its path has the wrong shape.
    #[error("invalid source {url}: {reason}")]
    InvalidSource { url: String, reason: String },

    /// Server answered with a non-2xx status.
    #[error("bad status from {url}: {status}")]
    BadStatus { url: String, status: String },

    /// Transfer failed before an HTTP status was available (DNS, connect, reset).
    #[error("transfer of {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Master playlist lists variants but none has a usable URI.
    #[error("no usable variant stream in master playlist {url}")]
    NoVariant { url: String },

    /// Media playlist yielded zero segment references.
    #[error("no segments in media playlist {url}")]
    EmptyPlaylist { url: String },

    #[error("segment {index} ({url}) failed: {reason}")]
    SegmentFetchFailed {
        index: usize,
        url: String,
        reason: String,
    },

    /// Muxer ran but exited non-zero (or could not be spawned).
    #[error("remux failed: {reason}")]
    RemuxFailed { reason: String },

    /// The job's task panicked before producing a result.
    #[error("download task panicked: {reason}")]
    TaskPanicked { reason: String },

    #[error("{context} {}: {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_source(url: &str, reason: impl Into<String>) -> Self {
        DownloadError::InvalidSource {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = DownloadError> = std::result::Result<T, E>;
