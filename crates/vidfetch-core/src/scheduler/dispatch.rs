//! Job-kind dispatch: the one place a job's kind is inspected.

use std::path::PathBuf;

use crate::direct;
use crate::error::Result;
use crate::hls::{self, HlsOptions};
use crate::job::{DownloadJob, JobKind};
use crate::outcome::Completion;
use crate::throttle::RateLimiter;

/// Runs one job to completion on the calling (blocking) thread.
///
/// The scheduler owns the limiter and hands it over per job; implementations
/// must not share it.
pub trait JobRunner: Send + Sync + 'static {
    fn run(&self, job: &DownloadJob, limiter: Option<&mut RateLimiter>) -> Result<Completion>;
}

/// Real runner: direct jobs to the direct downloader, HLS jobs to the pipeline.
#[derive(Debug, Clone)]
pub struct Engine {
    pub output_root: PathBuf,
    pub hls: HlsOptions,
}

impl Engine {
    pub fn new(output_root: impl Into<PathBuf>, hls: HlsOptions) -> Self {
        Self {
            output_root: output_root.into(),
            hls,
        }
    }
}

impl JobRunner for Engine {
    fn run(&self, job: &DownloadJob, limiter: Option<&mut RateLimiter>) -> Result<Completion> {
        match &job.kind {
            JobKind::Direct => direct::download(&job.source_url, &self.output_root, limiter),
            JobKind::Hls { .. } => hls::download(
                &job.source_url,
                &job.destination_path(&self.output_root),
                &self.hls,
                limiter,
            ),
        }
    }
}
