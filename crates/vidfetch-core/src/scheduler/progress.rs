//! Per-job outcomes, per-batch events and the run summary.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::DownloadError;
use crate::job::DownloadJob;
use crate::outcome::Completion;

/// Result of one job, tagged with the job's identity.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub sequence_index: usize,
    pub source_url: String,
    /// `<grouping key>/<filename>`, relative to the output root.
    pub destination: PathBuf,
    pub result: Result<Completion, Arc<DownloadError>>,
}

impl JobOutcome {
    pub(crate) fn new(job: &DownloadJob, result: Result<Completion, DownloadError>) -> Self {
        Self {
            sequence_index: job.sequence_index,
            source_url: job.source_url.clone(),
            destination: PathBuf::from(&job.destination_folder).join(&job.destination_name),
            result: result.map_err(Arc::new),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Progress notifications sent while batches run.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    BatchStarted {
        batch: usize,
        jobs: usize,
        per_job_rate: u64,
    },
    JobFinished(JobOutcome),
    BatchFinished {
        batch: usize,
        succeeded: usize,
        failed: usize,
    },
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub batches: usize,
    /// Outcomes ordered by batch, then by sequence index within the batch.
    /// A panicked task is recorded as a `TaskPanicked` failure of its job.
    pub jobs: Vec<JobOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.jobs.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.jobs.iter().filter(|j| !j.is_success())
    }
}
