//! Batch loop: one blocking task per job, full barrier between batches.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::Sender;
use tokio::task::{Id, JoinError, JoinSet};

use crate::error::DownloadError;
use crate::job::DownloadJob;

use super::batch::partition;
use super::budget::{limiter_for_job, per_job_rate};
use super::dispatch::JobRunner;
use super::progress::{JobOutcome, RunReport, SchedulerEvent};

/// Batch size and total bandwidth budget for a run.
#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    /// Jobs per batch (`B`); 0 is treated as 1.
    pub batch_size: usize,
    /// Total budget `R` in bytes per second; 0 = unlimited.
    pub total_bytes_per_sec: u64,
}

/// Panic payload text, or the join error itself for a cancelled task.
fn panic_reason(e: JoinError) -> String {
    if !e.is_panic() {
        return e.to_string();
    }
    let payload = e.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

async fn notify(events: Option<&Sender<SchedulerEvent>>, event: SchedulerEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}

/// Runs `jobs` in order, `batch_size` at a time.
///
/// Each job runs on its own blocking thread with its own limiter at
/// `total / batch_size` bytes per second. The next batch starts only after
/// every task of the current one has finished. Job failures are logged and
/// recorded; they never stop siblings or later batches.
pub async fn run_batches<R: JobRunner>(
    jobs: Vec<DownloadJob>,
    settings: BatchSettings,
    runner: Arc<R>,
    events: Option<&Sender<SchedulerEvent>>,
) -> RunReport {
    let batch_size = settings.batch_size.max(1);
    let rate = per_job_rate(settings.total_bytes_per_sec, batch_size);
    let mut report = RunReport::default();

    if rate > 0 {
        tracing::info!(batch_size, total = settings.total_bytes_per_sec, per_job = rate, "bandwidth budget");
    } else {
        tracing::info!(batch_size, "no bandwidth limit");
    }

    for (number, batch) in partition(jobs, batch_size).into_iter().enumerate() {
        let batch_no = number + 1;
        tracing::info!(
            batch = batch_no,
            jobs = batch.len(),
            first = batch.first().map(|j| j.sequence_index + 1),
            last = batch.last().map(|j| j.sequence_index + 1),
            "starting batch"
        );
        notify(
            events,
            SchedulerEvent::BatchStarted {
                batch: batch_no,
                jobs: batch.len(),
                per_job_rate: rate,
            },
        )
        .await;

        let mut set = JoinSet::new();
        let mut in_flight: HashMap<Id, DownloadJob> = HashMap::with_capacity(batch.len());
        for job in batch {
            let runner = Arc::clone(&runner);
            let tracked = job.clone();
            let handle = set.spawn_blocking(move || {
                let mut limiter = limiter_for_job(rate);
                tracing::info!(
                    job = job.sequence_index + 1,
                    kind = if job.is_hls() { "hls" } else { "direct" },
                    rate,
                    "starting download"
                );
                let result = runner.run(&job, limiter.as_mut());
                JobOutcome::new(&job, result)
            });
            in_flight.insert(handle.id(), tracked);
        }

        let mut outcomes = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next_with_id().await {
            let outcome = match joined {
                Ok((_, outcome)) => outcome,
                Err(e) => {
                    let Some(job) = in_flight.remove(&e.id()) else {
                        tracing::error!(batch = batch_no, error = %e, "unknown download task failed");
                        continue;
                    };
                    let reason = panic_reason(e);
                    tracing::error!(
                        job = job.sequence_index + 1,
                        url = %job.source_url,
                        reason = %reason,
                        "download task panicked"
                    );
                    JobOutcome::new(&job, Err(DownloadError::TaskPanicked { reason }))
                }
            };
            match &outcome.result {
                Ok(done) => tracing::info!(
                    job = outcome.sequence_index + 1,
                    path = %done.path().display(),
                    "completed download"
                ),
                Err(e) => tracing::error!(
                    job = outcome.sequence_index + 1,
                    url = %outcome.source_url,
                    error = %e,
                    "download failed"
                ),
            }
            notify(events, SchedulerEvent::JobFinished(outcome.clone())).await;
            outcomes.push(outcome);
        }

        outcomes.sort_by_key(|o| o.sequence_index);
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = outcomes.len() - succeeded;
        tracing::info!(batch = batch_no, succeeded, failed, "batch completed");
        notify(
            events,
            SchedulerEvent::BatchFinished {
                batch: batch_no,
                succeeded,
                failed,
            },
        )
        .await;

        report.jobs.extend(outcomes);
        report.batches += 1;
    }

    report
}
