//! Shared tail of every command: build the engine, run the batches and
//! print one line per event.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use vidfetch_core::config::EngineConfig;
use vidfetch_core::hls::{HlsOptions, Muxer};
use vidfetch_core::scheduler::{run_batches, BatchSettings, Engine, SchedulerEvent};
use vidfetch_core::{Completion, DownloadJob};

const DEFAULT_MUXER: &str = "ffmpeg";

/// Muxer from the config, else `ffmpeg` on PATH.
fn resolve_muxer(cfg: &EngineConfig) -> Result<PathBuf> {
    match &cfg.muxer_path {
        Some(path) => Ok(path.clone()),
        None => which::which(DEFAULT_MUXER).with_context(|| {
            format!(
                "{} not found on PATH; install it, set muxer_path in the config or pass --muxer",
                DEFAULT_MUXER
            )
        }),
    }
}

/// Engine for this run. The muxer is only looked up when an HLS job needs it.
pub(crate) fn engine_for(cfg: &EngineConfig, needs_muxer: bool) -> Result<Engine> {
    let program = if needs_muxer {
        resolve_muxer(cfg)?
    } else {
        cfg.muxer_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MUXER))
    };
    let mut hls = HlsOptions::new(Muxer::new(program));
    hls.min_complete_bytes = cfg.min_complete_hls_bytes;
    hls.scratch_root = cfg.scratch_dir.clone();
    Ok(Engine::new(&cfg.output_root, hls))
}

pub(crate) fn describe_event(event: &SchedulerEvent) -> String {
    match event {
        SchedulerEvent::BatchStarted {
            batch,
            jobs,
            per_job_rate,
        } => {
            if *per_job_rate > 0 {
                format!(
                    "batch {}: {} job(s) at {:.2} MB/s each",
                    batch,
                    jobs,
                    *per_job_rate as f64 / (1024.0 * 1024.0)
                )
            } else {
                format!("batch {}: {} job(s), no speed limit", batch, jobs)
            }
        }
        SchedulerEvent::JobFinished(outcome) => {
            let n = outcome.sequence_index + 1;
            match &outcome.result {
                Ok(done @ Completion::Downloaded { .. }) => format!(
                    "[{}] downloaded {} ({:.2} MB, {:.2} MB/s)",
                    n,
                    done.path().display(),
                    done.size_mib(),
                    done.mib_per_sec().unwrap_or(0.0)
                ),
                Ok(done @ Completion::AlreadyComplete { .. }) => format!(
                    "[{}] already complete: {} ({:.2} MB)",
                    n,
                    done.path().display(),
                    done.size_mib()
                ),
                Err(e) => format!("[{}] FAILED {}: {}", n, outcome.source_url, e),
            }
        }
        SchedulerEvent::BatchFinished {
            batch,
            succeeded,
            failed,
        } => format!("batch {} done: {} ok, {} failed", batch, succeeded, failed),
    }
}

/// Runs `jobs` with the settings in `cfg`. Fails when any job failed.
pub(crate) async fn execute(cfg: &EngineConfig, jobs: Vec<DownloadJob>) -> Result<()> {
    if jobs.is_empty() {
        println!("No jobs to run.");
        return Ok(());
    }
    let needs_muxer = jobs.iter().any(DownloadJob::is_hls);
    let engine = Arc::new(engine_for(cfg, needs_muxer)?);
    let settings = BatchSettings {
        batch_size: cfg.batch_size,
        total_bytes_per_sec: cfg.total_rate(),
    };

    let (events_tx, mut events_rx) = tokio::sync::mpsc::channel::<SchedulerEvent>(32);
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            println!("{}", describe_event(&event));
        }
    });

    let total = jobs.len();
    let report = run_batches(jobs, settings, engine, Some(&events_tx)).await;
    drop(events_tx);
    let _ = printer.await;

    println!(
        "{} of {} job(s) succeeded in {} batch(es)",
        report.succeeded(),
        total,
        report.batches
    );
    if report.failed() > 0 {
        bail!("{} of {} job(s) failed", report.failed(), total);
    }
    Ok(())
}
