//! HLS pipeline: playlist fetch → variant selection → media playlist fetch →
//! segment parse → sequential segment download → local playlist rewrite →
//! remux.
//!
//! Everything runs on the calling thread; the only concurrency is between
//! jobs. All network reads of one job share that job's rate limiter. Segments
//! and the rewritten playlist live in a scratch directory that is removed on
//! every exit path (it is a `TempDir`).

mod playlist;
mod remux;

pub use playlist::{
    parse_segments, rewrite_local, select_variant, variants, Segment, Variant,
};
pub use remux::Muxer;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::DEFAULT_MIN_COMPLETE_HLS_BYTES;
use crate::error::{DownloadError, Result};
use crate::http;
use crate::outcome::Completion;
use crate::throttle::RateLimiter;

const SCRATCH_PREFIX: &str = "hls_download_";
const LOCAL_PLAYLIST: &str = "local_playlist.m3u8";
const PROGRESS_EVERY: usize = 10;

/// Settings shared by every HLS job of a run.
#[derive(Debug, Clone)]
pub struct HlsOptions {
    pub muxer: Muxer,
    /// An existing output larger than this is considered done.
    pub min_complete_bytes: u64,
    /// Parent for per-job scratch directories (None = system temp dir).
    pub scratch_root: Option<PathBuf>,
}

impl HlsOptions {
    pub fn new(muxer: Muxer) -> Self {
        Self {
            muxer,
            min_complete_bytes: DEFAULT_MIN_COMPLETE_HLS_BYTES,
            scratch_root: None,
        }
    }

    fn scratch_dir(&self) -> Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        match &self.scratch_root {
            Some(root) => {
                fs::create_dir_all(root)
                    .map_err(|e| DownloadError::io("could not create scratch root", root, e))?;
                builder
                    .tempdir_in(root)
                    .map_err(|e| DownloadError::io("could not create scratch directory", root, e))
            }
            None => builder
                .tempdir()
                .map_err(|e| DownloadError::io("could not create scratch directory", std::env::temp_dir(), e)),
        }
    }
}

/// Size of an existing output that already counts as complete.
fn existing_output(output: &Path, min_complete_bytes: u64) -> Option<u64> {
    let meta = fs::metadata(output).ok()?;
    (meta.is_file() && meta.len() > min_complete_bytes).then_some(meta.len())
}

fn fetch_playlist(url: &str, scratch: &Path, limiter: Option<&mut RateLimiter>) -> Result<String> {
    http::get_text(url, limiter).map_err(|e| e.into_download_error(url, scratch))
}

/// Fetches every segment, in order, into `dir`. The first failure aborts.
fn download_segments(
    segments: &[Segment],
    dir: &Path,
    mut limiter: Option<&mut RateLimiter>,
) -> Result<u64> {
    let total = segments.len();
    let mut bytes = 0u64;
    for (index, segment) in segments.iter().enumerate() {
        let path = dir.join(&segment.local_filename);
        let file = File::create(&path)
            .map_err(|e| DownloadError::io("could not create segment file", &path, e))?;
        let mut writer = BufWriter::new(file);
        let n = http::get_to_writer(&segment.source_url, limiter.as_deref_mut(), &mut writer)
            .map_err(|e| match e {
                http::FetchError::Sink(source) => {
                    DownloadError::io("could not write segment", &path, source)
                }
                other => DownloadError::SegmentFetchFailed {
                    index,
                    url: segment.source_url.clone(),
                    reason: other.to_string(),
                },
            })?;
        writer
            .flush()
            .map_err(|e| DownloadError::io("could not write segment", &path, e))?;
        bytes += n;

        if (index + 1) % PROGRESS_EVERY == 0 || index + 1 == total {
            tracing::info!(done = index + 1, total, "downloaded segments");
        }
    }
    Ok(bytes)
}

/// Writes the rewritten playlist next to the segments; warns about
/// references whose file is missing.
fn write_local_playlist(media: &str, segments: &[Segment], dir: &Path) -> Result<PathBuf> {
    for segment in segments {
        let local = dir.join(&segment.local_filename);
        if !local.exists() {
            tracing::warn!(path = %local.display(), "local segment file does not exist");
        }
    }
    let path = dir.join(LOCAL_PLAYLIST);
    fs::write(&path, rewrite_local(media))
        .map_err(|e| DownloadError::io("could not write local playlist", &path, e))?;
    Ok(path)
}

/// Downloads the stream at `url` into `output` (the final container path).
pub fn download(
    url: &str,
    output: &Path,
    opts: &HlsOptions,
    mut limiter: Option<&mut RateLimiter>,
) -> Result<Completion> {
    if let Some(bytes) = existing_output(output, opts.min_complete_bytes) {
        tracing::info!(
            path = %output.display(),
            size_mib = bytes as f64 / (1024.0 * 1024.0),
            "file already exists"
        );
        return Ok(Completion::AlreadyComplete {
            path: output.to_path_buf(),
            bytes,
        });
    }
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| DownloadError::io("could not create output directory", dir, e))?;
    }

    match limiter.as_deref() {
        Some(l) => tracing::info!(url, rate = l.rate_per_sec(), "downloading HLS stream (rate limited)"),
        None => tracing::info!(url, "downloading HLS stream (no speed limit)"),
    }
    let start = Instant::now();
    let scratch = opts.scratch_dir()?;

    let first = fetch_playlist(url, scratch.path(), limiter.as_deref_mut())?;
    let (media, media_url) = match select_variant(&first, url)? {
        Some(variant_url) => {
            tracing::debug!(url = %variant_url, "fetching media playlist");
            let media = fetch_playlist(&variant_url, scratch.path(), limiter.as_deref_mut())?;
            (media, variant_url)
        }
        None => (first, url.to_string()),
    };

    let segments = parse_segments(&media, &media_url)?;
    tracing::info!(count = segments.len(), "found segments to download");
    download_segments(&segments, scratch.path(), limiter.as_deref_mut())?;

    let local_playlist = write_local_playlist(&media, &segments, scratch.path())?;
    tracing::info!(output = %output.display(), "converting segments to final video");
    if let Err(e) = opts.muxer.remux(&local_playlist, output) {
        if fs::remove_file(output).is_ok() {
            tracing::debug!(path = %output.display(), "removed partial muxer output");
        }
        return Err(e);
    }
    if let Err(e) = scratch.close() {
        tracing::warn!(error = %e, "could not remove scratch directory");
    }

    let bytes = fs::metadata(output)
        .map_err(|e| DownloadError::io("output file not found after remux", output, e))?
        .len();
    let done = Completion::Downloaded {
        path: output.to_path_buf(),
        bytes,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        path = %output.display(),
        size_mib = done.size_mib(),
        secs = start.elapsed().as_secs_f64(),
        mbps = done.mbps().unwrap_or(0.0),
        "downloaded"
    );
    Ok(done)
}
