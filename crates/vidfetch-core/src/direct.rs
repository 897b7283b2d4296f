//! Direct asset downloader: one progressive file, one GET.
//!
//! Destination is `<root>/<url subfolder>/<url filename>`. An existing file at
//! least as large as the server's advertised length is left alone; anything
//! else is overwritten from scratch. A half-written file is not cleaned up on
//! failure; the next run re-downloads it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{DownloadError, Result};
use crate::fetch_head;
use crate::http;
use crate::outcome::Completion;
use crate::throttle::RateLimiter;
use crate::url_model;

/// Where `url` will be saved under `output_root`.
pub fn destination_for(url: &str, output_root: &Path) -> Result<PathBuf> {
    let (folder, filename) = url_model::direct_destination(url)?;
    Ok(output_root.join(folder).join(filename))
}

/// Size of an existing destination that the server confirms is complete.
fn already_complete(url: &str, path: &Path) -> Option<u64> {
    let existing = fs::metadata(path).ok().filter(|m| m.is_file())?.len();
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let head = match fetch_head::probe(url) {
        Ok(head) => head,
        Err(e) => {
            tracing::warn!(
                file = name.as_deref().unwrap_or(""),
                error = %e,
                "could not check remote size, downloading again"
            );
            return None;
        }
    };
    tracing::debug!(
        url,
        content_length = ?head.content_length,
        content_type = head.content_type.as_deref().unwrap_or(""),
        "probed remote size"
    );
    match head.expected_size() {
        Some(expected) if existing >= expected => return Some(existing),
        Some(expected) => tracing::warn!(
            file = name.as_deref().unwrap_or(""),
            existing,
            expected,
            "file exists but appears incomplete, downloading again"
        ),
        None => tracing::warn!(
            file = name.as_deref().unwrap_or(""),
            "server did not report a size, downloading again"
        ),
    }
    None
}

/// Downloads `url` into `output_root`, throttled by `limiter` when given.
pub fn download(
    url: &str,
    output_root: &Path,
    limiter: Option<&mut RateLimiter>,
) -> Result<Completion> {
    let path = destination_for(url, output_root)?;
    let dir = path.parent().unwrap_or(output_root);
    fs::create_dir_all(dir)
        .map_err(|e| DownloadError::io("could not create output directory", dir, e))?;

    if let Some(bytes) = already_complete(url, &path) {
        tracing::info!(
            path = %path.display(),
            size_mib = bytes as f64 / (1024.0 * 1024.0),
            "file already exists with correct size"
        );
        return Ok(Completion::AlreadyComplete { path, bytes });
    }

    match limiter.as_deref() {
        Some(l) => tracing::info!(url, rate = l.rate_per_sec(), "downloading (rate limited)"),
        None => tracing::info!(url, "downloading (no speed limit)"),
    }

    let file = File::create(&path)
        .map_err(|e| DownloadError::io("could not create output file", &path, e))?;
    let mut writer = BufWriter::new(file);

    let start = Instant::now();
    let bytes = http::get_to_writer(url, limiter, &mut writer)
        .map_err(|e| e.into_download_error(url, &path))?;
    writer
        .flush()
        .map_err(|e| DownloadError::io("could not write", &path, e))?;
    let elapsed = start.elapsed();

    let done = Completion::Downloaded {
        path,
        bytes,
        elapsed,
    };
    tracing::info!(
        path = %done.path().display(),
        size_mib = done.size_mib(),
        mib_per_sec = done.mib_per_sec().unwrap_or(0.0),
        "downloaded"
    );
    Ok(done)
}
