//! Path-shaped helpers: direct destinations, segment filenames, reference resolution.

use percent_encoding::percent_decode_str;

use crate::error::{DownloadError, Result};

use super::sanitize::sanitize_path_component;

/// Splits a direct asset URL into `(folder, filename)` from its last two path segments.
///
/// `https://cdn.example.com/videos/Show/Show_Ep_01.mp4` → `("Show", "Show_Ep_01.mp4")`.
/// Fails with `InvalidSource` when the URL does not parse or the path has fewer
/// than two non-empty segments. Segments are percent-decoded before sanitizing.
pub fn direct_destination(url: &str) -> Result<(String, String)> {
    let parsed =
        url::Url::parse(url).map_err(|e| DownloadError::invalid_source(url, e.to_string()))?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    if segments.len() < 2 {
        return Err(DownloadError::invalid_source(
            url,
            "path too short to determine folder/filename",
        ));
    }
    let local_name =
        |seg: &str| sanitize_path_component(&percent_decode_str(seg).decode_utf8_lossy());
    let folder = local_name(segments[segments.len() - 2]);
    let filename = local_name(segments[segments.len() - 1]);
    if folder.is_empty() || filename.is_empty() {
        return Err(DownloadError::invalid_source(
            url,
            "folder or filename is empty after sanitizing",
        ));
    }
    Ok((folder, filename))
}

/// Bare local filename for a segment reference: last `/` component with the
/// query string removed.
pub fn segment_filename(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    match last.find('?') {
        Some(idx) => last[..idx].to_string(),
        None => last.to_string(),
    }
}

/// Resolves a playlist reference against the URL the playlist was fetched from.
/// Absolute references are returned unchanged.
pub fn resolve_reference(base_url: &str, reference: &str) -> Result<String> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Ok(reference.to_string());
    }
    let base = url::Url::parse(base_url)
        .map_err(|e| DownloadError::invalid_source(base_url, e.to_string()))?;
    let joined = base
        .join(reference)
        .map_err(|e| DownloadError::invalid_source(reference, e.to_string()))?;
    Ok(joined.into())
}
