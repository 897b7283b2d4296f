//! Blocking curl GETs whose bodies stream into a sink, optionally through a
//! job's rate limiter.
//!
//! Per-call timeouts are left at libcurl's defaults; only redirects are
//! configured.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::str;

use thiserror::Error;

use crate::error::DownloadError;
use crate::fetch_head::parse::parse_status_line;
use crate::fetch_head::StatusLine;
use crate::throttle::{RateLimitedReader, RateLimiter};

const USER_AGENT: &str = concat!("vidfetch/", env!("CARGO_PKG_VERSION"));

/// Failure of a single HTTP exchange, before it is attributed to a job.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (DNS, connect, reset, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response had a non-2xx status.
    #[error("HTTP {0}")]
    Status(StatusLine),
    /// Writing the body to the sink failed (e.g. disk full).
    #[error("write failed: {0}")]
    Sink(#[source] io::Error),
}

impl FetchError {
    /// Attributes the failure to a download of `url` into `dest`.
    pub(crate) fn into_download_error(self, url: &str, dest: &Path) -> DownloadError {
        match self {
            FetchError::Curl(source) => DownloadError::Transport {
                url: url.to_string(),
                source,
            },
            FetchError::Status(status) => DownloadError::BadStatus {
                url: url.to_string(),
                status: status.text,
            },
            FetchError::Sink(source) => DownloadError::io("could not write", dest, source),
        }
    }
}

/// Fresh easy handle for `url` with the options every request shares.
pub(crate) fn new_easy(url: &str) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(USER_AGENT)?;
    Ok(easy)
}

/// GETs `url` and copies the body into `sink`, paying `limiter` for every
/// byte when one is given. Returns the number of body bytes written.
///
/// A non-2xx status aborts before any body byte reaches the sink.
pub fn get_to_writer<W: Write>(
    url: &str,
    mut limiter: Option<&mut RateLimiter>,
    sink: &mut W,
) -> Result<u64, FetchError> {
    let status: RefCell<Option<StatusLine>> = RefCell::new(None);
    let mut rejected: Option<StatusLine> = None;
    let mut sink_error: Option<io::Error> = None;
    let mut written = 0u64;

    let mut easy = new_easy(url)?;
    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Some(line) = str::from_utf8(data).ok().and_then(parse_status_line) {
                *status.borrow_mut() = Some(line);
            }
            true
        })?;
        transfer.write_function(|data| {
            if let Some(line) = status.borrow().as_ref() {
                if !line.is_success() {
                    rejected = Some(line.clone());
                    return Ok(0);
                }
            }
            let mut chunk = data;
            let copied = match limiter.as_deref_mut() {
                Some(l) => io::copy(&mut RateLimitedReader::new(chunk, l), &mut *sink),
                None => io::copy(&mut chunk, &mut *sink),
            };
            match copied {
                Ok(n) => {
                    written += n;
                    Ok(data.len())
                }
                Err(e) => {
                    sink_error = Some(e);
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    if let Some(line) = rejected {
        return Err(FetchError::Status(line));
    }
    if let Some(e) = sink_error {
        return Err(FetchError::Sink(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        let line = status
            .into_inner()
            .unwrap_or_else(|| StatusLine::from_code(code));
        return Err(FetchError::Status(line));
    }
    Ok(written)
}

/// GETs `url` fully into memory (playlists). Invalid UTF-8 is replaced.
pub fn get_text(url: &str, limiter: Option<&mut RateLimiter>) -> Result<String, FetchError> {
    let mut body = Vec::new();
    get_to_writer(url, limiter, &mut body)?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}
