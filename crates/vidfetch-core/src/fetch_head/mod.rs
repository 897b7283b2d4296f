//! HTTP HEAD / metadata probing.
//!
//! Uses the curl crate (libcurl) to learn an asset's expected size before
//! deciding whether an existing local file is already complete.

pub(crate) mod parse;

pub use parse::StatusLine;

use std::str;

use crate::http::{self, FetchError};

/// Result of a HEAD request.
#[derive(Debug, Clone)]
pub struct HeadResult {
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Content-Type` value if present (logged only).
    pub content_type: Option<String>,
    /// Final status line (after redirects).
    pub status: Option<StatusLine>,
}

impl HeadResult {
    /// Expected size when the server reported a usable (non-zero) length.
    pub fn expected_size(&self) -> Option<u64> {
        self.content_length.filter(|n| *n > 0)
    }
}

/// Performs a HEAD request and returns parsed metadata.
///
/// Follows redirects. Runs in the current thread; call from `spawn_blocking`
/// if used from async code.
pub fn probe(url: &str) -> Result<HeadResult, FetchError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = http::new_easy(url)?;
    easy.nobody(true)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let result = parse::parse_headers(&headers);
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Status(
            result.status.unwrap_or_else(|| StatusLine::from_code(code)),
        ));
    }
    Ok(result)
}
