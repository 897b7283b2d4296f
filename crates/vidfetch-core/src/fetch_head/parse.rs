//! Parse HTTP response header lines.

use std::fmt;

use super::HeadResult;

/// Status code plus reason phrase, e.g. `404 Not Found`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub code: u32,
    pub text: String,
}

impl StatusLine {
    pub(crate) fn from_code(code: u32) -> Self {
        Self {
            code,
            text: code.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parses `HTTP/1.1 404 Not Found` (or `HTTP/2 200`) into a status line.
pub(crate) fn parse_status_line(line: &str) -> Option<StatusLine> {
    let line = line.trim();
    let rest = line.strip_prefix("HTTP/")?;
    let (_, after_version) = rest.split_once(' ')?;
    let after_version = after_version.trim();
    let code_str = after_version.split_whitespace().next()?;
    let code = code_str.parse::<u32>().ok()?;
    Some(StatusLine {
        code,
        text: after_version.to_string(),
    })
}

/// Parse collected header lines into HeadResult. With redirects, later
/// responses override earlier ones.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut content_length = None;
    let mut content_type = None;
    let mut status = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(s) = parse_status_line(line) {
            status = Some(s);
            content_length = None;
            content_type = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    content_length = Some(n);
                }
            }
            if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    HeadResult {
        content_length,
        content_type,
        status,
    }
}
