//! Filename and title sanitization.

const TITLE_MAX: usize = 100;
const NAME_MAX: usize = 255;

fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}

/// Cleans a media title for use in folder and file names.
///
/// - Replaces `<>:"/\|?*` and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims underscores from both ends
/// - Limits length to 100 bytes
pub fn clean_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_underscore = false;

    for c in title.chars() {
        let bad = matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control();
        let c = if bad { '_' } else { c };
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches('_');
    truncate_on_char_boundary(trimmed, TITLE_MAX).to_string()
}

/// Grouping key for HLS downloads: the cleaned title with all whitespace removed.
pub fn grouping_key(title: &str) -> String {
    let joined: String = clean_title(title).split_whitespace().collect();
    joined.trim_matches('_').to_string()
}

/// Makes a single URL path segment safe to use as a local file or folder name.
///
/// Replaces NUL, `/`, `\` and control characters with `_`, rejects `.`/`..`
/// (returned as empty) and limits length to 255 bytes (Linux NAME_MAX).
pub fn sanitize_path_component(segment: &str) -> String {
    let replaced: String = segment
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim();
    if trimmed == "." || trimmed == ".." {
        return String::new();
    }
    truncate_on_char_boundary(trimmed, NAME_MAX).to_string()
}
