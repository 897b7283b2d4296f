#![allow(dead_code)]

pub mod media_server;

use std::path::{Path, PathBuf};

/// Writes an executable stand-in for the muxer: it concatenates the files the
/// local playlist references, in order, into the output path (`$8`).
#[cfg(unix)]
pub fn concat_muxer(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-muxer",
        r#"#!/bin/sh
in="$2"
out="$8"
dir=$(dirname "$in")
: > "$out"
grep -v '^#' "$in" | while read -r seg; do
    [ -n "$seg" ] && cat "$dir/$seg" >> "$out"
done
exit 0
"#,
    )
}

/// Muxer that writes a partial output and then fails.
#[cfg(unix)]
pub fn failing_muxer(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "broken-muxer",
        "#!/bin/sh\necho partial > \"$8\"\necho 'muxer: invalid data' >&2\nexit 1\n",
    )
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Number of entries directly inside `dir`.
pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
