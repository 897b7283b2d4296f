//! External muxer invocation (ffmpeg-compatible CLI).
//!
//! Stream-copies the local playlist into one container with the
//! `aac_adtstoasc` bitstream filter. The binary is resolved by the caller.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{DownloadError, Result};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Handle on the muxer binary.
#[derive(Debug, Clone)]
pub struct Muxer {
    program: PathBuf,
}

impl Muxer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `-i <input> -c copy -bsf:a aac_adtstoasc -y <output>`
    pub fn args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-c".into(),
            "copy".into(),
            "-bsf:a".into(),
            "aac_adtstoasc".into(),
            "-y".into(),
            output.as_os_str().to_owned(),
        ]
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }
        cmd
    }

    /// Runs the muxer to completion. Its stderr is inherited so diagnostics
    /// reach the terminal; exit code 0 is the only success.
    pub fn remux(&self, input: &Path, output: &Path) -> Result<()> {
        tracing::debug!(
            program = %self.program.display(),
            input = %input.display(),
            output = %output.display(),
            "running muxer"
        );
        let status = self
            .command()
            .args(Self::args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| DownloadError::RemuxFailed {
                reason: format!("could not run {}: {}", self.program.display(), e),
            })?;
        if !status.success() {
            return Err(DownloadError::RemuxFailed {
                reason: format!("{} exited with {}", self.program.display(), status),
            });
        }
        Ok(())
    }
}
