//! `vidfetch hls <url> --title T --language L` – download one HLS stream.

use anyhow::Result;
use vidfetch_core::config::EngineConfig;
use vidfetch_core::{DownloadJob, Language};

use super::execute::execute;

pub async fn run_hls(
    cfg: &EngineConfig,
    url: &str,
    title: &str,
    language: Language,
    episode: u32,
) -> Result<()> {
    let job = DownloadJob::hls(0, url, title, episode, language)?;
    execute(cfg, vec![job]).await
}
