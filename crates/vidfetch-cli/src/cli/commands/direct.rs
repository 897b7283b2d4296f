//! `vidfetch direct <url>...` – download progressive files.

use anyhow::{Context, Result};
use vidfetch_core::config::EngineConfig;
use vidfetch_core::DownloadJob;

use super::execute::execute;

pub async fn run_direct(cfg: &EngineConfig, urls: &[String]) -> Result<()> {
    let jobs = urls
        .iter()
        .enumerate()
        .map(|(i, url)| DownloadJob::direct(i, url.as_str()).with_context(|| format!("url {}", i + 1)))
        .collect::<Result<Vec<_>>>()?;
    execute(cfg, jobs).await
}
