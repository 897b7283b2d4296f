//! `vidfetch run <manifest>` – run every job of a manifest.

use std::path::Path;

use anyhow::Result;
use vidfetch_core::config::EngineConfig;

use super::execute::execute;
use crate::cli::manifest::Manifest;

pub async fn run_manifest(cfg: &EngineConfig, manifest: &Path) -> Result<()> {
    let jobs = Manifest::load(manifest)?.into_jobs()?;
    tracing::info!(path = %manifest.display(), jobs = jobs.len(), "loaded manifest");
    execute(cfg, jobs).await
}
