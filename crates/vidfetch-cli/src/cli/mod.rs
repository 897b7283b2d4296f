//! CLI for the vidfetch media-download engine.

mod commands;
mod manifest;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use vidfetch_core::config::{self, EngineConfig};
use vidfetch_core::Language;

use commands::{run_direct, run_hls, run_manifest};

/// Top-level CLI for vidfetch.
#[derive(Debug, Parser)]
#[command(name = "vidfetch")]
#[command(about = "vidfetch: batch downloader for progressive video and HLS streams", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Flags that override the config file for this run.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    /// Jobs downloaded concurrently per batch.
    #[arg(long, global = true, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Total speed budget in megabits per second, split across the batch (0 = unlimited).
    #[arg(long, global = true, value_name = "MBPS", conflicts_with = "max_bytes_per_sec")]
    pub speed_mbps: Option<f64>,

    /// Total speed budget in bytes per second (0 = unlimited).
    #[arg(long, global = true, value_name = "BYTES")]
    pub max_bytes_per_sec: Option<u64>,

    /// Output root directory.
    #[arg(long, short = 'o', global = true, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Muxer binary used to assemble HLS streams (default: ffmpeg on PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub muxer: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut EngineConfig) {
        if let Some(n) = self.batch_size {
            cfg.batch_size = n;
        }
        if let Some(mbps) = self.speed_mbps {
            let rate = config::mbps_to_bytes_per_sec(mbps);
            cfg.max_bytes_per_sec = (rate > 0).then_some(rate);
        }
        if let Some(rate) = self.max_bytes_per_sec {
            cfg.max_bytes_per_sec = (rate > 0).then_some(rate);
        }
        if let Some(dir) = &self.output {
            cfg.output_root = dir.clone();
        }
        if let Some(muxer) = &self.muxer {
            cfg.muxer_path = Some(muxer.clone());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run every job listed in a TOML manifest.
    Run {
        /// Manifest with one `[[job]]` table per asset.
        manifest: PathBuf,
    },

    /// Download progressive files; each lands in `<output>/<parent dir>/<file name>`.
    Direct {
        /// Direct HTTP/HTTPS URLs.
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Download one HLS stream and remux it into an MP4.
    Hls {
        /// Master or media playlist URL.
        url: String,

        /// Series or film title; names the output folder and file.
        #[arg(long)]
        title: String,

        /// SUB_ITA or ITA.
        #[arg(long)]
        language: Language,

        /// Episode number used in the file name.
        #[arg(long, default_value_t = 1)]
        episode: u32,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.overrides.apply(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { manifest } => run_manifest(&cfg, &manifest).await?,
            CliCommand::Direct { urls } => run_direct(&cfg, &urls).await?,
            CliCommand::Hls {
                url,
                title,
                language,
                episode,
            } => run_hls(&cfg, &url, &title, language, episode).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
