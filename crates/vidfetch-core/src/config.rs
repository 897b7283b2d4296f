use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default minimum size (bytes) for an existing HLS output to count as complete.
pub const DEFAULT_MIN_COMPLETE_HLS_BYTES: u64 = 10 * 1024 * 1024;

/// Global configuration loaded from `~/.config/vidfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of jobs run concurrently per batch.
    pub batch_size: usize,
    /// Total bandwidth budget in bytes per second, split evenly per batch slot (None = no cap).
    #[serde(default)]
    pub max_bytes_per_sec: Option<u64>,
    /// Root directory; assets land in `<output_root>/<grouping key>/<filename>`.
    pub output_root: PathBuf,
    /// Muxer binary. When missing, `ffmpeg` is looked up on PATH by the CLI.
    #[serde(default)]
    pub muxer_path: Option<PathBuf>,
    /// An existing HLS output larger than this is treated as already downloaded.
    #[serde(default = "default_min_complete_hls_bytes")]
    pub min_complete_hls_bytes: u64,
    /// Parent of the per-job HLS scratch directories (None = system temp dir).
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

fn default_min_complete_hls_bytes() -> u64 {
    DEFAULT_MIN_COMPLETE_HLS_BYTES
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            max_bytes_per_sec: None,
            output_root: PathBuf::from("Downloads"),
            muxer_path: None,
            min_complete_hls_bytes: DEFAULT_MIN_COMPLETE_HLS_BYTES,
            scratch_dir: None,
        }
    }
}

impl EngineConfig {
    /// Total budget as the scheduler wants it: 0 means unlimited.
    pub fn total_rate(&self) -> u64 {
        self.max_bytes_per_sec.unwrap_or(0)
    }
}

/// Converts a speed in megabits per second to bytes per second (1 Mbps = 10^6 bit/s).
/// Non-positive or non-finite input yields 0 (unlimited).
pub fn mbps_to_bytes_per_sec(mbps: f64) -> u64 {
    if !mbps.is_finite() || mbps <= 0.0 {
        return 0;
    }
    (mbps * 1_000_000.0 / 8.0) as u64
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vidfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EngineConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EngineConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: EngineConfig = toml::from_str(&data)?;
    Ok(cfg)
}
