//! Job manifest: a TOML file with one `[[job]]` table per asset.
//!
//! ```toml
//! [[job]]
//! url = "https://cdn.example/Show/ep1.mp4"
//!
//! [[job]]
//! url = "https://cdn.example/hls/master.m3u8"
//! kind = "hls"
//! title = "My Show"
//! language = "SUB_ITA"
//! episode = 2
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use vidfetch_core::{DownloadJob, Language};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    #[default]
    Direct,
    Hls,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub url: String,
    #[serde(default)]
    pub kind: EntryKind,
    pub title: Option<String>,
    pub language: Option<Language>,
    /// Defaults to the entry's 1-based position in the manifest.
    pub episode: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "job")]
    pub jobs: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("could not read manifest {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("invalid manifest {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    /// Builds the ordered job list; the first invalid entry fails the whole manifest.
    pub fn into_jobs(self) -> Result<Vec<DownloadJob>> {
        self.jobs
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .into_job(index)
                    .with_context(|| format!("job {} in manifest", index + 1))
            })
            .collect()
    }
}

impl ManifestEntry {
    fn into_job(self, index: usize) -> Result<DownloadJob> {
        match self.kind {
            EntryKind::Direct => Ok(DownloadJob::direct(index, self.url)?),
            EntryKind::Hls => {
                let Some(title) = self.title else {
                    bail!("hls job needs a title");
                };
                let Some(language) = self.language else {
                    bail!("hls job needs a language (SUB_ITA or ITA)");
                };
                let episode = self.episode.unwrap_or(index as u32 + 1);
                Ok(DownloadJob::hls(index, self.url, &title, episode, language)?)
            }
        }
    }
}
