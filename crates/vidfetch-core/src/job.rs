//! Download jobs handed to the engine by the upstream collaborator.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DownloadError, Result};
use crate::url_model;

/// Audio/subtitle variant tag used in HLS output filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// Original audio with Italian subtitles.
    #[serde(rename = "SUB_ITA")]
    SubIta,
    /// Italian dub.
    #[serde(rename = "ITA")]
    Ita,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::SubIta => "SUB_ITA",
            Language::Ita => "ITA",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match norm.as_str() {
            "SUB_ITA" | "SUB" => Ok(Language::SubIta),
            "ITA" => Ok(Language::Ita),
            _ => Err(format!("unknown language tag: {}", s)),
        }
    }
}

/// Kind of stream behind a job's source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    /// Single progressive file.
    Direct,
    /// HLS playlist (master or media) that must be fetched segment by segment and remuxed.
    Hls { episode: u32, language: Language },
}

/// One asset to fetch. Immutable once built; consumed once by the scheduler.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub sequence_index: usize,
    pub source_url: String,
    pub kind: JobKind,
    /// Filename inside the destination folder.
    pub destination_name: String,
    /// Grouping key: URL subfolder (direct) or cleaned title (HLS).
    pub destination_folder: String,
}

impl DownloadJob {
    /// Direct job; folder and filename come from the URL's last two path segments.
    pub fn direct(sequence_index: usize, source_url: impl Into<String>) -> Result<Self> {
        let source_url = source_url.into();
        let (folder, name) = url_model::direct_destination(&source_url)?;
        Ok(Self {
            sequence_index,
            source_url,
            kind: JobKind::Direct,
            destination_name: name,
            destination_folder: folder,
        })
    }

    /// HLS job for episode `episode` (1-based) of `title`.
    pub fn hls(
        sequence_index: usize,
        source_url: impl Into<String>,
        title: &str,
        episode: u32,
        language: Language,
    ) -> Result<Self> {
        let source_url = source_url.into();
        url::Url::parse(&source_url)
            .map_err(|e| DownloadError::invalid_source(&source_url, e.to_string()))?;
        let folder = url_model::grouping_key(title);
        if folder.is_empty() {
            return Err(DownloadError::invalid_source(
                &source_url,
                format!("title {:?} is empty after cleaning", title),
            ));
        }
        Ok(Self {
            sequence_index,
            source_url,
            kind: JobKind::Hls { episode, language },
            destination_name: url_model::hls_filename(title, episode, language.tag()),
            destination_folder: folder,
        })
    }

    pub fn is_hls(&self) -> bool {
        matches!(self.kind, JobKind::Hls { .. })
    }

    /// `<root>/<destination_folder>/<destination_name>`.
    pub fn destination_path(&self, root: &Path) -> PathBuf {
        root.join(&self.destination_folder)
            .join(&self.destination_name)
    }
}
