//! URL modeling and destination naming.
//!
//! Derives the `<grouping key>/<filename>` pair for both job kinds and
//! resolves playlist references against the playlist's retrieval URL.

mod path;
mod sanitize;

pub use path::{direct_destination, resolve_reference, segment_filename};
pub use sanitize::{clean_title, grouping_key, sanitize_path_component};

/// Output filename for an HLS episode: `<Title>_Ep_<NN>_<LANG>.mp4`.
///
/// The title is cleaned and stripped of all whitespace; the episode number is
/// zero-padded to two digits (wider numbers are kept as-is).
pub fn hls_filename(title: &str, episode: u32, language_tag: &str) -> String {
    format!("{}_Ep_{:02}_{}.mp4", grouping_key(title), episode, language_tag)
}
