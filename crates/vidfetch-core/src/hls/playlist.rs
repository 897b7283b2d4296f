//! M3U8 handling: variant selection, segment extraction and the
//! local-playlist rewrite fed to the muxer.
//!
//! Master and media playlists are parsed with `m3u8-rs`. The rewrite stays
//! textual so every line the muxer sees, apart from URI lines, is the
//! fetched text byte-for-byte.

use m3u8_rs::{MasterPlaylist, MediaPlaylist, Playlist};

use crate::error::{DownloadError, Result};
use crate::url_model::{resolve_reference, segment_filename};

const STREAM_INF: &str = "#EXT-X-STREAM-INF";

/// One media segment, in playback order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Absolute URL to fetch.
    pub source_url: String,
    /// Name in the scratch directory (original filename, query stripped).
    pub local_filename: String,
}

/// Variant stream listed by a master playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub bandwidth: u64,
    /// Absolute URL of the variant's media playlist.
    pub uri: String,
}

fn is_uri_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

fn has_stream_inf(text: &str) -> bool {
    text.lines().any(|l| l.trim_start().starts_with(STREAM_INF))
}

fn parse(text: &str, url: &str) -> Option<Playlist> {
    match m3u8_rs::parse_playlist_res(text.as_bytes()) {
        Ok(playlist) => Some(playlist),
        Err(e) => {
            let error = e.map_input(|rest| text.len() - rest.len());
            tracing::debug!(url, ?error, "playlist did not parse as M3U8");
            None
        }
    }
}

fn master_variants(master: &MasterPlaylist, base_url: &str) -> Result<Vec<Variant>> {
    let mut out = Vec::new();
    for v in master.variants.iter().filter(|v| !v.is_i_frame) {
        if !is_uri_line(&v.uri) {
            continue;
        }
        out.push(Variant {
            bandwidth: v.bandwidth,
            uri: resolve_reference(base_url, v.uri.trim())?,
        });
    }
    Ok(out)
}

/// Lists every usable variant of a master playlist (I-frame streams and
/// entries without a URI are skipped). Returns `None` when the document is a
/// media playlist. A document with stream-info tags that does not parse
/// yields an empty list.
pub fn variants(text: &str, base_url: &str) -> Result<Option<Vec<Variant>>> {
    match parse(text, base_url) {
        Some(Playlist::MasterPlaylist(master)) => master_variants(&master, base_url).map(Some),
        Some(Playlist::MediaPlaylist(_)) => Ok(None),
        None if has_stream_inf(text) => Ok(Some(Vec::new())),
        None => Ok(None),
    }
}

/// Picks the media playlist URL to fetch.
///
/// `Ok(None)`: not a master playlist, `text` is itself the media playlist.
/// `Ok(Some(url))`: the variant with strictly greatest bandwidth (first wins ties).
/// `Err(NoVariant)`: a master playlist with no usable variant.
pub fn select_variant(text: &str, base_url: &str) -> Result<Option<String>> {
    let Some(variants) = variants(text, base_url)? else {
        return Ok(None);
    };
    let mut best: Option<Variant> = None;
    for v in variants {
        if v.bandwidth > best.as_ref().map_or(0, |b| b.bandwidth) {
            best = Some(v);
        }
    }
    match best {
        Some(v) => {
            tracing::info!(bandwidth = v.bandwidth, uri = %v.uri, "selected best quality stream");
            Ok(Some(v.uri))
        }
        None => Err(DownloadError::NoVariant {
            url: base_url.to_string(),
        }),
    }
}

fn media_segments(media: &MediaPlaylist, base_url: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::with_capacity(media.segments.len());
    for seg in &media.segments {
        if !is_uri_line(&seg.uri) {
            continue;
        }
        let reference = seg.uri.trim();
        segments.push(Segment {
            source_url: resolve_reference(base_url, reference)?,
            local_filename: segment_filename(reference),
        });
    }
    Ok(segments)
}

/// Segment references of a media playlist, resolved against `base_url`, in order.
/// Anything that is not a media playlist with at least one segment is
/// `EmptyPlaylist`.
pub fn parse_segments(text: &str, base_url: &str) -> Result<Vec<Segment>> {
    let segments = match parse(text, base_url) {
        Some(Playlist::MediaPlaylist(media)) => media_segments(&media, base_url)?,
        _ => Vec::new(),
    };
    if segments.is_empty() {
        return Err(DownloadError::EmptyPlaylist {
            url: base_url.to_string(),
        });
    }
    Ok(segments)
}

/// Copy of `text` with each URI line replaced by its bare local filename.
/// Tag, comment and blank lines (and all line endings) are kept byte-for-byte.
pub fn rewrite_local(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in text.split_inclusive('\n') {
        let body = piece.trim_end_matches(['\r', '\n']);
        if is_uri_line(body) {
            out.push_str(&segment_filename(body.trim()));
            out.push_str(&piece[body.len()..]);
        } else {
            out.push_str(piece);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example/show/ep1/master.m3u8";

    const MASTER: &str = "#EXTM3U\n\
#EXT-X-STREAM-INF:BANDWIDTH=480000,RESOLUTION=640x360\n\
360p/index.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=1200000,RESOLUTION=1280x720\n\
720p/index.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=854x480\n\
480p/index.m3u8\n";

    const MEDIA: &str = "#EXTM3U\n\
#EXT-X-VERSION:3\n\
#EXT-X-TARGETDURATION:10\n\
#EXTINF:10.0,\n\
seg_000.ts?token=abc\n\
#EXTINF:10.0,\n\
https://edge.example/x/seg_001.ts\n\
#EXTINF:4.2,\n\
sub/seg_002.ts\n\
#EXT-X-ENDLIST\n";

    #[test]
    fn selects_greatest_bandwidth() {
        let url = select_variant(MASTER, BASE).unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://cdn.example/show/ep1/720p/index.m3u8")
        );
    }

    #[test]
    fn ties_keep_first_seen() {
        let text = "#EXTM3U\n\
#EXT-X-STREAM-INF:BANDWIDTH=900\n\
a.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=900\n\
b.m3u8\n";
        let url = select_variant(text, BASE).unwrap().unwrap();
        assert!(url.ends_with("/a.m3u8"), "{}", url);
    }

    #[test]
    fn average_bandwidth_is_not_bandwidth() {
        let text = "#EXTM3U\n\
#EXT-X-STREAM-INF:AVERAGE-BANDWIDTH=9000000,BANDWIDTH=100,CODECS=\"avc1.4d401f,mp4a.40.2\"\n\
low.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=200,CODECS=\"avc1.4d401f,mp4a.40.2\"\n\
high.m3u8\n";
        let all = variants(text, BASE).unwrap().unwrap();
        assert_eq!(all[0].bandwidth, 100);
        assert_eq!(all[1].bandwidth, 200);
        let url = select_variant(text, BASE).unwrap().unwrap();
        assert!(url.ends_with("/high.m3u8"));
    }

    #[test]
    fn media_playlist_has_no_variant() {
        assert_eq!(select_variant(MEDIA, BASE).unwrap(), None);
    }

    #[test]
    fn stream_inf_without_uri_is_no_variant() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=1000\n#EXT-X-ENDLIST\n";
        assert!(matches!(
            select_variant(text, BASE),
            Err(DownloadError::NoVariant { .. })
        ));
    }

    #[test]
    fn iframe_streams_are_not_candidates() {
        let text = "#EXTM3U\n\
#EXT-X-I-FRAME-STREAM-INF:BANDWIDTH=9000000,URI=\"iframes.m3u8\"\n\
#EXT-X-STREAM-INF:BANDWIDTH=500000\n\
main.m3u8\n";
        let all = variants(text, BASE).unwrap().unwrap();
        assert_eq!(all.len(), 1);
        let url = select_variant(text, BASE).unwrap().unwrap();
        assert!(url.ends_with("/main.m3u8"), "{}", url);
    }

    #[test]
    fn zero_bandwidth_never_wins() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=0\nzero.m3u8\n";
        assert!(matches!(
            select_variant(text, BASE),
            Err(DownloadError::NoVariant { .. })
        ));
    }

    #[test]
    fn segments_resolved_in_order() {
        let base = "https://cdn.example/show/ep1/720p/index.m3u8";
        let segs = parse_segments(MEDIA, base).unwrap();
        assert_eq!(segs.len(), 3);
        assert_eq!(
            segs[0].source_url,
            "https://cdn.example/show/ep1/720p/seg_000.ts?token=abc"
        );
        assert_eq!(segs[0].local_filename, "seg_000.ts");
        assert_eq!(segs[1].source_url, "https://edge.example/x/seg_001.ts");
        assert_eq!(segs[2].source_url, "https://cdn.example/show/ep1/720p/sub/seg_002.ts");
        assert_eq!(segs[2].local_filename, "seg_002.ts");
    }

    #[test]
    fn comment_only_playlist_is_empty() {
        let text = "#EXTM3U\n#EXT-X-TARGETDURATION:10\n\n#EXT-X-ENDLIST\n";
        assert!(matches!(
            parse_segments(text, BASE),
            Err(DownloadError::EmptyPlaylist { .. })
        ));
    }

    #[test]
    fn non_media_documents_have_no_segments() {
        for text in ["", MASTER] {
            assert!(matches!(
                parse_segments(text, BASE),
                Err(DownloadError::EmptyPlaylist { .. })
            ));
        }
    }

    #[test]
    fn rewrite_keeps_directives_verbatim() {
        let rewritten = rewrite_local(MEDIA);
        let expected = "#EXTM3U\n\
#EXT-X-VERSION:3\n\
#EXT-X-TARGETDURATION:10\n\
#EXTINF:10.0,\n\
seg_000.ts\n\
#EXTINF:10.0,\n\
seg_001.ts\n\
#EXTINF:4.2,\n\
seg_002.ts\n\
#EXT-X-ENDLIST\n";
        assert_eq!(rewritten, expected);
    }

    #[test]
    fn rewrite_preserves_crlf_and_odd_spacing() {
        let text = "#EXTM3U\r\n#EXTINF:5.0,  title with spaces \r\n  a/b.ts?q=1  \r\n\r\n#EXT-X-ENDLIST";
        let rewritten = rewrite_local(text);
        assert_eq!(
            rewritten,
            "#EXTM3U\r\n#EXTINF:5.0,  title with spaces \r\nb.ts\r\n\r\n#EXT-X-ENDLIST"
        );
    }
}
