//! Extended-M3U playlist parser
//!
//! Best-effort line scanner: malformed metadata degrades to empty attribute
//! strings and a record is emitted for every stream URL line, so a single bad
//! entry never aborts ingestion of a source.

use tracing::{debug, info};

use crate::models::ChannelRecord;

/// URI schemes that mark a line as a stream URL
const URI_SCHEMES: &[&str] = &["http://", "https://", "rtmp://", "rtsp://", "udp://"];

const PLACEHOLDER_NAME: &str = "Unnamed Channel";

/// Working attribute set between an `#EXTINF` line and its URL line
#[derive(Default)]
struct PartialChannel {
    name: String,
    logo_url: String,
    group_title: String,
    tvg_id: String,
    tvg_name: String,
}

/// Parse extended-M3U text into channel records tagged with the producing
/// source and its priority rank.
pub fn parse_playlist(text: &str, source_tag: &str, source_priority: u32) -> Vec<ChannelRecord> {
    let mut channels = Vec::new();
    let mut current: Option<PartialChannel> = None;
    let mut bare_url_count = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();

        if line.starts_with("#EXTINF") {
            // A new EXTINF resets the working attribute set entirely so a
            // previous entry's attributes can never bleed into this one.
            current = Some(parse_extinf_line(line));
        } else if is_stream_url(line) {
            // The working set stays alive until the next EXTINF, so several
            // consecutive URL lines all carry the same attributes.
            if current.is_none() {
                bare_url_count += 1;
                debug!(
                    "Stream URL without EXTINF metadata at line {} in source '{}'",
                    line_num + 1,
                    source_tag
                );
            }
            let partial = current.as_ref();

            let name = partial
                .map(|p| p.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| name_from_url(line));

            channels.push(ChannelRecord {
                name,
                url: line.to_string(),
                logo_url: partial.map(|p| p.logo_url.clone()).unwrap_or_default(),
                group_title: partial.map(|p| p.group_title.clone()).unwrap_or_default(),
                tvg_id: partial.map(|p| p.tvg_id.clone()).unwrap_or_default(),
                tvg_name: partial.map(|p| p.tvg_name.clone()).unwrap_or_default(),
                source_tag: source_tag.to_string(),
                source_priority,
            });
        }
        // Comments, blank lines and anything unrecognised are skipped.
    }

    if bare_url_count > 0 {
        debug!(
            "Source '{}': {} stream URL(s) had no EXTINF metadata",
            source_tag, bare_url_count
        );
    }
    info!(
        "Parsed {} channels from playlist source '{}'",
        channels.len(),
        source_tag
    );
    channels
}

fn parse_extinf_line(line: &str) -> PartialChannel {
    // Display name is whatever follows the metadata's trailing comma.
    let name = line
        .rsplit_once(',')
        .map(|(_, title)| title.trim().to_string())
        .unwrap_or_default();

    PartialChannel {
        name,
        logo_url: extract_quoted_attribute(line, "tvg-logo="),
        group_title: extract_quoted_attribute(line, "group-title="),
        tvg_id: extract_quoted_attribute(line, "tvg-id="),
        tvg_name: extract_quoted_attribute(line, "tvg-name="),
    }
}

/// First-occurrence quoted attribute extraction: `key="value"` -> `value`.
/// Missing key, missing quotes or an unterminated value all yield "".
fn extract_quoted_attribute(line: &str, key: &str) -> String {
    let Some((_, rest)) = line.split_once(key) else {
        return String::new();
    };
    let Some(rest) = rest.strip_prefix('"') else {
        return String::new();
    };
    rest.split_once('"')
        .map(|(value, _)| value.to_string())
        .unwrap_or_default()
}

fn is_stream_url(line: &str) -> bool {
    URI_SCHEMES.iter().any(|scheme| line.starts_with(scheme))
}

/// Derive a display name from the URL tail (last path segment, query
/// stripped), falling back to a fixed placeholder.
fn name_from_url(url: &str) -> String {
    let name = url
        .split('/')
        .next_back()
        .unwrap_or(PLACEHOLDER_NAME)
        .split('?')
        .next()
        .unwrap_or(PLACEHOLDER_NAME);
    if name.is_empty() {
        PLACEHOLDER_NAME.to_string()
    } else {
        name.to_string()
    }
}
