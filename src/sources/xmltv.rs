//! Streaming XMLTV parser for EPG feeds
//!
//! Extracts only the fields the pipeline uses: `<channel id>` with its
//! display names, and `<programme channel start stop>` with its title.
//! Feeds may arrive gzip-compressed; compression is detected by magic bytes
//! (with the URL's `.gz` suffix as a hint) and handled transparently.
//!
//! Timestamp handling accepts the three forms seen in the wild:
//! `YYYYMMDDHHMMSS +HHMM`, `YYYYMMDDHHMMSS+HHMM`, and a bare 14-digit value
//! with implicit UTC. A programme with an unparseable timestamp is dropped
//! on its own; it never takes the feed down with it.

use std::io::Read;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use flate2::read::GzDecoder;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info};

use crate::errors::{AppResult, SourceError};
use crate::models::{EpgChannelRecord, ProgrammeRecord};

/// Parsed contents of one XMLTV feed
#[derive(Debug, Default)]
pub struct EpgDocument {
    pub channels: Vec<EpgChannelRecord>,
    pub programmes: Vec<ProgrammeRecord>,
}

/// Parse raw XMLTV bytes (optionally gzip-compressed) from one EPG source.
///
/// `url_hint` is only consulted for a `.gz` suffix; detection by magic bytes
/// takes precedence.
pub fn parse_epg(
    bytes: &[u8],
    url_hint: &str,
    source_tag: &str,
    source_priority: u32,
) -> AppResult<EpgDocument> {
    let decoded = maybe_decompress(bytes, url_hint)?;
    let content = String::from_utf8_lossy(&decoded);
    let document = parse_xmltv_content(&content, source_tag, source_priority)?;

    info!(
        "Parsed EPG source '{}': {} channels, {} programmes",
        source_tag,
        document.channels.len(),
        document.programmes.len()
    );
    Ok(document)
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn maybe_decompress(bytes: &[u8], url_hint: &str) -> Result<Vec<u8>, SourceError> {
    let has_magic = bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC;
    let has_suffix = url_hint
        .split('?')
        .next()
        .is_some_and(|path| path.ends_with(".gz"));

    if !has_magic && !has_suffix {
        return Ok(bytes.to_vec());
    }

    let mut decoder = GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| SourceError::Decompression {
            message: e.to_string(),
        })?;
    Ok(decompressed)
}

/// Working state for a `<programme>` element while its children stream by
struct PendingProgramme {
    channel_id: String,
    start_raw: String,
    stop_raw: String,
    title: String,
}

fn parse_xmltv_content(
    content: &str,
    source_tag: &str,
    source_priority: u32,
) -> AppResult<EpgDocument> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut document = EpgDocument::default();
    let mut current_channel: Option<(String, Vec<String>)> = None;
    let mut current_programme: Option<PendingProgramme> = None;
    let mut current_text = String::new();
    let mut dropped = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                match e.name().as_ref() {
                    b"channel" => {
                        let attrs = parse_attributes(e);
                        let id = attrs
                            .iter()
                            .find(|(k, _)| k == "id")
                            .map(|(_, v)| v.clone())
                            .unwrap_or_default();
                        current_channel = Some((id, Vec::new()));
                    }
                    b"programme" => {
                        let attrs = parse_attributes(e);
                        let get = |key: &str| {
                            attrs
                                .iter()
                                .find(|(k, _)| k == key)
                                .map(|(_, v)| v.clone())
                                .unwrap_or_default()
                        };
                        current_programme = Some(PendingProgramme {
                            channel_id: get("channel"),
                            start_raw: get("start"),
                            stop_raw: get("stop"),
                            title: String::new(),
                        });
                    }
                    _ => {}
                }
                current_text.clear();
            }

            Ok(Event::End(ref e)) => {
                match e.name().as_ref() {
                    b"display-name" => {
                        if let Some((_, labels)) = current_channel.as_mut() {
                            let label = current_text.trim();
                            if !label.is_empty() {
                                labels.push(label.to_string());
                            }
                        }
                    }
                    b"channel" => {
                        if let Some((id, labels)) = current_channel.take() {
                            if !id.is_empty() {
                                document.channels.push(EpgChannelRecord {
                                    channel_id: id,
                                    display_labels: labels,
                                    epg_source_tag: source_tag.to_string(),
                                    epg_source_priority: source_priority,
                                });
                            }
                        }
                    }
                    b"title" => {
                        if let Some(programme) = current_programme.as_mut() {
                            if programme.title.is_empty() && !current_text.trim().is_empty() {
                                programme.title = current_text.trim().to_string();
                            }
                        }
                    }
                    b"programme" => {
                        if let Some(pending) = current_programme.take() {
                            match finalize_programme(pending, source_tag, source_priority) {
                                Some(programme) => document.programmes.push(programme),
                                None => dropped += 1,
                            }
                        }
                    }
                    _ => {}
                }
                current_text.clear();
            }

            Ok(Event::Text(e)) => {
                if let Ok(text) = std::str::from_utf8(&e) {
                    current_text.push_str(text);
                }
            }

            Ok(Event::CData(e)) => {
                if let Ok(text) = std::str::from_utf8(&e) {
                    current_text.push_str(text);
                }
            }

            Ok(Event::Eof) => break,

            Err(e) => {
                return Err(SourceError::ParseError {
                    source_type: "xmltv".to_string(),
                    message: format!("XML parsing error: {e}"),
                }
                .into());
            }

            _ => {}
        }
    }

    if dropped > 0 {
        debug!(
            "EPG source '{}': dropped {} programme(s) with unusable timestamps",
            source_tag, dropped
        );
    }
    Ok(document)
}

fn finalize_programme(
    pending: PendingProgramme,
    source_tag: &str,
    source_priority: u32,
) -> Option<ProgrammeRecord> {
    if pending.channel_id.is_empty() {
        return None;
    }
    let start = parse_xmltv_timestamp(&pending.start_raw)?;
    let stop = parse_xmltv_timestamp(&pending.stop_raw)?;
    if stop < start {
        return None;
    }
    Some(ProgrammeRecord {
        channel_id: pending.channel_id,
        title: pending.title,
        start,
        stop,
        epg_source_tag: source_tag.to_string(),
        epg_source_priority: source_priority,
    })
}

fn parse_attributes(element: &BytesStart) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for attr in element.attributes().flatten() {
        if let (Ok(key), Ok(value)) = (
            std::str::from_utf8(attr.key.as_ref()),
            std::str::from_utf8(&attr.value),
        ) {
            attrs.push((key.to_string(), value.to_string()));
        }
    }
    attrs
}

/// Parse an XMLTV timestamp into UTC.
///
/// Accepted forms: `20240101120000 +0500`, `20240101120000+0500`, and bare
/// `20240101120000` (implicit UTC).
pub fn parse_xmltv_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.len() < 14 {
        return None;
    }

    let (digits, suffix) = raw.split_at(14);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = digits[0..4].parse().ok()?;
    let month: u32 = digits[4..6].parse().ok()?;
    let day: u32 = digits[6..8].parse().ok()?;
    let hour: u32 = digits[8..10].parse().ok()?;
    let minute: u32 = digits[10..12].parse().ok()?;
    let second: u32 = digits[12..14].parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;

    let offset = parse_offset_suffix(suffix)?;
    match offset {
        Some(offset) => Some(
            offset
                .from_local_datetime(&naive)
                .single()?
                .with_timezone(&Utc),
        ),
        None => Some(Utc.from_utc_datetime(&naive)),
    }
}

/// Offset suffix: optional whitespace then `+HHMM`/`-HHMM` (a colon between
/// hours and minutes is tolerated). Empty suffix means implicit UTC (`None`);
/// anything else malformed rejects the timestamp (outer `None`).
fn parse_offset_suffix(suffix: &str) -> Option<Option<FixedOffset>> {
    let suffix = suffix.trim_start();
    if suffix.is_empty() {
        return Some(None);
    }

    let (sign, rest) = match suffix.as_bytes()[0] {
        b'+' => (1, &suffix[1..]),
        b'-' => (-1, &suffix[1..]),
        _ => return None,
    };

    let rest = rest.replacen(':', "", 1);
    if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = rest[0..2].parse().ok()?;
    let minutes: i32 = rest[2..4].parse().ok()?;
    let total = sign * (hours * 3600 + minutes * 60);
    FixedOffset::east_opt(total).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tv>
  <channel id="espn.us">
    <display-name></display-name>
    <display-name>ESPN</display-name>
    <display-name>ESPN HD</display-name>
  </channel>
  <programme channel="espn.us" start="20240413200000 +0000" stop="20240413230000 +0000">
    <title>UFC 300: Prelims</title>
  </programme>
  <programme channel="espn.us" start="garbage" stop="20240413230000 +0000">
    <title>Broken</title>
  </programme>
</tv>"#;

    #[test]
    fn parses_channels_and_programmes() {
        let doc = parse_epg(SAMPLE.as_bytes(), "http://epg/guide.xml", "guide", 0).unwrap();
        assert_eq!(doc.channels.len(), 1);
        assert_eq!(doc.channels[0].channel_id, "espn.us");
        // empty display-name skipped, order preserved
        assert_eq!(doc.channels[0].display_labels, vec!["ESPN", "ESPN HD"]);

        // the garbage-timestamp programme is dropped, not the feed
        assert_eq!(doc.programmes.len(), 1);
        let p = &doc.programmes[0];
        assert_eq!(p.title, "UFC 300: Prelims");
        assert_eq!(p.start, Utc.with_ymd_and_hms(2024, 4, 13, 20, 0, 0).unwrap());
    }

    #[test]
    fn parses_gzip_payload() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let doc = parse_epg(&compressed, "http://epg/guide.xml.gz", "guide", 0).unwrap();
        assert_eq!(doc.channels.len(), 1);
        assert_eq!(doc.programmes.len(), 1);
    }

    #[test]
    fn timestamp_spaced_offset() {
        let dt = parse_xmltv_timestamp("20240101120000 +0500").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn timestamp_concatenated_offset() {
        let dt = parse_xmltv_timestamp("20240101120000-0130").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 13, 30, 0).unwrap());
    }

    #[test]
    fn timestamp_bare_is_utc() {
        let dt = parse_xmltv_timestamp("20240101120000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(parse_xmltv_timestamp("").is_none());
        assert!(parse_xmltv_timestamp("2024").is_none());
        assert!(parse_xmltv_timestamp("2024010112000x").is_none());
        assert!(parse_xmltv_timestamp("20240101120000 junk").is_none());
        assert!(parse_xmltv_timestamp("20241301120000").is_none()); // month 13
    }

    #[test]
    fn backwards_interval_is_dropped() {
        let xml = r#"<tv>
  <programme channel="c1" start="20240101120000" stop="20240101110000">
    <title>Backwards</title>
  </programme>
</tv>"#;
        let doc = parse_epg(xml.as_bytes(), "x", "guide", 0).unwrap();
        assert!(doc.programmes.is_empty());
    }

    #[test]
    fn missing_stop_drops_programme() {
        let xml = r#"<tv>
  <programme channel="c1" start="20240101120000">
    <title>No stop</title>
  </programme>
</tv>"#;
        let doc = parse_epg(xml.as_bytes(), "x", "guide", 0).unwrap();
        assert!(doc.programmes.is_empty());
    }
}
