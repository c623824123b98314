//! Trimmed-XMLTV serializer
//!
//! Emits an XMLTV document containing only the channels that some output
//! record resolved to, plus every programme for those channels. A gzip
//! sibling (`<name>.gz`) is written alongside the plain file.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use quick_xml::escape::escape;

use crate::errors::AppResult;
use crate::models::EpgChannelRecord;
use crate::pipeline::resolve::ProgrammeIndex;

const XMLTV_TIMESTAMP: &str = "%Y%m%d%H%M%S +0000";

/// Render the trimmed XMLTV document for the given resolved channel ids,
/// in the order they were resolved.
pub fn render_trimmed_epg(
    channel_ids: &[String],
    epg_channels: &[EpgChannelRecord],
    programme_index: &ProgrammeIndex,
) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<tv>\n");

    for id in channel_ids {
        // Feeds are parsed in priority order, so the first record carrying
        // this id belongs to the highest-priority feed.
        let Some(channel) = epg_channels.iter().find(|c| &c.channel_id == id) else {
            continue;
        };
        out.push_str(&format!("  <channel id=\"{}\">\n", escape(id)));
        for label in &channel.display_labels {
            out.push_str(&format!(
                "    <display-name>{}</display-name>\n",
                escape(label)
            ));
        }
        out.push_str("  </channel>\n");
    }

    for id in channel_ids {
        for programme in programme_index.programmes_for(id) {
            out.push_str(&format!(
                "  <programme channel=\"{}\" start=\"{}\" stop=\"{}\">\n",
                escape(id),
                programme.start.format(XMLTV_TIMESTAMP),
                programme.stop.format(XMLTV_TIMESTAMP)
            ));
            out.push_str(&format!("    <title>{}</title>\n", escape(&programme.title)));
            out.push_str("  </programme>\n");
        }
    }

    out.push_str("</tv>\n");
    out
}

/// Write the document to `path` and a gzip copy to `<path>.gz`.
pub fn write_with_gzip(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes())?;
    let compressed = encoder.finish()?;

    let mut gz_path = path.as_os_str().to_owned();
    gz_path.push(".gz");
    std::fs::write(gz_path, compressed)?;
    Ok(())
}
