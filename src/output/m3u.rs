//! Extended-M3U serializer
//!
//! Renders the ordered blocks back to playlist text. The Live-Events block
//! is emitted first under its own group title; category blocks follow in
//! their configured order. Rendering is a pure function of the blocks, so
//! identical pipeline output yields byte-identical playlists.

use crate::models::ClassifiedChannel;
use crate::pipeline::blocks::PlaylistBlocks;

pub const LIVE_EVENTS_GROUP: &str = "Live Events";

pub fn render_playlist(blocks: &PlaylistBlocks) -> String {
    let mut out = String::from("#EXTM3U\n");

    for channel in &blocks.live_events {
        push_entry(&mut out, channel, LIVE_EVENTS_GROUP);
    }
    for block in &blocks.categories {
        for channel in &block.channels {
            push_entry(&mut out, channel, &block.label);
        }
    }
    out
}

fn push_entry(out: &mut String, channel: &ClassifiedChannel, group_title: &str) {
    out.push_str(&format!(
        "#EXTINF:-1 tvg-id=\"{}\" tvg-logo=\"{}\" group-title=\"{}\",{}\n",
        channel.record.tvg_id, channel.record.logo_url, group_title, channel.record.name
    ));
    out.push_str(&channel.record.url);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChannelRecord;
    use crate::pipeline::blocks::build_blocks;

    fn channel(name: &str, url: &str, category: &str, live_event: bool) -> ClassifiedChannel {
        ClassifiedChannel {
            record: ChannelRecord {
                name: name.to_string(),
                url: url.to_string(),
                logo_url: "http://logo/x.png".to_string(),
                group_title: "upstream".to_string(),
                tvg_id: "x.id".to_string(),
                tvg_name: String::new(),
                source_tag: "free".to_string(),
                source_priority: 0,
            },
            category: category.to_string(),
            is_event: live_event,
            is_live: live_event,
            epg_channel_id: None,
            current_programme: String::new(),
            event_number: None,
        }
    }

    #[test]
    fn renders_live_events_block_first() {
        let blocks = build_blocks(
            vec![
                channel("ESPN", "http://a/1", "Football", false),
                channel("UFC 300", "http://b/1", "Combat", true),
            ],
            &["Combat".to_string(), "Football".to_string()],
        );
        let playlist = render_playlist(&blocks);
        let expected = "#EXTM3U\n\
            #EXTINF:-1 tvg-id=\"x.id\" tvg-logo=\"http://logo/x.png\" group-title=\"Live Events\",UFC 300\n\
            http://b/1\n\
            #EXTINF:-1 tvg-id=\"x.id\" tvg-logo=\"http://logo/x.png\" group-title=\"Football\",ESPN\n\
            http://a/1\n";
        assert_eq!(playlist, expected);
    }

    #[test]
    fn rendering_is_idempotent() {
        let blocks = build_blocks(
            vec![channel("ESPN", "http://a/1", "Football", false)],
            &["Football".to_string()],
        );
        assert_eq!(render_playlist(&blocks), render_playlist(&blocks));
    }
}
