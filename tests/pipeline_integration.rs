//! End-to-end pipeline tests over in-memory fixtures.

use chrono::{TimeZone, Utc};

use sportsmaster::config::defaults::{DEFAULT_GENERIC_SPORTS_KEYWORDS, default_category_rules};
use sportsmaster::models::ClassificationMode;
use sportsmaster::output;
use sportsmaster::pipeline::{self, PipelineOptions, TaggedEpgFeed, TaggedPlaylist};

const PREMIUM_PLAYLIST: &str = r#"#EXTM3U
#EXTINF:-1 tvg-id="espn.us" tvg-logo="http://logo/espn.png" group-title="Sports",ESPN
http://a/1
#EXTINF:-1 group-title="Fight Network",UFC 300
http://premium/ufc300
"#;

const FREE_PLAYLIST: &str = r#"#EXTM3U
#EXTINF:-1 group-title="Sports",ESPN HD
http://a/1
#EXTINF:-1 group-title="News",Cooking Channel
http://free/cooking
#EXTINF:-1 group-title="Hockey",NHL Network
http://free/nhl
"#;

const EPG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tv>
  <channel id="espn.us">
    <display-name>ESPN</display-name>
  </channel>
  <channel id="ufc.events">
    <display-name>UFC 300</display-name>
  </channel>
  <programme channel="ufc.events" start="20240413200000 +0000" stop="20240414060000 +0000">
    <title>UFC 300: Prelims</title>
  </programme>
  <programme channel="espn.us" start="20240413180000 +0000" stop="20240413210000 +0000">
    <title>SportsCenter</title>
  </programme>
</tv>"#;

fn playlists() -> Vec<TaggedPlaylist> {
    vec![
        TaggedPlaylist {
            tag: "premium".to_string(),
            priority: 0,
            text: PREMIUM_PLAYLIST.to_string(),
        },
        TaggedPlaylist {
            tag: "free".to_string(),
            priority: 1,
            text: FREE_PLAYLIST.to_string(),
        },
    ]
}

fn epg_feeds() -> Vec<TaggedEpgFeed> {
    vec![TaggedEpgFeed {
        tag: "guide".to_string(),
        priority: 0,
        url_hint: "http://epg/guide.xml".to_string(),
        bytes: EPG.as_bytes().to_vec(),
    }]
}

fn options(mode: ClassificationMode) -> PipelineOptions {
    let rules = default_category_rules();
    let mut category_order: Vec<String> = rules.iter().map(|r| r.label.clone()).collect();
    category_order.push("General Sports".to_string());
    category_order.push("Everything Else".to_string());
    PipelineOptions {
        rules,
        generic_keywords: DEFAULT_GENERIC_SPORTS_KEYWORDS
            .iter()
            .map(|k| (*k).to_string())
            .collect(),
        mode,
        category_order,
    }
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 13, 21, 0, 0).unwrap()
}

#[test]
fn merge_prefers_premium_metadata_for_shared_urls() {
    let result = pipeline::run_pipeline(
        &playlists(),
        &epg_feeds(),
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap();

    let espn: Vec<_> = result
        .blocks
        .iter_ordered()
        .filter(|c| c.record.url == "http://a/1")
        .collect();
    assert_eq!(espn.len(), 1);
    assert_eq!(espn[0].record.name, "ESPN");
    assert_eq!(espn[0].record.source_tag, "premium");
}

#[test]
fn ufc_event_lands_in_live_events_block() {
    let result = pipeline::run_pipeline(
        &playlists(),
        &epg_feeds(),
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap();

    let ufc = result
        .blocks
        .live_events
        .iter()
        .find(|c| c.record.name == "UFC 300")
        .expect("UFC 300 should be a live event");
    assert!(ufc.is_event);
    assert!(ufc.is_live);
    assert_eq!(ufc.current_programme, "UFC 300: Prelims");
    assert_eq!(ufc.event_number, Some(300));
    assert_eq!(ufc.category, "Combat Sports (UFC/WWE/Boxing)");

    // Live-Events block renders before the combat category block
    let rendered = output::m3u::render_playlist(&result.blocks);
    let live_pos = rendered.find("group-title=\"Live Events\",UFC 300").unwrap();
    let combat_pos = rendered.find("group-title=\"Combat Sports").unwrap_or(usize::MAX);
    assert!(live_pos < combat_pos);
}

#[test]
fn mode_switch_drops_or_buckets_unmatched_channels() {
    let sports_only = pipeline::run_pipeline(
        &playlists(),
        &epg_feeds(),
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap();
    assert!(
        !sports_only
            .blocks
            .iter_ordered()
            .any(|c| c.record.name == "Cooking Channel")
    );

    let permissive = pipeline::run_pipeline(
        &playlists(),
        &epg_feeds(),
        &options(ClassificationMode::Permissive),
        now(),
    )
    .unwrap();
    let cooking = permissive
        .blocks
        .iter_ordered()
        .find(|c| c.record.name == "Cooking Channel")
        .expect("permissive mode keeps unmatched channels");
    assert_eq!(cooking.category, "Everything Else");
}

#[test]
fn reruns_are_byte_identical() {
    let render = || {
        let result = pipeline::run_pipeline(
            &playlists(),
            &epg_feeds(),
            &options(ClassificationMode::Permissive),
            now(),
        )
        .unwrap();
        let playlist = output::m3u::render_playlist(&result.blocks);
        let epg = output::xmltv::render_trimmed_epg(
            &result.blocks.resolved_channel_ids(),
            &result.epg_channels,
            &result.programme_index,
        );
        (playlist, epg)
    };
    assert_eq!(render(), render());
}

#[test]
fn output_is_invariant_to_fetch_completion_order() {
    let mut reversed = playlists();
    reversed.reverse();

    let a = pipeline::run_pipeline(
        &playlists(),
        &epg_feeds(),
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap();
    let b = pipeline::run_pipeline(
        &reversed,
        &epg_feeds(),
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap();

    assert_eq!(
        output::m3u::render_playlist(&a.blocks),
        output::m3u::render_playlist(&b.blocks)
    );
}

#[test]
fn missing_epg_degrades_to_text_heuristics() {
    let result = pipeline::run_pipeline(
        &playlists(),
        &[],
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap();

    // UFC 300 has no EPG evidence and no live-hint text, so it is an event
    // but not live, and lands in the combat category block instead.
    let ufc = result
        .blocks
        .iter_ordered()
        .find(|c| c.record.name == "UFC 300")
        .unwrap();
    assert!(ufc.is_event);
    assert!(!ufc.is_live);
    assert!(result.blocks.live_events.is_empty());
    assert_eq!(ufc.current_programme, "");
}

#[test]
fn empty_playlists_are_fatal() {
    let err = pipeline::run_pipeline(
        &[],
        &epg_feeds(),
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        sportsmaster::errors::AppError::NoUsableSources
    ));
}

#[test]
fn trimmed_epg_only_covers_resolved_channels() {
    let result = pipeline::run_pipeline(
        &playlists(),
        &epg_feeds(),
        &options(ClassificationMode::SportsOnly),
        now(),
    )
    .unwrap();

    let ids = result.blocks.resolved_channel_ids();
    assert!(ids.contains(&"espn.us".to_string()));

    let xml = output::xmltv::render_trimmed_epg(&ids, &result.epg_channels, &result.programme_index);
    assert!(xml.contains("<channel id=\"espn.us\">"));
    assert!(xml.contains("<title>SportsCenter</title>"));
}
