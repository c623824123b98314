//! The enrichment pipeline
//!
//! A single-threaded, single-pass batch over already-fetched inputs:
//! parse -> merge/dedup -> classify -> resolve EPG identity -> resolve
//! current programme -> detect live/event -> build ordered blocks.
//!
//! Every stage is a pure function of its inputs and the explicit `now`
//! instant, so a rerun over identical inputs produces byte-identical
//! output regardless of how (or in what order) the inputs were fetched.

pub mod blocks;
pub mod classify;
pub mod live;
pub mod merge;
pub mod resolve;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::errors::AppResult;
use crate::models::{CategoryRule, ClassificationMode, ClassifiedChannel, EpgChannelRecord};
use crate::sources::{m3u, xmltv};

use blocks::PlaylistBlocks;
use resolve::{EpgIndex, ProgrammeIndex};

/// Raw playlist text tagged with its configured source identity.
pub struct TaggedPlaylist {
    pub tag: String,
    /// Lower = higher priority (position in the configured source list)
    pub priority: u32,
    pub text: String,
}

/// Raw EPG bytes tagged with their configured feed identity.
pub struct TaggedEpgFeed {
    pub tag: String,
    pub priority: u32,
    /// Consulted only for a `.gz` suffix hint
    pub url_hint: String,
    pub bytes: Vec<u8>,
}

/// Everything the pipeline needs besides the inputs themselves.
pub struct PipelineOptions {
    pub rules: Vec<CategoryRule>,
    pub generic_keywords: Vec<String>,
    pub mode: ClassificationMode,
    pub category_order: Vec<String>,
}

/// Enriched, ordered pipeline result, ready for serialization.
#[derive(Debug)]
pub struct PipelineOutput {
    pub blocks: PlaylistBlocks,
    /// All EPG channels seen, for the trimmed XMLTV output
    pub epg_channels: Vec<EpgChannelRecord>,
    pub programme_index: ProgrammeIndex,
}

/// Run the full pipeline over already-fetched inputs at an explicit `now`.
///
/// EPG trouble is never fatal: an unusable feed is skipped with a warning
/// and liveness detection degrades to text heuristics. The only hard
/// failure is an empty merge result.
pub fn run_pipeline(
    playlists: &[TaggedPlaylist],
    epg_feeds: &[TaggedEpgFeed],
    options: &PipelineOptions,
    now: DateTime<Utc>,
) -> AppResult<PipelineOutput> {
    let collections: Vec<_> = playlists
        .iter()
        .map(|p| m3u::parse_playlist(&p.text, &p.tag, p.priority))
        .collect();
    let merged = merge::merge_channels(collections)?;

    let mut epg_channels = Vec::new();
    let mut programmes = Vec::new();
    for feed in epg_feeds {
        match xmltv::parse_epg(&feed.bytes, &feed.url_hint, &feed.tag, feed.priority) {
            Ok(document) => {
                epg_channels.extend(document.channels);
                programmes.extend(document.programmes);
            }
            Err(e) => {
                warn!("Skipping EPG source '{}': {}", feed.tag, e);
            }
        }
    }

    let epg_index = EpgIndex::build(&epg_channels);
    let programme_index = ProgrammeIndex::build(programmes);

    let mut classified = Vec::with_capacity(merged.len());
    let mut dropped = 0usize;
    for record in merged {
        let Some(category) = classify::classify(
            &record.name,
            &record.group_title,
            &options.rules,
            &options.generic_keywords,
            options.mode,
        ) else {
            dropped += 1;
            continue;
        };

        let epg_channel_id = epg_index.resolve(&record);
        let current_programme = epg_channel_id
            .as_deref()
            .and_then(|id| programme_index.current_programme(id, now))
            .map(|p| p.title.clone())
            .unwrap_or_default();

        let is_event = live::is_event(&record.name, &record.group_title);
        let is_live = live::is_live(&record.name, &record.group_title, &current_programme);
        let event_number = live::extract_event_number(&record.name);

        classified.push(ClassifiedChannel {
            record,
            category,
            is_event,
            is_live,
            epg_channel_id,
            current_programme,
            event_number,
        });
    }

    if dropped > 0 {
        debug!("Classifier dropped {} non-sports channel(s)", dropped);
    }

    let blocks = blocks::build_blocks(classified, &options.category_order);
    info!(
        "Pipeline produced {} channels ({} in Live Events, {} category blocks)",
        blocks.channel_count(),
        blocks.live_events.len(),
        blocks.categories.len()
    );

    Ok(PipelineOutput {
        blocks,
        epg_channels,
        programme_index,
    })
}
