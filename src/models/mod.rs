//! Core data model for the sportsmaster pipeline
//!
//! Records are created once per batch run from parsed input and progressively
//! enriched by pure transformation stages; no record is mutated after a stage
//! hands it to the next, and none outlives a single pipeline invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single playlist entry parsed from an extended-M3U source.
///
/// Invariant: `url` is never empty (the parser only emits a record once it
/// has seen a stream URL line). `name` is never empty either; entries with
/// no usable display name get a placeholder derived from the URL tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub name: String,
    /// Stream URI; deduplication key across sources
    pub url: String,
    pub logo_url: String,
    /// Upstream grouping, may be empty
    pub group_title: String,
    pub tvg_id: String,
    pub tvg_name: String,
    /// Which configured source produced this record (e.g. "premium", "ppv-land")
    pub source_tag: String,
    /// Lower value = higher priority; assigned from configured source order
    pub source_priority: u32,
}

/// A `<channel>` element from an XMLTV feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpgChannelRecord {
    pub channel_id: String,
    /// All non-empty `<display-name>` values, in document order
    pub display_labels: Vec<String>,
    pub epg_source_tag: String,
    /// Lower value = higher priority; assigned from configured feed order
    pub epg_source_priority: u32,
}

/// A `<programme>` element from an XMLTV feed.
///
/// Invariant: `start <= stop`. Programmes whose timestamps fail to parse
/// (or run backwards) are dropped at parse time, never retained with
/// placeholder times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammeRecord {
    pub channel_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub epg_source_tag: String,
    pub epg_source_priority: u32,
}

/// One classification rule: a category label plus the case-insensitive
/// substrings that select it. Rule-table order encodes priority.
///
/// `exclusions` suppress the rule for names where a keyword is a known
/// false positive (e.g. a betting rule's "bet" matching the BET network).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

/// Whether unclassified channels are dropped or bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMode {
    /// Channels matching no rule (and no generic sports vocabulary) are dropped
    SportsOnly,
    /// Unmatched channels are kept under an explicit "Everything Else" bucket
    Permissive,
}

/// A fully enriched channel, ready for block building and serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedChannel {
    pub record: ChannelRecord,
    pub category: String,
    pub is_event: bool,
    pub is_live: bool,
    /// Resolved EPG channel id, if any tier of identity resolution matched
    pub epg_channel_id: Option<String>,
    /// Title of the programme airing at the pipeline's `now`; empty if none
    pub current_programme: String,
    /// Best-effort event number extracted from the name ("UFC 300" -> 300)
    pub event_number: Option<u32>,
}
