//! EPG channel identity resolution and current-programme lookup
//!
//! Identity resolution maps a playlist record to an XMLTV channel id in
//! three tiers, strongest first:
//!
//! 1. exact `tvg-id` equality,
//! 2. normalized display-label equality (indexed),
//! 3. normalized substring containment in either direction (linear scan).
//!
//! The fallback scan iterates EPG channels sorted by (EPG source priority
//! ascending, insertion order ascending) and returns the first hit; that
//! order is fixed so resolution is deterministic. The scan is approximate
//! by design and bounded: needles shorter than three characters never
//! participate.
//!
//! A failed resolution is not an error — downstream lookups simply return
//! nothing and liveness detection falls back to text heuristics.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::models::{ChannelRecord, EpgChannelRecord, ProgrammeRecord};

/// Lowercase, collapse runs of non-alphanumeric characters to single
/// spaces, trim. "ESPN-2 (HD)" and "espn 2 hd" normalize identically.
pub fn normalize_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_space = true;
        }
    }
    out
}

/// Index over all EPG channels of all configured feeds.
pub struct EpgIndex {
    channel_ids: HashSet<String>,
    by_normalized_label: HashMap<String, String>,
    /// (channel_id, normalized labels) in the fixed fallback scan order
    scan_order: Vec<(String, Vec<String>)>,
}

/// Minimum normalized-needle length for the substring fallback
const MIN_FALLBACK_NEEDLE: usize = 3;

impl EpgIndex {
    pub fn build(channels: &[EpgChannelRecord]) -> Self {
        let mut ordered: Vec<&EpgChannelRecord> = channels.iter().collect();
        // Stable: equal priorities keep insertion order.
        ordered.sort_by_key(|c| c.epg_source_priority);

        let mut channel_ids = HashSet::new();
        let mut by_normalized_label: HashMap<String, String> = HashMap::new();
        let mut scan_order = Vec::with_capacity(ordered.len());

        for channel in ordered {
            channel_ids.insert(channel.channel_id.clone());
            let mut normalized_labels = Vec::with_capacity(channel.display_labels.len());
            for label in &channel.display_labels {
                let normalized = normalize_label(label);
                if normalized.is_empty() {
                    continue;
                }
                // First writer wins, so higher-priority feeds own a label.
                by_normalized_label
                    .entry(normalized.clone())
                    .or_insert_with(|| channel.channel_id.clone());
                normalized_labels.push(normalized);
            }
            scan_order.push((channel.channel_id.clone(), normalized_labels));
        }

        Self {
            channel_ids,
            by_normalized_label,
            scan_order,
        }
    }

    /// Resolve a playlist record to an EPG channel id, or `None`.
    pub fn resolve(&self, record: &ChannelRecord) -> Option<String> {
        // Tier 1: exact tvg-id, used even when a name match would also hit.
        if !record.tvg_id.is_empty() && self.channel_ids.contains(&record.tvg_id) {
            return Some(record.tvg_id.clone());
        }

        let needle = {
            let preferred = if record.tvg_name.is_empty() {
                &record.name
            } else {
                &record.tvg_name
            };
            normalize_label(preferred)
        };
        if needle.is_empty() {
            return None;
        }

        // Tier 2: normalized label equality via the index.
        if let Some(channel_id) = self.by_normalized_label.get(&needle) {
            return Some(channel_id.clone());
        }

        // Tier 3: substring containment either way, first hit in scan order.
        if needle.len() < MIN_FALLBACK_NEEDLE {
            return None;
        }
        for (channel_id, labels) in &self.scan_order {
            for label in labels {
                if label.len() >= MIN_FALLBACK_NEEDLE
                    && (label.contains(&needle) || needle.contains(label.as_str()))
                {
                    return Some(channel_id.clone());
                }
            }
        }
        None
    }
}

/// Programmes pre-indexed by channel id for current-programme lookup.
#[derive(Debug)]
pub struct ProgrammeIndex {
    by_channel: HashMap<String, Vec<ProgrammeRecord>>,
}

impl ProgrammeIndex {
    pub fn build(programmes: Vec<ProgrammeRecord>) -> Self {
        let mut by_channel: HashMap<String, Vec<ProgrammeRecord>> = HashMap::new();
        for programme in programmes {
            by_channel
                .entry(programme.channel_id.clone())
                .or_default()
                .push(programme);
        }
        Self { by_channel }
    }

    /// The programme airing at `now` on `channel_id`, if any.
    ///
    /// Window semantics are `[start, stop)`: start inclusive, stop
    /// exclusive. Overlapping candidates from multiple feeds tie-break by
    /// EPG source priority ascending, then by start descending (the most
    /// recently started programme of the best feed).
    pub fn current_programme(
        &self,
        channel_id: &str,
        now: DateTime<Utc>,
    ) -> Option<&ProgrammeRecord> {
        self.by_channel
            .get(channel_id)?
            .iter()
            .filter(|p| p.start <= now && now < p.stop)
            .min_by_key(|p| (p.epg_source_priority, Reverse(p.start)))
    }

    /// All programmes for a channel, in feed order. Used by the trimmed
    /// XMLTV serializer.
    pub fn programmes_for(&self, channel_id: &str) -> &[ProgrammeRecord] {
        self.by_channel
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
