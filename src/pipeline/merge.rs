//! Merge & dedup engine
//!
//! Combines the tagged channel collections of every playlist source into one
//! sequence with a single record per stream URL. The stable sort by source
//! priority makes the result invariant to fetch completion order: for any
//! URL the survivor is always the record from the highest-priority source
//! that produced it, in that source's original order.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::ChannelRecord;

/// Merge tagged channel collections into one deduplicated, priority-ordered
/// sequence. Fails only when nothing usable remains.
pub fn merge_channels(collections: Vec<Vec<ChannelRecord>>) -> AppResult<Vec<ChannelRecord>> {
    let mut all: Vec<ChannelRecord> = collections.into_iter().flatten().collect();

    // Stable: preserves within-source order for equal priorities.
    all.sort_by_key(|record| record.source_priority);

    let mut seen_urls = HashSet::new();
    let mut duplicate_count = 0usize;
    let total = all.len();

    let merged: Vec<ChannelRecord> = all
        .into_iter()
        .filter(|record| {
            debug_assert!(!record.url.is_empty());
            if seen_urls.insert(record.url.clone()) {
                true
            } else {
                duplicate_count += 1;
                false
            }
        })
        .collect();

    if duplicate_count > 0 {
        debug!(
            "Merge removed {} duplicate URL(s) out of {} records",
            duplicate_count, total
        );
    }

    if merged.is_empty() {
        return Err(AppError::NoUsableSources);
    }

    info!(
        "Merged {} source record(s) into {} unique channels",
        total,
        merged.len()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, url: &str, tag: &str, priority: u32) -> ChannelRecord {
        ChannelRecord {
            name: name.to_string(),
            url: url.to_string(),
            logo_url: String::new(),
            group_title: String::new(),
            tvg_id: String::new(),
            tvg_name: String::new(),
            source_tag: tag.to_string(),
            source_priority: priority,
        }
    }

    #[test]
    fn higher_priority_source_wins_duplicates() {
        // Lower-priority collection listed first: completion order must not matter.
        let free = vec![record("ESPN HD", "http://a/1", "free", 1)];
        let premium = vec![record("ESPN", "http://a/1", "premium", 0)];

        let merged = merge_channels(vec![free, premium]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "ESPN");
        assert_eq!(merged[0].source_tag, "premium");
    }

    #[test]
    fn one_record_per_url() {
        let a = vec![
            record("A", "http://a/1", "s0", 0),
            record("B", "http://b/1", "s0", 0),
            record("A again", "http://a/1", "s0", 0),
        ];
        let b = vec![record("B dup", "http://b/1", "s1", 1)];

        let merged = merge_channels(vec![a, b]).unwrap();
        let urls: Vec<&str> = merged.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["http://a/1", "http://b/1"]);
    }

    #[test]
    fn within_source_order_is_preserved() {
        let a = vec![
            record("Zeta", "http://z/1", "s0", 0),
            record("Alpha", "http://a/1", "s0", 0),
        ];
        let merged = merge_channels(vec![a]).unwrap();
        assert_eq!(merged[0].name, "Zeta");
        assert_eq!(merged[1].name, "Alpha");
    }

    #[test]
    fn empty_merge_is_fatal() {
        assert!(matches!(
            merge_channels(vec![vec![], vec![]]),
            Err(AppError::NoUsableSources)
        ));
    }
}
