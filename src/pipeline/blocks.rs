//! Block builder: final partitioning and ordering of classified channels
//!
//! Output is a Live-Events block (channels that are both a scheduled event
//! and currently live) followed by per-category blocks for everything else.
//! All ordering is deterministic:
//!
//! * Live-Events: (category rank in configured order, category label,
//!   event number with `None` after numbered entries, name).
//! * Within a category: live channels first, then case-insensitive
//!   alphabetical by name.
//! * Block order: the configured category order, then unlisted categories
//!   appended alphabetically.

use std::collections::BTreeMap;

use crate::models::ClassifiedChannel;

#[derive(Debug, Clone)]
pub struct CategoryBlock {
    pub label: String,
    pub channels: Vec<ClassifiedChannel>,
}

#[derive(Debug, Clone)]
pub struct PlaylistBlocks {
    pub live_events: Vec<ClassifiedChannel>,
    pub categories: Vec<CategoryBlock>,
}

/// Partition and sort classified channels into emission order.
pub fn build_blocks(channels: Vec<ClassifiedChannel>, category_order: &[String]) -> PlaylistBlocks {
    let rank = |label: &str| {
        category_order
            .iter()
            .position(|c| c == label)
            .unwrap_or(usize::MAX)
    };

    let (mut live_events, rest): (Vec<_>, Vec<_>) = channels
        .into_iter()
        .partition(|c| c.is_event && c.is_live);

    live_events.sort_by_key(|c| {
        (
            rank(&c.category),
            c.category.clone(),
            // None sorts after all numbered entries
            c.event_number.is_none(),
            c.event_number.unwrap_or(0),
            c.record.name.to_lowercase(),
        )
    });

    // BTreeMap gives alphabetical order for the unlisted-category tail.
    let mut by_category: BTreeMap<String, Vec<ClassifiedChannel>> = BTreeMap::new();
    for channel in rest {
        by_category
            .entry(channel.category.clone())
            .or_default()
            .push(channel);
    }

    let mut categories = Vec::with_capacity(by_category.len());
    for label in category_order {
        if let Some(channels) = by_category.remove(label) {
            categories.push(CategoryBlock {
                label: label.clone(),
                channels,
            });
        }
    }
    for (label, channels) in by_category {
        categories.push(CategoryBlock { label, channels });
    }

    for block in &mut categories {
        block
            .channels
            .sort_by_key(|c| (!c.is_live, c.record.name.to_lowercase()));
    }

    PlaylistBlocks {
        live_events,
        categories,
    }
}

impl PlaylistBlocks {
    /// All channels in final emission order: Live-Events first, then the
    /// category blocks.
    pub fn iter_ordered(&self) -> impl Iterator<Item = &ClassifiedChannel> {
        self.live_events
            .iter()
            .chain(self.categories.iter().flat_map(|b| b.channels.iter()))
    }

    /// Derived variant excluding the given source tags (e.g. premium
    /// sources). A pure filter: relative ordering of the base sequence is
    /// preserved, empty blocks are removed.
    pub fn without_source_tags(&self, excluded: &[String]) -> PlaylistBlocks {
        let keep = |c: &&ClassifiedChannel| !excluded.contains(&c.record.source_tag);
        PlaylistBlocks {
            live_events: self.live_events.iter().filter(keep).cloned().collect(),
            categories: self
                .categories
                .iter()
                .map(|b| CategoryBlock {
                    label: b.label.clone(),
                    channels: b.channels.iter().filter(keep).cloned().collect(),
                })
                .filter(|b| !b.channels.is_empty())
                .collect(),
        }
    }

    pub fn channel_count(&self) -> usize {
        self.live_events.len() + self.categories.iter().map(|b| b.channels.len()).sum::<usize>()
    }

    /// EPG channel ids referenced by any output record, in emission order.
    pub fn resolved_channel_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.iter_ordered()
            .filter_map(|c| c.epg_channel_id.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}
