//! Keyword-rule classifier
//!
//! Rules are configuration data, not branching code: an ordered table of
//! (label, keywords, exclusions). The first rule whose keyword matches the
//! lower-cased "name group" text wins; a rule carrying exclusions is skipped
//! entirely when an exclusion term is present, so ambiguous keywords (a
//! betting rule's "bet" inside the BET network's channel names) cannot
//! produce false positives. A generic-sports fallback catches channels with
//! broad sports vocabulary but no specific category.

use crate::models::{CategoryRule, ClassificationMode};

pub const GENERAL_SPORTS_LABEL: &str = "General Sports";
pub const EVERYTHING_ELSE_LABEL: &str = "Everything Else";

/// Classify a channel by name and upstream group title.
///
/// Returns `None` only in [`ClassificationMode::SportsOnly`] when no rule
/// and no generic keyword matches; in permissive mode every channel gets a
/// category. Pure and deterministic for a fixed rule table.
pub fn classify(
    name: &str,
    group: &str,
    rules: &[CategoryRule],
    generic_keywords: &[String],
    mode: ClassificationMode,
) -> Option<String> {
    let text = format!("{} {}", name, group).to_lowercase();

    for rule in rules {
        // Exclusion check runs before any positive keyword matching.
        if rule
            .exclusions
            .iter()
            .any(|e| text.contains(&e.to_lowercase()))
        {
            continue;
        }
        if rule
            .keywords
            .iter()
            .any(|k| text.contains(&k.to_lowercase()))
        {
            return Some(rule.label.clone());
        }
    }

    if generic_keywords
        .iter()
        .any(|k| text.contains(&k.to_lowercase()))
    {
        return Some(GENERAL_SPORTS_LABEL.to_string());
    }

    match mode {
        ClassificationMode::SportsOnly => None,
        ClassificationMode::Permissive => Some(EVERYTHING_ELSE_LABEL.to_string()),
    }
}
