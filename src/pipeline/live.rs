//! Live/event detection heuristics
//!
//! `is_event` looks for scheduled-event vocabulary in the channel text.
//! `is_live` trusts EPG evidence first (a resolved current programme means
//! the channel is airing something right now); text heuristics only apply
//! when the EPG gave nothing. Event numbers are a best-effort extraction
//! used for ordering inside the Live-Events block.

use regex::Regex;

/// Scheduled-event vocabulary checked as plain substrings
const EVENT_TERMS: &[&str] = &["ppv", "fight", "card"];

/// Live-hint tokens for the no-EPG fallback. "24/7" loops are deliberately
/// not live hints.
const LIVE_HINT_TERMS: &[&str] = &["en vivo", "live now"];

/// True when the channel text reads like a scheduled event
/// ("UFC 300", "Tyson vs Paul", "Main Card", "Lakers @ Celtics").
pub fn is_event(name: &str, group: &str) -> bool {
    let text = format!("{} {}", name, group).to_lowercase();

    if EVENT_TERMS.iter().any(|t| text.contains(t)) || text.contains('@') {
        return true;
    }

    // "vs" as a word (also "vs."), and round markers like "Round 3" / "Rd 2"
    if let Ok(re) = Regex::new(r"\bvs\b|\bround\s*\d|\brd\s*\d") {
        if re.is_match(&text) {
            return true;
        }
    }
    false
}

/// True when the channel is airing right now. EPG-derived evidence (a
/// non-empty current programme title) takes precedence over text heuristics.
pub fn is_live(name: &str, group: &str, current_programme: &str) -> bool {
    if !current_programme.is_empty() {
        return true;
    }

    let text = format!("{} {}", name, group).to_lowercase();
    if LIVE_HINT_TERMS.iter().any(|t| text.contains(t)) {
        return true;
    }
    // Word-bounded so "Liverpool" is not live
    if let Ok(re) = Regex::new(r"\blive\b") {
        if re.is_match(&text) {
            return true;
        }
    }
    false
}

/// Best-effort event number from the channel name: the first number
/// following an event keyword, else the first bare number. Absence is
/// valid; the block builder sorts unnumbered entries after numbered ones.
pub fn extract_event_number(name: &str) -> Option<u32> {
    let text = name.to_lowercase();

    if let Ok(re) = Regex::new(r"(?:ufc|ppv|event|fight(?:\s+night)?|card|#)\s*#?\s*(\d{1,6})") {
        if let Some(caps) = re.captures(&text) {
            if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                return Some(n);
            }
        }
    }

    if let Ok(re) = Regex::new(r"\d{1,6}") {
        if let Some(m) = re.find(&text) {
            return m.as_str().parse().ok();
        }
    }
    None
}
