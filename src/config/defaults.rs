//! Configuration default values
//!
//! All built-in defaults live here so they are changeable in one place.
//! The default source list and category tables reproduce the curated
//! sports-playlist setup this tool started from; a premium provider is
//! deliberately absent from the defaults and must be configured explicitly
//! (credentials never live in code).

use crate::models::CategoryRule;

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

// Output defaults
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_PLAYLIST_FILENAME: &str = "sports_master.m3u";
pub const DEFAULT_FREE_PLAYLIST_FILENAME: &str = "sports_master_free.m3u";
pub const DEFAULT_EPG_FILENAME: &str = "sports_master.xml";

/// Free playlist sources, highest priority first. Priority rank is the
/// position in this list (after any premium sources configured above them).
pub const DEFAULT_FREE_PLAYLISTS: &[(&str, &str)] = &[
    (
        "ppv-land",
        "https://raw.githubusercontent.com/BuddyChewChew/ppv/refs/heads/main/PPVLand.m3u8",
    ),
    (
        "pixelsports",
        "https://raw.githubusercontent.com/BuddyChewChew/My-Streams/refs/heads/main/Pixelsports.m3u8",
    ),
    (
        "streamsu",
        "https://raw.githubusercontent.com/BuddyChewChew/My-Streams/refs/heads/main/StreamSU.m3u",
    ),
    (
        "backup",
        "https://raw.githubusercontent.com/BuddyChewChew/My-Streams/refs/heads/main/Backup.m3u",
    ),
    (
        "buddylive-combined",
        "https://raw.githubusercontent.com/BuddyChewChew/buddylive-combined/refs/heads/main/combined_playlist.m3u",
    ),
    (
        "buddylive-en",
        "https://raw.githubusercontent.com/BuddyChewChew/buddylive/refs/heads/main/en/videoall.m3u",
    ),
    (
        "events",
        "https://raw.githubusercontent.com/BuddyChewChew/iptv/refs/heads/main/M3U8/events.m3u8",
    ),
];

/// Vocabulary that marks a channel as broadly sports-related when no
/// specific category rule matched.
pub const DEFAULT_GENERIC_SPORTS_KEYWORDS: &[&str] =
    &["sports", "espn", "bein", "tsn", "sky sports", "fs1", "fs2"];

/// Built-in category rule table. Order encodes priority: the first rule
/// whose keywords match wins.
pub fn default_category_rules() -> Vec<CategoryRule> {
    fn rule(label: &str, keywords: &[&str], exclusions: &[&str]) -> CategoryRule {
        CategoryRule {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            exclusions: exclusions.iter().map(|e| e.to_string()).collect(),
        }
    }

    vec![
        rule(
            "Football (NFL + NCAA)",
            &[
                "nfl",
                "football",
                "ncaaf",
                "ncaa",
                "redzone",
                "espn college",
                "college football",
            ],
            &[],
        ),
        rule(
            "Basketball (NBA + NCAA)",
            &["nba", "basketball", "ncaab", "college basketball"],
            &[],
        ),
        rule(
            "Baseball (MLB + NCAA)",
            &["mlb", "baseball", "ncaa baseball"],
            &[],
        ),
        rule("Hockey (NHL)", &["nhl", "hockey"], &[]),
        rule(
            "Soccer / Futbol",
            &[
                "soccer",
                "futbol",
                "premier",
                "uptv",
                "mls",
                "champions league",
                "bundesliga",
                "laliga",
                "serie a",
            ],
            &[],
        ),
        rule(
            "Combat Sports (UFC/WWE/Boxing)",
            &["ufc", "wwe", "boxing", "mma", "fight", "ppv"],
            &[],
        ),
        rule(
            "Motorsports (F1/NASCAR/Indy)",
            &["nascar", "f1", "formula", "indy", "motogp"],
            &[],
        ),
        rule(
            "Golf / Tennis / Other",
            &["golf", "tennis", "pga", "atp", "wta", "ryder"],
            &[],
        ),
        // "bet" is also the BET entertainment network; exclude its channel
        // family so those never land in the betting category.
        rule(
            "Sports Betting",
            &["bet", "betting", "odds", "wager"],
            &["bet her", "bet plus", "bet jams", "bet soul", "bet gospel"],
        ),
    ]
}

/// Default category emission order: the rule-table order, then the two
/// synthetic buckets. Categories absent from this list are appended
/// alphabetically by the block builder.
pub fn default_category_order() -> Vec<String> {
    let mut order: Vec<String> = default_category_rules()
        .into_iter()
        .map(|r| r.label)
        .collect();
    order.push(crate::pipeline::classify::GENERAL_SPORTS_LABEL.to_string());
    order.push(crate::pipeline::classify::EVERYTHING_ELSE_LABEL.to_string());
    order
}
