//! sportsmaster — sports playlist generator
//!
//! Merges several live-TV M3U playlists, classifies channels into sports
//! categories by keyword rule, enriches them with XMLTV EPG data (current
//! programme, live/event flags), and emits ordered playlist output plus a
//! trimmed EPG file.
//!
//! The pipeline core (`pipeline`, `sources::m3u`, `sources::xmltv`,
//! `output`) is pure and synchronous; network fetching lives in
//! `sources::fetch` and is only used by the binary.

pub mod config;
pub mod errors;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sources;
