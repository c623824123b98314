//! Source acquisition and parsing
//!
//! `m3u` and `xmltv` are pure parsers over already-fetched input; `fetch`
//! is the HTTP collaborator used by the binary.

pub mod fetch;
pub mod m3u;
pub mod xmltv;
