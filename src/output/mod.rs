//! Output serialization: extended-M3U playlists and the trimmed XMLTV file.

pub mod m3u;
pub mod xmltv;
