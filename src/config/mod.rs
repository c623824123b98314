//! Configuration loading for sportsmaster
//!
//! Configuration is a TOML file deserialized into [`Config`]; every field
//! has a default so an empty file (or no file at all) yields a working
//! free-sources-only setup. Premium providers and their credentials are
//! configuration data, never code.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::errors::{AppError, AppResult};
use crate::models::{CategoryRule, ClassificationMode};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Playlist sources in priority order (first = highest priority).
    /// Duplicate stream URLs keep the metadata of the earliest listed source.
    #[serde(default = "default_playlists")]
    pub playlists: Vec<PlaylistSourceConfig>,
    /// EPG feeds in priority order (first = highest priority)
    #[serde(default)]
    pub epg_sources: Vec<EpgSourceConfig>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSourceConfig {
    /// Source tag carried onto every record this source produces
    pub name: String,
    pub url: String,
    /// Premium-sourced channels are excluded from the free-only output variant
    #[serde(default)]
    pub premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpgSourceConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    #[serde(default = "default_mode")]
    pub mode: ClassificationMode,
    #[serde(default = "defaults::default_category_rules")]
    pub rules: Vec<CategoryRule>,
    #[serde(default = "default_generic_keywords")]
    pub generic_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: String,
    #[serde(default = "default_playlist_filename")]
    pub playlist_filename: String,
    /// Free-only variant; set to empty string to disable
    #[serde(default = "default_free_playlist_filename")]
    pub free_playlist_filename: String,
    /// Trimmed XMLTV output (a `.gz` sibling is written alongside);
    /// only produced when at least one EPG source is configured
    #[serde(default = "default_epg_filename")]
    pub epg_filename: String,
    /// Category emission order; unlisted categories are appended alphabetically
    #[serde(default = "defaults::default_category_order")]
    pub category_order: Vec<String>,
}

fn default_playlists() -> Vec<PlaylistSourceConfig> {
    DEFAULT_FREE_PLAYLISTS
        .iter()
        .map(|(name, url)| PlaylistSourceConfig {
            name: (*name).to_string(),
            url: (*url).to_string(),
            premium: false,
        })
        .collect()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_mode() -> ClassificationMode {
    ClassificationMode::SportsOnly
}

fn default_generic_keywords() -> Vec<String> {
    DEFAULT_GENERIC_SPORTS_KEYWORDS
        .iter()
        .map(|k| (*k).to_string())
        .collect()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_playlist_filename() -> String {
    DEFAULT_PLAYLIST_FILENAME.to_string()
}

fn default_free_playlist_filename() -> String {
    DEFAULT_FREE_PLAYLIST_FILENAME.to_string()
}

fn default_epg_filename() -> String {
    DEFAULT_EPG_FILENAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        // serde defaults are the single source of truth
        toml::from_str("").unwrap_or_else(|_| unreachable!("empty config must deserialize"))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            rules: defaults::default_category_rules(),
            generic_keywords: default_generic_keywords(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            playlist_filename: default_playlist_filename(),
            free_playlist_filename: default_free_playlist_filename(),
            epg_filename: default_epg_filename(),
            category_order: defaults::default_category_order(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file falls back to
    /// built-in defaults; a present-but-invalid file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "Config file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw).map_err(|e| {
            AppError::configuration(format!("failed to parse {}: {e}", path.display()))
        })?;

        info!(
            "Loaded config from {}: {} playlist source(s), {} EPG source(s)",
            path.display(),
            config.playlists.len(),
            config.epg_sources.len()
        );
        Ok(config)
    }

    /// Source tags belonging to premium playlist sources, used by the
    /// free-only output filter.
    pub fn premium_tags(&self) -> Vec<String> {
        self.playlists
            .iter()
            .filter(|p| p.premium)
            .map(|p| p.name.clone())
            .collect()
    }
}
