use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sportsmaster::{
    config::Config,
    output,
    pipeline::{self, PipelineOptions, TaggedEpgFeed, TaggedPlaylist},
    sources::fetch::FetchClient,
};

#[derive(Parser)]
#[command(name = "sportsmaster")]
#[command(version)]
#[command(about = "Sports playlist generator: merge M3U sources and enrich them with EPG data")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Output directory (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Pin the "now" instant (RFC3339) for reproducible runs
    #[arg(long, value_name = "TIMESTAMP")]
    now: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    let mut config = Config::load(&cli.config)?;
    if let Some(output_dir) = cli.output {
        config.output.directory = output_dir;
    }

    let now: DateTime<Utc> = match &cli.now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("invalid --now timestamp '{raw}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let client = FetchClient::new(config.http.timeout_secs);

    let mut playlists = Vec::new();
    for (priority, source) in config.playlists.iter().enumerate() {
        match client.fetch_text(&source.url).await {
            Ok(text) if !text.trim().is_empty() => {
                playlists.push(TaggedPlaylist {
                    tag: source.name.clone(),
                    priority: priority as u32,
                    text,
                });
            }
            Ok(_) => warn!("Playlist source '{}' returned an empty document", source.name),
            Err(e) => warn!("Skipping playlist source '{}': {}", source.name, e),
        }
    }

    let mut epg_feeds = Vec::new();
    for (priority, source) in config.epg_sources.iter().enumerate() {
        match client.fetch_bytes(&source.url).await {
            Ok(bytes) => {
                epg_feeds.push(TaggedEpgFeed {
                    tag: source.name.clone(),
                    priority: priority as u32,
                    url_hint: source.url.clone(),
                    bytes,
                });
            }
            Err(e) => warn!("Skipping EPG source '{}': {}", source.name, e),
        }
    }

    let options = PipelineOptions {
        rules: config.classification.rules.clone(),
        generic_keywords: config.classification.generic_keywords.clone(),
        mode: config.classification.mode,
        category_order: config.output.category_order.clone(),
    };
    let result = pipeline::run_pipeline(&playlists, &epg_feeds, &options, now)?;

    let out_dir = std::path::Path::new(&config.output.directory);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

    let playlist_path = out_dir.join(&config.output.playlist_filename);
    std::fs::write(&playlist_path, output::m3u::render_playlist(&result.blocks))?;
    info!("Wrote {}", playlist_path.display());

    if !config.output.free_playlist_filename.is_empty() {
        let free_blocks = result.blocks.without_source_tags(&config.premium_tags());
        let free_path = out_dir.join(&config.output.free_playlist_filename);
        std::fs::write(&free_path, output::m3u::render_playlist(&free_blocks))?;
        info!(
            "Wrote {} ({} free channels)",
            free_path.display(),
            free_blocks.channel_count()
        );
    }

    if !config.output.epg_filename.is_empty() && !result.epg_channels.is_empty() {
        let channel_ids = result.blocks.resolved_channel_ids();
        let xml = output::xmltv::render_trimmed_epg(
            &channel_ids,
            &result.epg_channels,
            &result.programme_index,
        );
        let epg_path = out_dir.join(&config.output.epg_filename);
        output::xmltv::write_with_gzip(&epg_path, &xml)?;
        info!(
            "Wrote {} (+.gz) covering {} channel(s)",
            epg_path.display(),
            channel_ids.len()
        );
    }

    Ok(())
}
