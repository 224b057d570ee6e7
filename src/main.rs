use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tapedeck_server::analytics::DIAGNOSTIC_LOGS_TABLE;
use tapedeck_server::catalog::load_catalog;
use tapedeck_server::config::{AppConfig, CliConfig, FileConfig};
use tapedeck_server::counter_store::{CounterStore, SqliteCounterStore};
use tapedeck_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite counter database file (created on first run).
    #[clap(value_parser = parse_path)]
    pub store_db: Option<PathBuf>,

    /// Path to the music tree (music/<artist>/<album>/<tracks>).
    #[clap(long, value_parser = parse_path)]
    pub music_dir: Option<PathBuf>,

    /// Path to an optional TOML config file; its values override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3010)]
    pub port: u16,

    /// Bearer secret for the analytics report endpoint.
    #[clap(long)]
    pub report_secret: Option<String>,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Maximum diagnostic-log entries to retain. Set to 0 to disable pruning.
    #[clap(long, default_value_t = 10_000)]
    pub diagnostic_log_cap: usize,

    /// Interval in hours between diagnostic-log pruning runs.
    #[clap(long, default_value_t = 1)]
    pub prune_interval_hours: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        store_db: cli_args.store_db,
        music_dir: cli_args.music_dir,
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        report_secret: cli_args.report_secret,
        diagnostic_log_cap: cli_args.diagnostic_log_cap,
        prune_interval_hours: cli_args.prune_interval_hours,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening counter database at {:?}...", config.store_db);
    let counter_store = Arc::new(SqliteCounterStore::new(&config.store_db)?);

    info!("Scanning music tree at {:?}...", config.music_dir);
    let catalog = load_catalog(&config.music_dir)?;

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::init_catalog_metrics(
        catalog.get_artists_count(),
        catalog.get_albums_count(),
        catalog.get_tracks_count(),
    );

    if config.report_secret.is_none() {
        warn!("No report secret configured; /api/stats will refuse all requests.");
    }

    // Spawn background task for diagnostic-log pruning if enabled
    if config.diagnostic_log_cap > 0 {
        let cap = config.diagnostic_log_cap;
        let interval_hours = config.prune_interval_hours.max(1);
        let pruning_store = counter_store.clone();

        info!(
            "Diagnostic-log pruning enabled: retaining {} entries, pruning every {} hours",
            cap, interval_hours
        );

        tokio::spawn(async move {
            let interval = Duration::from_secs(interval_hours * 60 * 60);
            let mut ticker = tokio::time::interval(interval);

            // Skip the first immediate tick, wait for the first interval
            ticker.tick().await;

            loop {
                ticker.tick().await;

                match pruning_store.prune_entries(DIAGNOSTIC_LOGS_TABLE, cap) {
                    Ok(count) => {
                        if count > 0 {
                            info!("Pruned {} old diagnostic-log entries", count);
                        }
                    }
                    Err(e) => {
                        error!("Failed to prune diagnostic logs: {}", e);
                    }
                }
            }
        });
    }

    info!("Ready to serve at port {}!", config.port);
    run_server(
        ServerConfig {
            requests_logging_level: config.logging_level,
            port: config.port,
            report_secret: config.report_secret,
            music_dir: config.music_dir,
        },
        counter_store,
        catalog,
    )
    .await
}
