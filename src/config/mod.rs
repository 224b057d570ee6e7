mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that participate in config resolution. Mirrors the fields a
/// TOML config file can override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub store_db: Option<PathBuf>,
    pub music_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub report_secret: Option<String>,
    pub diagnostic_log_cap: usize,
    pub prune_interval_hours: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_db: PathBuf,
    pub music_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    /// Shared secret for the analytics report endpoint. Absence is not a
    /// startup error: ingestion keeps serving and the report endpoint fails
    /// closed instead.
    pub report_secret: Option<String>,
    /// Maximum diagnostic-log entries to retain. 0 disables pruning.
    pub diagnostic_log_cap: usize,
    pub prune_interval_hours: u64,
}

impl AppConfig {
    /// Resolves configuration from CLI arguments and an optional TOML file.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let store_db = file
            .store_db
            .map(PathBuf::from)
            .or_else(|| cli.store_db.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("store_db must be specified via --store-db or in config file")
            })?;

        if let Some(parent) = store_db.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Store database directory does not exist: {:?}", parent);
            }
        }

        let music_dir = file
            .music_dir
            .map(PathBuf::from)
            .or_else(|| cli.music_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("music_dir must be specified via --music-dir or in config file")
            })?;

        if !music_dir.is_dir() {
            bail!("Music directory does not exist: {:?}", music_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let report_secret = file.report_secret.or_else(|| cli.report_secret.clone());

        let diagnostic_log_cap = file.diagnostic_log_cap.unwrap_or(cli.diagnostic_log_cap);
        let prune_interval_hours = file
            .prune_interval_hours
            .unwrap_or(cli.prune_interval_hours);

        Ok(Self {
            store_db,
            music_dir,
            port,
            logging_level,
            report_secret,
            diagnostic_log_cap,
            prune_interval_hours,
        })
    }
}

/// Parses a logging level string via clap's ValueEnum trait.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
