use super::RequestsLoggingLevel;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Shared secret gating the analytics report endpoint. `None` means the
    /// deployment forgot to configure one; the report endpoint fails closed.
    pub report_secret: Option<String>,
    /// Root of the music tree, served statically under `/music`.
    pub music_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3010,
            report_secret: None,
            music_dir: PathBuf::from("music"),
        }
    }
}
