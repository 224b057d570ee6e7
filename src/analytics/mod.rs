mod classify;
mod event;
mod ingest;
mod names;
mod report;

pub use classify::{classify_user_agent, AgentClass};
pub use event::{ClientContext, DiagnosticRecord, ListenEvent, ListenEventBody};
pub use ingest::build_listen_batch;
pub use names::{normalize_album_name, normalize_track_name};
pub use report::{assemble_report, AnalyticsReport};

/// Event type that counts as a genuine listen for the primary play counters.
/// Everything else is a free-form engagement marker.
pub const QUALIFYING_EVENT: &str = "30s_listen";

pub const DEFAULT_EVENT_TYPE: &str = "unknown";

pub const LISTEN_COUNTS_TABLE: &str = "listen_counts";
pub const EVENTS_TABLE_PREFIX: &str = "events:";
pub const STATS_BROWSERS_TABLE: &str = "stats:browsers";
pub const STATS_OS_TABLE: &str = "stats:os";
pub const STATS_DEVICES_TABLE: &str = "stats:devices";
pub const STATS_COUNTRIES_TABLE: &str = "stats:countries";
pub const DIAGNOSTIC_LOGS_TABLE: &str = "diagnostic_logs";

/// Name of the per-track event breakdown table. Keyed by the raw track id,
/// never by a cleaned display name.
pub fn events_table(track_id: &str) -> String {
    format!("{}{}", EVENTS_TABLE_PREFIX, track_id)
}
