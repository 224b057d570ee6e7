mod auth;
mod config;
mod http_layers;
pub mod metrics;
mod server;
mod state;

pub use auth::ReportAccess;
pub use config::ServerConfig;
pub use http_layers::{log_requests, RequestsLoggingLevel};
pub use server::{make_app, run_server};
pub use state::{GuardedCatalog, GuardedCounterStore, ServerState};
