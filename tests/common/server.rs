//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own music tree and counter
//! database, spawned on a random port.

use super::constants::*;
use super::fixtures::{create_test_db_path, create_test_music_tree};
use std::sync::Arc;
use std::time::Duration;
use tapedeck_server::catalog::load_catalog;
use tapedeck_server::counter_store::{CounterStore, SqliteCounterStore};
use tapedeck_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated catalog and counter store.
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Counter store handle for direct inspection in tests
    pub counter_store: Arc<dyn CounterStore>,

    // Private fields - keep resources alive until drop
    _temp_music_dir: TempDir,
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port and waits until it answers.
    pub async fn spawn() -> Self {
        let (temp_music_dir, music_path) =
            create_test_music_tree().expect("Failed to create test music tree");
        let (temp_db_dir, db_path) = create_test_db_path().expect("Failed to create db dir");

        let counter_store: Arc<dyn CounterStore> = Arc::new(
            SqliteCounterStore::new(&db_path).expect("Failed to open counter store"),
        );
        let counter_store_for_test = counter_store.clone();

        let catalog = load_catalog(&music_path).expect("Failed to scan test music tree");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            report_secret: Some(TEST_SECRET.to_string()),
            music_dir: music_path,
        };

        let app = make_app(config, counter_store, catalog).expect("Failed to build app");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            counter_store: counter_store_for_test,
            _temp_music_dir: temp_music_dir,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal; TempDirs clean up on their own
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
