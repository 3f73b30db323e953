//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own catalog and profile databases.

use super::constants::*;
use campus_radio_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use campus_radio_server::profiles::{ProfileStore, SqliteProfileStore};
use campus_radio_server::seed::{seed_catalog, seed_manager_template};
use campus_radio_server::server::state::ServerState;
use campus_radio_server::server::{load_manager_template, make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated databases
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Catalog store for direct database access in tests
    pub catalog_store: Arc<dyn CatalogStore>,

    /// Profile store for direct database access in tests
    pub profile_store: Arc<dyn ProfileStore>,

    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a seeded server on a random port
    pub async fn spawn() -> Self {
        Self::spawn_with_config(ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            ..ServerConfig::default()
        })
        .await
    }

    /// Spawns a seeded server with a custom config. The port is ignored.
    pub async fn spawn_with_config(config: ServerConfig) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");

        let catalog_store: Arc<dyn CatalogStore> = Arc::new(
            SqliteCatalogStore::new(temp_db_dir.path().join("catalog.db"))
                .expect("Failed to open catalog store"),
        );
        let profile_store: Arc<dyn ProfileStore> = Arc::new(
            SqliteProfileStore::new(temp_db_dir.path().join("profiles.db"))
                .expect("Failed to open profile store"),
        );
        seed_catalog(catalog_store.as_ref()).expect("Failed to seed catalog");
        seed_manager_template(profile_store.as_ref()).expect("Failed to seed template");
        let template =
            load_manager_template(profile_store.as_ref()).expect("Failed to load template");

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let state = ServerState::new(
            ServerConfig { port, ..config },
            catalog_store.clone(),
            profile_store.clone(),
            template,
        );
        let app = make_app(state);

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
            catalog_store,
            profile_store,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Id of a seeded track by title
    pub fn track_id(&self, title: &str) -> i64 {
        self.catalog_store
            .list_tracks()
            .expect("Failed to list tracks")
            .into_iter()
            .find(|track| track.title == title)
            .unwrap_or_else(|| panic!("No seeded track titled {}", title))
            .id
    }

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

            match client.get(format!("{}/session-data", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
