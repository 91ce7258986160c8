// Shared test helpers for running the endpoint in-process.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use widget_scout::initialization::init_site_parser;
use widget_scout::server::{serve, AppState};
use widget_scout::Config;

/// Endpoint running on an ephemeral local port.
pub struct TestEndpoint {
    pub base_url: String,
    shutdown: CancellationToken,
    handle: JoinHandle<Result<(), anyhow::Error>>,
}

impl TestEndpoint {
    /// Stops the server and waits for it to exit.
    #[allow(dead_code)] // Used by other test files
    pub async fn stop(self) {
        self.shutdown.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Starts the endpoint with the default catalog and the given fetch deadline.
pub async fn spawn_endpoint(timeout: Duration) -> TestEndpoint {
    let parser = init_site_parser(&Config::default()).expect("Failed to build site parser");
    let state = AppState { parser, timeout };

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test endpoint");
    let addr = listener.local_addr().expect("Failed to read local address");
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(serve(listener, state, shutdown.clone()));

    TestEndpoint {
        base_url: format!("http://{}", addr),
        shutdown,
        handle,
    }
}

/// Returns a local port with nothing listening on it.
#[allow(dead_code)] // Used by other test files
pub fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("Failed to read address").port();
    drop(listener);
    port
}
