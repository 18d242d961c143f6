//! Test server harness.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use veritas::config::Config;
use veritas::gateway::{AppState, create_router_with_state};
use veritas::labels::LabelMap;
use veritas::pipeline::Pipeline;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    /// Directory served as the landing page. `None` leaves the static routes
    /// unmounted, which is also what the binary does when the directory is
    /// missing.
    pub static_path: Option<PathBuf>,
    /// Label table for the stub pipeline. `None` keeps the default polarity.
    pub labels: Option<LabelMap>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            static_path: None,
            labels: None,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server backed by the stub pipeline.
///
/// The stub swaps the transformer encoder and the linear head for
/// deterministic stand-ins, so tests exercise the full HTTP surface with no
/// model artifacts on disk:
/// - **Encoder**: hash-seeded embeddings, no tokenizer or weights required
/// - **Classifier**: fixed linear head over the stub embeddings
/// - **Labels**: default polarity unless `config.labels` overrides it
///
/// # Example
///
/// ```ignore
/// let server = spawn_test_server(TestServerConfig::default()).await?;
/// let client = reqwest::Client::new();
/// let resp = client.get(format!("{}/healthz", server.url())).send().await?;
/// assert!(resp.status().is_success());
/// ```
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let pipeline = match config.labels {
        Some(labels) => Pipeline::stub_with_labels(labels),
        None => Pipeline::stub(),
    }
    .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

    let state = AppState {
        pipeline: Arc::new(pipeline),
        classifier_path: PathBuf::new(),
        static_path: config.static_path.unwrap_or_default(),
    };

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Spawns a server that loads real artifacts named by the environment.
///
/// | Component  | Env var                   |
/// |------------|---------------------------|
/// | Encoder    | `VERITAS_ENCODER_PATH`    |
/// | Tokenizer  | `VERITAS_TOKENIZER_PATH`  |
/// | Classifier | `VERITAS_CLASSIFIER_PATH` |
///
/// Falls back to the stub pipeline when any of the three is unset, so the
/// caller always gets a serving process. Tests that require the real model
/// are `#[ignore]`d and opt in explicitly.
pub async fn spawn_real_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let encoder_path = std::env::var("VERITAS_ENCODER_PATH").ok();
    let tokenizer_path = std::env::var("VERITAS_TOKENIZER_PATH").ok();
    let classifier_path = std::env::var("VERITAS_CLASSIFIER_PATH").ok();

    let state = match (encoder_path, tokenizer_path, classifier_path) {
        (Some(encoder), Some(tokenizer), Some(classifier)) => {
            println!("Using real artifacts: {}", encoder);
            let mut server_config = Config {
                encoder_path: PathBuf::from(encoder),
                tokenizer_path: PathBuf::from(tokenizer),
                classifier_path: PathBuf::from(classifier),
                ..Config::default()
            };
            if let Some(path) = config.static_path.clone() {
                server_config.static_path = path;
            }
            if let Some(labels) = config.labels.clone() {
                server_config.labels = labels;
            }

            let pipeline = Pipeline::load(&server_config)
                .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
            AppState::new(Arc::new(pipeline), &server_config)
        }
        _ => {
            println!("Using stub pipeline (set VERITAS_*_PATH vars for real artifacts)");
            let pipeline = match config.labels {
                Some(labels) => Pipeline::stub_with_labels(labels),
                None => Pipeline::stub(),
            }
            .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;

            AppState {
                pipeline: Arc::new(pipeline),
                classifier_path: PathBuf::new(),
                static_path: config.static_path.unwrap_or_default(),
            }
        }
    };

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_available_port() {
        let port = find_available_port()
            .await
            .expect("Should find available port");
        assert!(port > 0);
    }

    #[tokio::test]
    async fn test_server_config_defaults() {
        let config = TestServerConfig::default();
        assert_eq!(config.port, 0);
        assert!(config.static_path.is_none());
        assert!(config.labels.is_none());
    }

    #[test]
    fn test_server_url_formatting() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let url = format!("http://{}", addr);
        assert_eq!(url, "http://127.0.0.1:8080");
    }
}
