//! Test server harness.

use autograde::engine::{EngineConfig, GradingEngine};
use autograde::gateway::{GatewayState, create_router_with_state};
use autograde::scoring::ScoringBackend;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Spawns the gateway on an ephemeral port around `backend`
/// (`None` runs heuristic-only).
pub async fn spawn_test_server(
    config: EngineConfig,
    backend: Option<Arc<dyn ScoringBackend>>,
) -> std::io::Result<TestServer> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let engine = Arc::new(GradingEngine::with_backend(&config, backend));
    let app = create_router_with_state(GatewayState::new(engine));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    Ok(TestServer {
        addr,
        _server_handle: handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
