use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::routing::{get, patch, post};
use parking_lot::RwLock;
use taskdeck_store::MemoryStore;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::handlers;

/// Listen address configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind: IpAddr,
    /// TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Socket address derived from bind + port.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Shared application state. The lock serializes store operations so no
/// two of them ever interleave.
#[derive(Debug, Default)]
pub struct AppState {
    /// The authoritative task collection.
    pub store: RwLock<MemoryStore>,
}

impl AppState {
    /// Fresh shared state around an empty store.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// Build the API router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    // The API is meant to be callable from any local frontend.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/api/tasks/clear-completed", post(handlers::clear_completed))
        .route(
            "/api/tasks/{id}",
            patch(handlers::update_task).delete(handlers::delete_task),
        )
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
///
/// # Errors
/// Returns an error when the listener cannot bind or the accept loop fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::shared();
    let app = router(state);

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;
    info!("taskdeck API listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
