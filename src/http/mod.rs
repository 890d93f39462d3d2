//! HTTP transport for the tree API
//!
//! A thin axum layer over [`TreeApi`]: request bodies are parsed here,
//! business rules live in the API, and [`HttpError`] maps failures to
//! status codes.
//!
//! # Usage
//!
//! ```bash
//! canopy serve --port 9001
//! curl http://127.0.0.1:9001/api/tree
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::api::TreeApi;
use crate::config::ServerConfig;
use crate::storage::{OpenStore, SqliteStore, StorageError};

mod endpoints;
mod error;

pub use endpoints::{CreateNodeRequest, HealthStatus};
pub use error::HttpError;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub api: TreeApi,
}

impl AppState {
    pub fn new(api: TreeApi) -> Self {
        Self { api }
    }
}

/// Errors that stop the server from starting or keep it from running
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to open database at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Create the application router
///
/// Unknown paths, wrong methods and oversized bodies all answer with the
/// JSON error body rather than axum's empty or plain-text defaults.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(endpoints::routes(state))
        .fallback(endpoints::unknown_endpoint)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already-bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, api: TreeApi, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(AppState::new(api));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Open the store, bind, and serve until Ctrl-C
pub async fn start_server(config: &ServerConfig) -> Result<(), ServerError> {
    let db_path = config.db_path();
    let store = SqliteStore::open(&db_path).map_err(|source| ServerError::Store {
        path: db_path.clone(),
        source,
    })?;
    let api = TreeApi::new(Arc::new(store));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let local = listener.local_addr()?;
    tracing::info!(addr = %local, db = %db_path.display(), "serving");

    serve(listener, api, shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Run the server on its own runtime and return a process exit code
pub fn run_server(config: &ServerConfig) -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };

    match rt.block_on(start_server(config)) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
