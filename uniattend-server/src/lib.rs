//! HTTP server owning the shared attendance store.

pub mod routes;
pub mod singleton;
pub mod state;
pub mod store;

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;
use uniattend_core::config::UniattendConfig;

use crate::state::AppState;

/// Build the application router. With `static_dir`, unknown paths are served
/// from that directory, falling back to its `index.html`.
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new().merge(routes::attendance::router());

    if let Some(dir) = static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(dir).fallback(index));
    }

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the server until ctrl-c.
pub async fn run_until_ctrl_c(config: UniattendConfig) -> Result<()> {
    let data_file = config.data_file();

    let state = AppState::new(&data_file)?;

    // Ensure only one instance owns the data file
    let _lock = singleton::acquire_lock(&data_file)?;
    let static_dir = config.static_dir();
    let app = app(state, static_dir.as_deref());

    let addr = SocketAddr::new(config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("uniattend-server listening on http://{}", listener.local_addr()?);
    info!("storage: {}", data_file.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
