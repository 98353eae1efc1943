use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use tracing::info;

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use handlers::{get_earthquakes, get_legend, get_settings, index_html, script_js, style_css};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/earthquakes", get(get_earthquakes))
        .route("/api/legend", get(get_legend))
        .route("/api/settings", get(get_settings))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let port = state.settings.port;
    let auto_open = state.settings.auto_open_browser;
    let app = create_app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = format!("http://{}", addr);
    info!("HTTP server started at {}", url);
    info!("API endpoints: GET /api/earthquakes, GET /api/legend, GET /api/settings");

    if auto_open {
        if let Err(e) = crate::utils::open_browser(&url) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
