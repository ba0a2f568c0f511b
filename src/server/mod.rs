use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::catalog::{CatalogProvider, TmdbCatalog};
use crate::config::Config;
use crate::library::MediaStore;
use crate::streaming;

pub mod error;
pub mod routes;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Root-confined identifier resolution.
    pub store: Arc<MediaStore>,
    /// Remote catalog, absent when no API key is configured.
    pub catalog: Option<Arc<dyn CatalogProvider>>,
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::RANGE]);

    let api = Router::new()
        .route("/library", get(routes::list_library))
        .route("/library/categories", get(routes::list_categories))
        .route("/trending", get(routes::trending))
        .route("/search", get(routes::search))
        .route("/movies/:id", get(routes::movie_detail))
        .route(
            "/movies/:id/recommendations",
            get(routes::movie_recommendations),
        );

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api)
        // Streaming and download take the identifier as the remaining path
        // so nested library files keep their slashes.
        .route("/stream/*identifier", get(streaming::direct::stream_media))
        .route(
            "/download/*identifier",
            get(streaming::direct::download_media),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files if directory is provided
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            app = app.fallback_service(ServeDir::new(&dir).append_index_html_on_directories(true));
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Build the application context from configuration.
pub fn build_context(config: Config) -> AppContext {
    let store = Arc::new(MediaStore::new(
        config.library.root.clone(),
        config.library.extensions.clone(),
    ));

    let catalog: Option<Arc<dyn CatalogProvider>> = match &config.tmdb.api_key {
        Some(key) => {
            let provider = match &config.tmdb.base_url {
                Some(base) => TmdbCatalog::with_base_url(
                    key.clone(),
                    config.tmdb.language.clone(),
                    base.trim_end_matches('/').to_string(),
                    "https://image.tmdb.org/t/p/w500".to_string(),
                ),
                None => TmdbCatalog::new(key.clone(), config.tmdb.language.clone()),
            };
            Some(Arc::new(provider))
        }
        None => {
            tracing::info!("No TMDB API key configured; catalog endpoints disabled");
            None
        }
    };

    AppContext {
        store,
        catalog,
        config: Arc::new(config),
    }
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = build_context(config);
    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
