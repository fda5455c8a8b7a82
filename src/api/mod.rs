//! Management API - inspect and purge the cache over HTTP
//!
//! Resources, relative to the mount prefix (each also answers with a
//! trailing `.json`):
//! - `/` landing page
//! - `/collections`
//! - `/collections/{id}` (GET, DELETE)
//! - `/collections/{id}/docs` (GET, DELETE)
//! - `/collections/{id}/layers` (GET, DELETE)
//! - `/collections/{id}/layers/{layerId}` (GET, DELETE)

pub mod error;
pub mod handlers;
pub mod types;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cache::store::CacheStore;
use handlers::ApiState;

pub const DEFAULT_PREFIX: &str = "/wmtscache";

/// Normalize a mount prefix to `/segment...` without trailing slash
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Build the management router mounted under `prefix`
pub fn router(store: Arc<CacheStore>, prefix: &str) -> Router {
    let base = normalize_prefix(prefix);
    let path = |p: &str| format!("{}{}", base, p);

    let mut app = Router::new()
        .route(&path("/collections"), get(handlers::list_collections))
        .route(&path("/collections.json"), get(handlers::list_collections))
        .route(
            &path("/collections/:id"),
            get(handlers::get_collection).delete(handlers::delete_collection),
        )
        .route(
            &path("/collections/:id/docs"),
            get(handlers::get_documents).delete(handlers::delete_documents),
        )
        .route(
            &path("/collections/:id/docs.json"),
            get(handlers::get_documents).delete(handlers::delete_documents),
        )
        .route(
            &path("/collections/:id/layers"),
            get(handlers::get_layers).delete(handlers::delete_layers),
        )
        .route(
            &path("/collections/:id/layers.json"),
            get(handlers::get_layers).delete(handlers::delete_layers),
        )
        .route(
            &path("/collections/:id/layers/:layer"),
            get(handlers::get_layer).delete(handlers::delete_layer),
        );

    app = if base.is_empty() {
        app.route("/", get(handlers::landing_page))
            .route("/.json", get(handlers::landing_page))
    } else {
        app.route(&base, get(handlers::landing_page))
            .route(&path("/"), get(handlers::landing_page))
            .route(&format!("{}.json", base), get(handlers::landing_page))
    };

    app.layer(TraceLayer::new_for_http())
        .with_state(Arc::new(ApiState { store, base }))
}

/// Serve the management API until ctrl-c
pub async fn serve(store: Arc<CacheStore>, addr: SocketAddr, prefix: &str) -> Result<()> {
    let app = router(store, prefix);

    tracing::info!(%addr, prefix, "Starting WMTS cache management API");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.context("Server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }
    Ok(())
}
