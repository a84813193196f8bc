use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    error::ApiError,
    protocol::{building_blocks_route, health_route},
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{health, list_building_blocks, route_not_found, ApiContext};
use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let api = ApiContext::new(settings.building_blocks.clone());
    let app = build_app(Arc::new(AppState { api }), settings.route_prefix.as_deref());

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(
        %addr,
        prefix = settings.route_prefix.as_deref().unwrap_or("/"),
        blocks = settings.building_blocks.len(),
        "building blocks backend listening"
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("building blocks backend stopped");
    Ok(())
}

fn build_app(state: Arc<AppState>, route_prefix: Option<&str>) -> Router {
    let router = match route_prefix {
        Some(prefix) => Router::new()
            .nest(prefix, build_router(state))
            .fallback(not_found),
        None => build_router(state),
    };
    router.layer(TraceLayer::new_for_http())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(health_route(), get(http_health))
        .route(building_blocks_route(), get(http_building_blocks))
        .fallback(not_found)
        .with_state(state)
}

async fn http_health(State(state): State<Arc<AppState>>) -> &'static str {
    health(&state.api)
}

async fn http_building_blocks(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(list_building_blocks(&state.api))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<ApiError>) {
    warn!(path = uri.path(), "request for unknown route");
    (StatusCode::NOT_FOUND, Json(route_not_found(uri.path())))
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
