mod handlers;
mod state;

use axum::Router;
use axum::routing::get;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::area::AreaResolver;

pub fn build_router(resolver: AreaResolver) -> Router {
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/detect-area", get(handlers::detect_area))
        .route("/api/areas", get(handlers::area_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, resolver: AreaResolver) -> std::io::Result<()> {
    let app = build_router(resolver);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "area resolver listening");
    eprintln!("  Transit area server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
