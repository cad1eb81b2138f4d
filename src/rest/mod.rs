// rest/mod.rs — Task HTTP API server.
//
// Axum HTTP server bridging REST calls to the SQLite task store.
//
// Endpoints:
//   GET    /api/health
//   GET    /api/tasks
//   POST   /api/tasks
//   PUT    /api/tasks/{id}
//   DELETE /api/tasks/{id}

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("task API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(routes::health::health))
        // Tasks
        .route(
            "/api/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        // Browser front-ends are served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
