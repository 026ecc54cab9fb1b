//! HTTP API application wiring (Axum router + backend wiring).
//!
//! Layout:
//! - `services.rs`: backend selection (in-memory or SQLite)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and their validation
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use catalog_infra::ProductStore;

use crate::config::Settings;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from settings (public entrypoint used by `main.rs`).
pub async fn build_app(settings: &Settings) -> anyhow::Result<Router> {
    let store = services::build_store(settings).await?;
    Ok(router(store))
}

/// Router over an already-opened store.
pub fn router(store: ProductStore) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(Extension(store)),
    )
}
