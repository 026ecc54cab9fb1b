use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for every endpoint (no auth layer: the catalog is open).
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/products", products::router())
}
