use axum::{http::StatusCode, routing::get, Router};

/// Liveness probe polled by dispatcher clients before they attempt real work
async fn health() -> StatusCode {
    StatusCode::OK
}

pub fn routes() -> Router {
    Router::new().route("/health", get(health))
}
