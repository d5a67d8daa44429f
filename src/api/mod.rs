//! HTTP service -- axum routes, handlers, and middleware.
//!
//! The service is a thin shell over the library: handlers fetch through the
//! [`crate::n8n::Gateway`] and run the query pipeline. It keeps no state
//! between requests.

mod error;
mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router with all API routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn fallback() -> (axum::http::StatusCode, &'static str) {
    (axum::http::StatusCode::NOT_FOUND, "not found")
}
