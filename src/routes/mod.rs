//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the session endpoints and the protected dashboard probe into a
//! single Axum router. The browser client sends credentialed requests
//! from its own origin, so CORS names that origin explicitly — a
//! wildcard cannot carry cookies.

pub mod auth;

use axum::Router;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState, client_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(client_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(auth::dashboard))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
