mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let auth = config::AuthConfig::from_env().expect("auth configuration");
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    let store = Arc::new(services::credentials::PgCredentialStore::new(pool));
    let codec = services::token::TokenCodec::new(auth.signing_secret.as_bytes());
    let state = state::AppState::new(store, codec, auth.session_ttl, auth.cookie_secure);

    let app = routes::app(state, auth.client_origin);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "clinboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
