//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! The credential store sits behind a trait object so the Postgres
//! backend and the in-memory backend used by tests are interchangeable;
//! the token codec owns the signing secret and is immutable after startup.

use std::sync::Arc;

use time::Duration;

use crate::services::credentials::CredentialStore;
use crate::services::token::TokenCodec;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    /// Credential store backing `login` and `signup`.
    pub store: Arc<dyn CredentialStore>,
    /// Token codec holding the process-wide signing secret.
    pub codec: TokenCodec,
    /// TTL applied to issued tokens and their cookies.
    pub session_ttl: Duration,
    /// Secure flag applied to session cookies.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codec: TokenCodec,
        session_ttl: Duration,
        cookie_secure: bool,
    ) -> Self {
        Self { store, codec, session_ttl, cookie_secure }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
