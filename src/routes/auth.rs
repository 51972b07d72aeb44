//! Session endpoints and the authentication gate.
//!
//! ARCHITECTURE
//! ============
//! The gate is the `AuthUser` extractor: a handler opts into protection
//! by taking it as a parameter, and a rejected request never reaches the
//! handler body. Nothing is protected implicitly — composition is the
//! only enforcement mechanism, matching how the prediction and report
//! services would opt in if they moved behind this server.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::services::cookie;
use crate::services::credentials::CredentialError;
use crate::services::token::TokenError;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// AUTH GATE
// =============================================================================

/// Authenticated user resolved from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Why the gate refused a request. Serialized to the client as a
/// `reason` field; internal logs may say more, responses must not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No session cookie on the request.
    NoSession,
    /// Token signature verified but the token is past its TTL.
    Expired,
    /// Token malformed or its signature did not verify.
    Tampered,
}

impl AuthRejection {
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::NoSession => "no_session",
            Self::Expired => "expired",
            Self::Tampered => "tampered",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": "authentication required",
            "reason": self.reason(),
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = cookie::read(&jar) else {
            return Err(AuthRejection::NoSession);
        };

        let app_state = AppState::from_ref(state);
        let user_id = app_state.codec.verify(token).map_err(|e| match e {
            TokenError::Expired => AuthRejection::Expired,
            // `Signing` cannot come out of verify; fail closed anyway.
            TokenError::Tampered | TokenError::Signing => AuthRejection::Tampered,
        })?;

        Ok(Self { user_id })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    identifier: String,
    password: String,
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "internal server error" })))
        .into_response()
}

/// `POST /api/login` — verify credentials, mint a token, set the cookie.
///
/// Unknown identifier and wrong password produce byte-identical 401
/// responses. The token travels only in the cookie, never in the body.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Response {
    let user = match state.store.verify_credentials(&req.identifier, &req.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "invalid credentials" })))
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "credential store lookup failed");
            return internal_error();
        }
    };

    let token = match state.codec.issue(user.id, state.session_ttl) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, "token issue failed");
            return internal_error();
        }
    };

    tracing::info!(user_id = %user.id, "login succeeded");
    let jar = cookie::attach(jar, token, state.session_ttl, state.cookie_secure);
    (jar, Json(json!({ "message": "login successful" }))).into_response()
}

#[derive(Deserialize)]
pub struct SignupRequest {
    identifier: String,
    password: String,
}

/// `POST /api/signup` — register a user with hashed password material.
pub async fn signup(State(state): State<AppState>, Json(req): Json<SignupRequest>) -> Response {
    if req.password.len() < MIN_PASSWORD_LEN {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "password too short" })))
            .into_response();
    }

    match state.store.create_user(&req.identifier, &req.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user registered");
            (StatusCode::CREATED, Json(json!({ "message": "user registered" }))).into_response()
        }
        Err(CredentialError::InvalidIdentifier) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": "invalid identifier" }))).into_response()
        }
        Err(CredentialError::AlreadyRegistered) => {
            (StatusCode::CONFLICT, Json(json!({ "message": "cannot register" }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "user registration failed");
            internal_error()
        }
    }
}

/// `POST /logout` — clear the cookie. Idempotent: clearing an absent
/// cookie succeeds, and outstanding token copies stay valid until their
/// TTL because the session model is stateless.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = cookie::clear(jar, state.cookie_secure);
    (jar, Json(json!({ "message": "logged out" })))
}

/// `GET /dashboard` — protected no-op probe. Lets the client confirm on
/// page load that its stored cookie still grants access.
pub async fn dashboard(auth: AuthUser) -> Json<serde_json::Value> {
    Json(json!({ "userId": auth.user_id }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
