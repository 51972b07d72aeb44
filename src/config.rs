//! Process configuration, loaded once at startup.

use axum::http::HeaderValue;
use time::Duration;

const DEFAULT_SESSION_TTL_SECS: i64 = 3600;
const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";
const MIN_SECRET_LEN: usize = 32;

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Authentication configuration.
///
/// The signing secret is read here exactly once and handed to the token
/// codec at construction; nothing else in the process may see it.
#[derive(Clone)]
pub struct AuthConfig {
    pub signing_secret: String,
    /// TTL applied to issued tokens and their cookies.
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    /// Browser origin allowed to send credentialed requests.
    pub client_origin: HeaderValue,
}

impl AuthConfig {
    /// Load from `SESSION_SECRET`, `SESSION_TTL_SECS`, `COOKIE_SECURE`,
    /// and `CLIENT_ORIGIN`. When `COOKIE_SECURE` is unset it is inferred
    /// from whether the client origin is https.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is missing or too short, or if the
    /// origin is not a valid header value.
    pub fn from_env() -> Result<Self, String> {
        let signing_secret =
            std::env::var("SESSION_SECRET").map_err(|_| "SESSION_SECRET required".to_owned())?;
        if signing_secret.len() < MIN_SECRET_LEN {
            return Err(format!("SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes"));
        }

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        let client_origin_raw =
            std::env::var("CLIENT_ORIGIN").unwrap_or_else(|_| DEFAULT_CLIENT_ORIGIN.to_owned());
        let client_origin = client_origin_raw
            .parse::<HeaderValue>()
            .map_err(|_| format!("invalid CLIENT_ORIGIN: {client_origin_raw}"))?;

        let cookie_secure =
            env_bool("COOKIE_SECURE").unwrap_or_else(|| client_origin_raw.starts_with("https://"));

        Ok(Self {
            signing_secret,
            session_ttl: Duration::seconds(session_ttl_secs),
            cookie_secure,
            client_origin,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
