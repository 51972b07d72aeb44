//! Session token codec — issues and verifies signed, time-bounded tokens.
//!
//! ARCHITECTURE
//! ============
//! Sessions are stateless: a token is an HS256-signed claims set
//! `{sub, iat, exp}` and the server keeps no session table. Validity is
//! decided entirely by signature verification plus expiry comparison at
//! check time.
//!
//! TRADE-OFFS
//! ==========
//! Statelessness trades revocability for simplicity — a leaked token stays
//! usable until its TTL runs out, so the TTL bounds the exposure window.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature valid but `exp` is in the past.
    #[error("session token expired")]
    Expired,
    /// Signature mismatch or structurally malformed token.
    #[error("session token rejected")]
    Tampered,
    /// Claim serialization failed while minting. Issue-time only.
    #[error("token signing failed")]
    Signing,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens with a process-wide secret.
///
/// The secret is injected at construction and never read from global
/// state, so `verify` is a pure function of the token and the clock —
/// safe to call concurrently from any number of requests.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Default leeway is 60s; the expiry bound must be exact.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a token for `user_id` expiring `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if claim serialization fails.
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a presented token and return its subject.
    ///
    /// Fails closed: structural malformation and signature mismatch both
    /// map to `Tampered`; only a good signature with a past `exp` maps to
    /// `Expired`. A tampered token is never reported as merely expired.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` or `TokenError::Tampered`.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Tampered,
            })?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
