//! Credential store — identity lookup and password verification.
//!
//! SYSTEM CONTEXT
//! ==============
//! `login` and `signup` are the only callers. Lookup failures collapse
//! "unknown identifier" and "wrong password" into a single `None` so the
//! response cannot be used to enumerate accounts; storage failures stay a
//! distinct error and are never folded into that outcome.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use password_hash::{PasswordHash, SaltString};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

// Valid argon2id PHC string for a password nobody holds. Verified when
// the identifier is unknown so both login failure paths do comparable
// work instead of returning early on the lookup miss.
const UNKNOWN_USER_PHC: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Backing store could not be reached. Surfaced as a 5xx, never
    /// merged into an invalid-credentials outcome.
    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("identifier already registered")]
    AlreadyRegistered,
    #[error("invalid identifier")]
    InvalidIdentifier,
}

/// Resolved identity returned on successful credential verification.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserIdentity {
    /// Opaque internal user identifier.
    pub id: Uuid,
    /// Login identifier (normalized email).
    pub email: String,
}

/// Identity lookup and password verification seam.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Check `candidate_password` against the stored verification
    /// material for `identifier`. Returns `None` for unknown identifier
    /// and wrong password alike.
    async fn verify_credentials(
        &self,
        identifier: &str,
        candidate_password: &str,
    ) -> Result<Option<UserIdentity>, CredentialError>;

    /// Register a user, storing hashed password material.
    async fn create_user(&self, identifier: &str, password: &str) -> Result<UserIdentity, CredentialError>;
}

#[must_use]
pub fn normalize_identifier(identifier: &str) -> Option<String> {
    let normalized = identifier.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Hash a password into PHC string form for storage.
///
/// # Errors
///
/// Returns `CredentialError::Hashing` if salt generation or hashing fails.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| CredentialError::Hashing(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| CredentialError::Hashing(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Compare a candidate against stored PHC material. The comparison cost
/// does not depend on how much of the password prefix matches.
#[must_use]
pub fn verify_password(phc: &str, candidate: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(phc) {
        Argon2::default().verify_password(candidate.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}

// =============================================================================
// POSTGRES STORE
// =============================================================================

/// Credential store backed by the `users` table.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn verify_credentials(
        &self,
        identifier: &str,
        candidate_password: &str,
    ) -> Result<Option<UserIdentity>, CredentialError> {
        let Some(normalized) = normalize_identifier(identifier) else {
            // Malformed identifiers take the unknown-identifier path.
            let _ = verify_password(UNKNOWN_USER_PHC, candidate_password);
            return Ok(None);
        };

        let row = sqlx::query("SELECT id, email, password_hash FROM users WHERE email = $1")
            .bind(&normalized)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CredentialError::StoreUnavailable(e.to_string()))?;

        let Some(row) = row else {
            let _ = verify_password(UNKNOWN_USER_PHC, candidate_password);
            return Ok(None);
        };

        let phc: String = row.get("password_hash");
        if !verify_password(&phc, candidate_password) {
            return Ok(None);
        }
        Ok(Some(UserIdentity { id: row.get("id"), email: row.get("email") }))
    }

    async fn create_user(&self, identifier: &str, password: &str) -> Result<UserIdentity, CredentialError> {
        let normalized = normalize_identifier(identifier).ok_or(CredentialError::InvalidIdentifier)?;
        let phc = hash_password(password)?;

        let row = sqlx::query(
            r"INSERT INTO users (email, password_hash)
              VALUES ($1, $2)
              ON CONFLICT (email) DO NOTHING
              RETURNING id, email",
        )
        .bind(&normalized)
        .bind(&phc)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialError::StoreUnavailable(e.to_string()))?;

        let Some(row) = row else {
            return Err(CredentialError::AlreadyRegistered);
        };
        Ok(UserIdentity { id: row.get("id"), email: row.get("email") })
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// In-memory credential store used by tests and demo deployments.
pub struct MemoryCredentialStore {
    // email -> (id, phc)
    users: RwLock<HashMap<String, (Uuid, String)>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self { users: RwLock::new(HashMap::new()) }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn verify_credentials(
        &self,
        identifier: &str,
        candidate_password: &str,
    ) -> Result<Option<UserIdentity>, CredentialError> {
        let Some(normalized) = normalize_identifier(identifier) else {
            let _ = verify_password(UNKNOWN_USER_PHC, candidate_password);
            return Ok(None);
        };

        let users = self.users.read().await;
        let Some((id, phc)) = users.get(&normalized) else {
            let _ = verify_password(UNKNOWN_USER_PHC, candidate_password);
            return Ok(None);
        };

        if !verify_password(phc, candidate_password) {
            return Ok(None);
        }
        Ok(Some(UserIdentity { id: *id, email: normalized }))
    }

    async fn create_user(&self, identifier: &str, password: &str) -> Result<UserIdentity, CredentialError> {
        let normalized = normalize_identifier(identifier).ok_or(CredentialError::InvalidIdentifier)?;
        let phc = hash_password(password)?;

        let mut users = self.users.write().await;
        if users.contains_key(&normalized) {
            return Err(CredentialError::AlreadyRegistered);
        }
        let id = Uuid::new_v4();
        users.insert(normalized.clone(), (id, phc));
        Ok(UserIdentity { id, email: normalized })
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
