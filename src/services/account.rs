//! Account registration and credential verification.
//!
//! Passwords are stored as hex SHA-256 digests over a per-user random salt.
//! Emails are normalized (trimmed, lowercased) before storage so lookups
//! are case-insensitive.

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::session::{SessionUser, bytes_to_hex};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub(crate) fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes_to_hex(&bytes)
}

#[must_use]
pub(crate) fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Register a new user and return their identity.
///
/// # Errors
///
/// Returns `InvalidEmail`/`WeakPassword` for rejected input, `EmailTaken`
/// when the normalized email already exists, or a database error.
pub async fn register(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<SessionUser, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AccountError::WeakPassword);
    }

    let id = Uuid::new_v4();
    let salt = generate_salt();
    let hash = hash_password(password, &salt);
    let name = if name.trim().is_empty() { email.as_str() } else { name.trim() };

    let result = sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, password_salt) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(name)
    .bind(&email)
    .bind(&hash)
    .bind(&salt)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            tracing::info!(user_id = %id, "user registered");
            Ok(SessionUser { id, name: name.to_owned(), email })
        }
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AccountError::EmailTaken),
        Err(e) => Err(e.into()),
    }
}

/// Verify email/password credentials and return the matching user.
///
/// # Errors
///
/// Returns `InvalidCredentials` when the email is unknown or the password
/// does not match, or a database error.
pub async fn verify_credentials(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<SessionUser, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::InvalidCredentials)?;

    let row = sqlx::query(
        "SELECT id, name, email, password_hash, password_salt FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?
    .ok_or(AccountError::InvalidCredentials)?;

    let salt: String = row.get("password_salt");
    let expected: String = row.get("password_hash");
    if hash_password(password, &salt) != expected {
        return Err(AccountError::InvalidCredentials);
    }

    Ok(SessionUser { id: row.get("id"), name: row.get("name"), email: row.get("email") })
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
