//! Invitation lifecycle — time-limited, single-use join tokens.
//!
//! TRADE-OFFS
//! ==========
//! A token is consumed (deleted) only on a successful join. Redemption by
//! someone who is already a member reports `AlreadyMember` and leaves the
//! token live for other invitees. Missing and expired tokens are
//! indistinguishable to the caller. Expired rows linger until an operator
//! sweeps them; they are never redeemable.

use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::services::{history, house};

#[derive(Debug, thiserror::Error)]
pub enum InvitationError {
    #[error("invitation not found or expired")]
    NotFound,
    #[error("already a member of this house")]
    AlreadyMember,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create an invitation to a house. Member-only; several live invitations
/// per house are allowed. Expiry is fixed at creation + 7 days (schema
/// default).
///
/// # Errors
///
/// Returns `NotFound` when the inviter is not a member of the house (a
/// missing house looks the same), or a database error.
pub async fn create_invitation(
    pool: &PgPool,
    house_id: Uuid,
    inviter: Uuid,
) -> Result<Uuid, InvitationError> {
    if !house::is_member(pool, house_id, inviter).await? {
        return Err(InvitationError::NotFound);
    }

    let token = Uuid::new_v4();
    sqlx::query("INSERT INTO invitations (token, house_id, invited_by) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(house_id)
        .bind(inviter)
        .execute(pool)
        .await?;

    info!(%house_id, %inviter, "invitation created");
    Ok(token)
}

/// Redeem an invitation token and join its house. Returns the house name.
///
/// Runs in one transaction with the invitation row locked, so two
/// concurrent redemptions cannot both consume the same token.
///
/// # Errors
///
/// Returns `NotFound` for an unknown or expired token, `AlreadyMember`
/// when the caller is already in the member set, or a database error.
pub async fn accept_invitation(
    pool: &PgPool,
    token: Uuid,
    user_id: Uuid,
) -> Result<String, InvitationError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        "SELECT i.house_id, h.name
         FROM invitations i
         JOIN houses h ON h.id = i.house_id
         WHERE i.token = $1 AND i.expires_at >= now()
         FOR UPDATE OF i",
    )
    .bind(token)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(InvitationError::NotFound)?;
    let house_id: Uuid = row.get("house_id");
    let house_name: String = row.get("name");

    let already = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM house_members WHERE house_id = $1 AND user_id = $2)",
    )
    .bind(house_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;
    if already {
        return Err(InvitationError::AlreadyMember);
    }

    house::add_member(&mut tx, house_id, user_id).await?;
    sqlx::query("DELETE FROM invitations WHERE token = $1")
        .bind(token)
        .execute(&mut *tx)
        .await?;
    history::record(&mut *tx, house_id, &format!("user {user_id} joined via invitation")).await;
    tx.commit().await?;

    info!(%house_id, %user_id, "invitation redeemed");
    Ok(house_name)
}

#[cfg(test)]
#[path = "invitation_test.rs"]
mod tests;
