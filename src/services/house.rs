//! House service — CRUD, membership, and cascade deletion.
//!
//! DESIGN
//! ======
//! Houses own their members, chore templates, completed-chore records,
//! scores, invitations, and audit log. Deletion runs an explicit cascade
//! inside one transaction; the schema deliberately has no ON DELETE
//! actions on house-scoped foreign keys.
//!
//! Membership is a set: adding an existing member is a no-op, and the
//! score row created on join is an atomic get-or-create so concurrent
//! joins cannot produce duplicates.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::services::history;

pub const DEFAULT_HOUSE_NAME: &str = "New hearth";
pub const DEFAULT_HOUSE_IMAGE: &str = "defaultHouse";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HouseError {
    #[error("house not found: {0}")]
    NotFound(Uuid),
    #[error("user {0} may not perform this action")]
    Forbidden(Uuid),
    #[error("user {0} is not a member of this house")]
    NotMember(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row returned from house queries.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HouseRow {
    pub id: Uuid,
    pub name: String,
    pub image_name: Option<String>,
    pub admin_user: Option<Uuid>,
}

// =============================================================================
// CRUD
// =============================================================================

/// Create a house with default name/image. The creator becomes both a
/// member and the admin in the same transaction, so the admin-is-a-member
/// invariant holds from the first row.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_house(pool: &PgPool, user_id: Uuid) -> Result<HouseRow, HouseError> {
    let id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO houses (id, name, image_name, admin_user) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(DEFAULT_HOUSE_NAME)
        .bind(DEFAULT_HOUSE_IMAGE)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    add_member(&mut tx, id, user_id).await?;
    history::record(&mut *tx, id, &format!("user {user_id} created the house")).await;
    tx.commit().await?;

    info!(house_id = %id, %user_id, "house created");
    Ok(HouseRow {
        id,
        name: DEFAULT_HOUSE_NAME.to_owned(),
        image_name: Some(DEFAULT_HOUSE_IMAGE.to_owned()),
        admin_user: Some(user_id),
    })
}

/// List the houses the user belongs to.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_houses(pool: &PgPool, user_id: Uuid) -> Result<Vec<HouseRow>, HouseError> {
    let rows = sqlx::query_as::<_, (Uuid, String, Option<String>, Option<Uuid>)>(
        "SELECT h.id, h.name, h.image_name, h.admin_user
         FROM houses h
         JOIN house_members m ON m.house_id = h.id
         WHERE m.user_id = $1
         ORDER BY h.created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, image_name, admin_user)| HouseRow { id, name, image_name, admin_user })
        .collect())
}

/// Fetch one house, member-gated.
///
/// # Errors
///
/// Returns `NotFound` if the house does not exist or `Forbidden` if the
/// caller is not a member.
pub async fn get_house(pool: &PgPool, house_id: Uuid, user_id: Uuid) -> Result<HouseRow, HouseError> {
    let house = fetch_house(pool, house_id).await?;
    if !is_member(pool, house_id, user_id).await? {
        return Err(HouseError::Forbidden(user_id));
    }
    Ok(house)
}

/// Partially update a house's name and/or image. Member-gated.
///
/// # Errors
///
/// Returns `NotFound`, `Forbidden`, or a database error.
pub async fn update_house(
    pool: &PgPool,
    house_id: Uuid,
    user_id: Uuid,
    name: Option<&str>,
    image_name: Option<&str>,
) -> Result<HouseRow, HouseError> {
    fetch_house(pool, house_id).await?;
    if !is_member(pool, house_id, user_id).await? {
        return Err(HouseError::Forbidden(user_id));
    }

    let row = sqlx::query_as::<_, (Uuid, String, Option<String>, Option<Uuid>)>(
        "UPDATE houses
         SET name = COALESCE($2, name), image_name = COALESCE($3, image_name)
         WHERE id = $1
         RETURNING id, name, image_name, admin_user",
    )
    .bind(house_id)
    .bind(name)
    .bind(image_name)
    .fetch_one(pool)
    .await?;

    Ok(HouseRow { id: row.0, name: row.1, image_name: row.2, admin_user: row.3 })
}

/// Delete a house and everything it owns. Admin-only.
///
/// The cascade is explicit and transactional: dependents first, the house
/// row last. Either everything goes or nothing does.
///
/// # Errors
///
/// Returns `NotFound`, `Forbidden` if the caller is not the admin, or a
/// database error.
pub async fn delete_house(pool: &PgPool, house_id: Uuid, user_id: Uuid) -> Result<(), HouseError> {
    let house = fetch_house(pool, house_id).await?;
    if house.admin_user != Some(user_id) {
        return Err(HouseError::Forbidden(user_id));
    }

    let mut tx = pool.begin().await?;
    for stmt in [
        "DELETE FROM invitations WHERE house_id = $1",
        "DELETE FROM made_tasks WHERE house_id = $1",
        "DELETE FROM possible_tasks WHERE house_id = $1",
        "DELETE FROM scores WHERE house_id = $1",
        "DELETE FROM history WHERE house_id = $1",
        "DELETE FROM house_members WHERE house_id = $1",
        "DELETE FROM houses WHERE id = $1",
    ] {
        sqlx::query(stmt).bind(house_id).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(%house_id, %user_id, "house deleted with all dependents");
    Ok(())
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

/// Add a user to a house's member set and seed their score row.
///
/// Both inserts are `ON CONFLICT DO NOTHING`: re-adding an existing member
/// never duplicates the membership and never creates a second score row.
/// The score's `corrected_score` is seeded at the current house maximum
/// (0 for the first member) so a new member does not start behind the
/// group. The task-logging path zero-seeds instead; see
/// `scoring::log_made_tasks`.
///
/// # Errors
///
/// Returns a database error if either insert fails.
pub async fn add_member(
    tx: &mut Transaction<'_, Postgres>,
    house_id: Uuid,
    user_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO house_members (house_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(house_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        "INSERT INTO scores (house_id, user_id, corrected_score)
         VALUES ($1, $2, COALESCE((SELECT MAX(corrected_score) FROM scores WHERE house_id = $1), 0))
         ON CONFLICT (house_id, user_id) DO NOTHING",
    )
    .bind(house_id)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Remove a member from a house. Admin-only; the target must currently be
/// a member. The target's score row is kept so their history survives a
/// later rejoin.
///
/// An admin removing themself vacates the admin seat in the same
/// transaction: the admin, when set, must always be a member.
///
/// # Errors
///
/// Returns `NotFound` for a missing house, `Forbidden` for a non-admin
/// caller, `NotMember` for a target outside the member set, or a database
/// error.
pub async fn remove_member(
    pool: &PgPool,
    house_id: Uuid,
    admin_id: Uuid,
    target_id: Uuid,
) -> Result<(), HouseError> {
    let house = fetch_house(pool, house_id).await?;
    if house.admin_user != Some(admin_id) {
        return Err(HouseError::Forbidden(admin_id));
    }

    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM house_members WHERE house_id = $1 AND user_id = $2")
        .bind(house_id)
        .bind(target_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(HouseError::NotMember(target_id));
    }

    if house.admin_user == Some(target_id) {
        sqlx::query("UPDATE houses SET admin_user = NULL WHERE id = $1")
            .bind(house_id)
            .execute(&mut *tx)
            .await?;
    }

    history::record(&mut *tx, house_id, &format!("user {target_id} removed by {admin_id}")).await;
    tx.commit().await?;

    info!(%house_id, %target_id, "member removed");
    Ok(())
}

// =============================================================================
// GUARDS
// =============================================================================

/// Whether the user is in the house's member set.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn is_member(pool: &PgPool, house_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM house_members WHERE house_id = $1 AND user_id = $2)",
    )
    .bind(house_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Gate for house-scoped reads: `NotFound` for a missing house, then
/// `Forbidden` for a non-member.
///
/// # Errors
///
/// Returns `NotFound`, `Forbidden`, or a database error.
pub async fn ensure_member(pool: &PgPool, house_id: Uuid, user_id: Uuid) -> Result<(), HouseError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM houses WHERE id = $1)")
        .bind(house_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(HouseError::NotFound(house_id));
    }
    if !is_member(pool, house_id, user_id).await? {
        return Err(HouseError::Forbidden(user_id));
    }
    Ok(())
}

async fn fetch_house(pool: &PgPool, house_id: Uuid) -> Result<HouseRow, HouseError> {
    let row = sqlx::query_as::<_, (Uuid, String, Option<String>, Option<Uuid>)>(
        "SELECT id, name, image_name, admin_user FROM houses WHERE id = $1",
    )
    .bind(house_id)
    .fetch_optional(pool)
    .await?
    .ok_or(HouseError::NotFound(house_id))?;

    Ok(HouseRow { id: row.0, name: row.1, image_name: row.2, admin_user: row.3 })
}

#[cfg(test)]
#[path = "house_test.rs"]
mod tests;
