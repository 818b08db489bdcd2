//! Chore templates and completed-chore queries.
//!
//! `possible_tasks` are per-house templates (name, duration, difficulty);
//! `made_tasks` are the immutable completion records the scoring engine
//! writes. This module owns template CRUD and the date-range query over
//! completions.

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::house::{self, HouseError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("possible task not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    House(#[from] HouseError),
    #[error("duration and difficulty must be positive")]
    InvalidWeights,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Chore template row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PossibleTaskRow {
    pub id: Uuid,
    pub house_id: Uuid,
    pub name: String,
    pub duration: i32,
    pub difficulty: i32,
}

/// Immutable completion record.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MadeTaskRow {
    pub id: Uuid,
    pub house_id: Uuid,
    pub possible_task_id: Option<Uuid>,
    pub user_id: Uuid,
    pub name: String,
    pub score: i64,
    pub duration: i32,
    pub difficulty: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub done_at: OffsetDateTime,
}

// =============================================================================
// TEMPLATE CRUD
// =============================================================================

/// List a house's chore templates. Member-gated.
///
/// # Errors
///
/// Returns `NotFound`/`Forbidden` from the membership gate, or a database
/// error.
pub async fn list_possible_tasks(
    pool: &PgPool,
    house_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<PossibleTaskRow>, TaskError> {
    house::ensure_member(pool, house_id, user_id).await?;

    let rows = sqlx::query_as::<_, (Uuid, Uuid, String, i32, i32)>(
        "SELECT id, house_id, name, duration, difficulty
         FROM possible_tasks
         WHERE house_id = $1
         ORDER BY name ASC",
    )
    .bind(house_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(to_possible_task).collect())
}

/// Create a chore template in a house. Member-gated.
///
/// # Errors
///
/// Returns `InvalidWeights` for non-positive duration/difficulty,
/// `NotFound`/`Forbidden` from the membership gate, or a database error.
pub async fn create_possible_task(
    pool: &PgPool,
    house_id: Uuid,
    user_id: Uuid,
    name: &str,
    duration: i32,
    difficulty: i32,
) -> Result<PossibleTaskRow, TaskError> {
    if duration <= 0 || difficulty <= 0 {
        return Err(TaskError::InvalidWeights);
    }
    house::ensure_member(pool, house_id, user_id).await?;

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO possible_tasks (id, house_id, name, duration, difficulty) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(house_id)
    .bind(name)
    .bind(duration)
    .bind(difficulty)
    .execute(pool)
    .await?;

    Ok(PossibleTaskRow { id, house_id, name: name.to_owned(), duration, difficulty })
}

/// Partially update a chore template. Member-gated on the template's house.
///
/// # Errors
///
/// Returns `NotFound` for an unknown template, `InvalidWeights`,
/// `Forbidden` from the membership gate, or a database error.
pub async fn update_possible_task(
    pool: &PgPool,
    task_id: Uuid,
    user_id: Uuid,
    name: Option<&str>,
    duration: Option<i32>,
    difficulty: Option<i32>,
) -> Result<PossibleTaskRow, TaskError> {
    if duration.is_some_and(|d| d <= 0) || difficulty.is_some_and(|d| d <= 0) {
        return Err(TaskError::InvalidWeights);
    }
    let house_id = template_house(pool, task_id).await?;
    house::ensure_member(pool, house_id, user_id).await?;

    let row = sqlx::query_as::<_, (Uuid, Uuid, String, i32, i32)>(
        "UPDATE possible_tasks
         SET name = COALESCE($2, name),
             duration = COALESCE($3, duration),
             difficulty = COALESCE($4, difficulty)
         WHERE id = $1
         RETURNING id, house_id, name, duration, difficulty",
    )
    .bind(task_id)
    .bind(name)
    .bind(duration)
    .bind(difficulty)
    .fetch_one(pool)
    .await?;

    Ok(to_possible_task(row))
}

/// Delete a chore template. Member-gated on the template's house.
/// Completion records keep their copied weights; their back-reference is
/// set to NULL by the schema.
///
/// # Errors
///
/// Returns `NotFound`, `Forbidden` from the membership gate, or a database
/// error.
pub async fn delete_possible_task(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<(), TaskError> {
    let house_id = template_house(pool, task_id).await?;
    house::ensure_member(pool, house_id, user_id).await?;

    sqlx::query("DELETE FROM possible_tasks WHERE id = $1")
        .bind(task_id)
        .execute(pool)
        .await?;
    Ok(())
}

// =============================================================================
// COMPLETION QUERIES
// =============================================================================

/// List a house's completed chores with `done_at` in `[start, end]`
/// inclusive, ascending by `done_at`. `start > end` yields an empty list,
/// not an error. Member-gated.
///
/// # Errors
///
/// Returns `NotFound`/`Forbidden` from the membership gate, or a database
/// error.
pub async fn made_tasks_in_range(
    pool: &PgPool,
    house_id: Uuid,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<MadeTaskRow>, TaskError> {
    house::ensure_member(pool, house_id, user_id).await?;

    let rows = sqlx::query_as::<
        _,
        (Uuid, Uuid, Option<Uuid>, Uuid, String, i64, i32, i32, OffsetDateTime),
    >(
        "SELECT id, house_id, possible_task_id, user_id, name, score, duration, difficulty, done_at
         FROM made_tasks
         WHERE house_id = $1 AND done_at >= $2 AND done_at <= $3
         ORDER BY done_at ASC, id ASC",
    )
    .bind(house_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, house_id, possible_task_id, user_id, name, score, duration, difficulty, done_at)| MadeTaskRow {
                id,
                house_id,
                possible_task_id,
                user_id,
                name,
                score,
                duration,
                difficulty,
                done_at,
            },
        )
        .collect())
}

// =============================================================================
// HELPERS
// =============================================================================

fn to_possible_task(row: (Uuid, Uuid, String, i32, i32)) -> PossibleTaskRow {
    PossibleTaskRow { id: row.0, house_id: row.1, name: row.2, duration: row.3, difficulty: row.4 }
}

async fn template_house(pool: &PgPool, task_id: Uuid) -> Result<Uuid, TaskError> {
    sqlx::query_scalar::<_, Uuid>("SELECT house_id FROM possible_tasks WHERE id = $1")
        .bind(task_id)
        .fetch_optional(pool)
        .await?
        .ok_or(TaskError::NotFound(task_id))
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
