//! Scoring engine — batch chore logging and fairness-corrected scores.
//!
//! DESIGN
//! ======
//! Logging is a batch of (template, count) entries. Entries fail
//! individually and never short-circuit the rest; the batch is
//! deliberately non-atomic — valid entries persist even when the caller
//! gets an error list back. Each repetition pairs its immutable
//! `made_tasks` insert with a row-locked score update in a small
//! transaction, so concurrent logs never lose increments.
//!
//! A score row tracks raw effort (`score`) and a fairness-corrected value
//! (`corrected_score`) divided by the member's `involvement` factor.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::services::house::{self, HouseError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("involvement must be positive, got {0}")]
    InvalidInvolvement(f64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One requested entry: log `count` completions of a chore template.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LogEntry {
    pub possible_task_id: Uuid,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum EntryErrorKind {
    #[serde(rename = "possible task not found")]
    NotFound,
    #[serde(rename = "not a member of the house")]
    NotMember,
}

/// Per-entry failure, reported alongside the successes.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EntryError {
    pub possible_task_id: Uuid,
    pub error: EntryErrorKind,
}

#[derive(Debug, Default)]
pub struct LogOutcome {
    pub created_task_ids: Vec<Uuid>,
    pub errors: Vec<EntryError>,
}

/// Score row for one (house, user) pair.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScoreRow {
    pub house_id: Uuid,
    pub user_id: Uuid,
    pub involvement: f64,
    pub score: i64,
    pub corrected_score: f64,
}

// =============================================================================
// PURE SCORING RULES
// =============================================================================

/// A completed chore is worth `duration * difficulty`.
#[must_use]
pub fn task_score(duration: i32, difficulty: i32) -> i64 {
    i64::from(duration) * i64::from(difficulty)
}

/// Corrected-score delta for one completion: `task_score / involvement`.
///
/// # Errors
///
/// Returns `InvalidInvolvement` for a non-positive involvement instead of
/// dividing by it.
#[allow(clippy::cast_precision_loss)]
pub fn corrected_increment(task_score: i64, involvement: f64) -> Result<f64, ScoringError> {
    if involvement <= 0.0 {
        return Err(ScoringError::InvalidInvolvement(involvement));
    }
    Ok(task_score as f64 / involvement)
}

// =============================================================================
// BATCH LOGGING
// =============================================================================

/// Log a batch of completed chores for `user_id`.
///
/// Per-entry failures (`NotFound` unknown template, `NotMember` user not
/// in the template's house) accumulate in the outcome; the remaining
/// entries still run. A `count` of zero is a valid entry: it creates no
/// task rows but still performs the score get-or-create, matching the
/// membership-join side of the model.
///
/// The get-or-create here zero-seeds (`score` 0, `corrected_score` 0,
/// `involvement` 1.0). The join path seeds `corrected_score` at the house
/// maximum instead; see `house::add_member`.
///
/// # Errors
///
/// Returns a database error or `InvalidInvolvement`; both abort the rest
/// of the batch while already-written rows persist.
pub async fn log_made_tasks(
    pool: &PgPool,
    user_id: Uuid,
    entries: &[LogEntry],
) -> Result<LogOutcome, ScoringError> {
    let mut outcome = LogOutcome::default();

    for entry in entries {
        let template = sqlx::query_as::<_, (Uuid, String, i32, i32)>(
            "SELECT house_id, name, duration, difficulty FROM possible_tasks WHERE id = $1",
        )
        .bind(entry.possible_task_id)
        .fetch_optional(pool)
        .await?;

        let Some((house_id, name, duration, difficulty)) = template else {
            outcome.errors.push(EntryError {
                possible_task_id: entry.possible_task_id,
                error: EntryErrorKind::NotFound,
            });
            continue;
        };

        if !house::is_member(pool, house_id, user_id).await? {
            outcome.errors.push(EntryError {
                possible_task_id: entry.possible_task_id,
                error: EntryErrorKind::NotMember,
            });
            continue;
        }

        // Atomic get-or-create: two concurrent first logs for the same
        // (house, user) pair must not both insert.
        sqlx::query(
            "INSERT INTO scores (house_id, user_id) VALUES ($1, $2)
             ON CONFLICT (house_id, user_id) DO NOTHING",
        )
        .bind(house_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        let score = task_score(duration, difficulty);
        for _ in 0..entry.count {
            let id = Uuid::new_v4();
            let mut tx = pool.begin().await?;

            sqlx::query(
                "INSERT INTO made_tasks (id, house_id, possible_task_id, user_id, name, score, duration, difficulty)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(id)
            .bind(house_id)
            .bind(entry.possible_task_id)
            .bind(user_id)
            .bind(&name)
            .bind(score)
            .bind(duration)
            .bind(difficulty)
            .execute(&mut *tx)
            .await?;

            let involvement = sqlx::query_scalar::<_, f64>(
                "SELECT involvement FROM scores WHERE house_id = $1 AND user_id = $2 FOR UPDATE",
            )
            .bind(house_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            let delta = corrected_increment(score, involvement)?;

            sqlx::query(
                "UPDATE scores SET score = score + $3, corrected_score = corrected_score + $4
                 WHERE house_id = $1 AND user_id = $2",
            )
            .bind(house_id)
            .bind(user_id)
            .bind(score)
            .bind(delta)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            outcome.created_task_ids.push(id);
        }
    }

    info!(
        %user_id,
        created = outcome.created_task_ids.len(),
        failed = outcome.errors.len(),
        "made-task batch logged"
    );
    Ok(outcome)
}

// =============================================================================
// QUERIES
// =============================================================================

/// List all score rows for a house, highest corrected score first.
///
/// # Errors
///
/// Returns `NotFound` for a missing house, `Forbidden` for a non-member
/// caller, or a database error.
pub async fn list_scores(pool: &PgPool, house_id: Uuid, user_id: Uuid) -> Result<Vec<ScoreRow>, HouseError> {
    house::ensure_member(pool, house_id, user_id).await?;

    let rows = sqlx::query_as::<_, (Uuid, Uuid, f64, i64, f64)>(
        "SELECT house_id, user_id, involvement, score, corrected_score
         FROM scores
         WHERE house_id = $1
         ORDER BY corrected_score DESC, user_id ASC",
    )
    .bind(house_id)
    .fetch_all(pool)
    .await
    .map_err(HouseError::Database)?;

    Ok(rows
        .into_iter()
        .map(|(house_id, user_id, involvement, score, corrected_score)| ScoreRow {
            house_id,
            user_id,
            involvement,
            score,
            corrected_score,
        })
        .collect())
}

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;
