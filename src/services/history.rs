//! Append-only per-house audit log.
//!
//! Writes are best-effort: an audit failure is logged and swallowed so it
//! can never fail the operation being audited.

use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::services::house::{self, HouseError};

#[derive(Debug, Clone, serde::Serialize)]
pub struct HistoryRow {
    pub id: Uuid,
    pub house_id: Uuid,
    pub action_log: String,
    #[serde(with = "time::serde::rfc3339")]
    pub action_date: OffsetDateTime,
}

/// Append an audit entry. Accepts any executor so callers can write inside
/// their own transaction.
pub async fn record<'e, E>(executor: E, house_id: Uuid, action: &str)
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query("INSERT INTO history (id, house_id, action_log) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(house_id)
        .bind(action)
        .execute(executor)
        .await;

    if let Err(e) = result {
        tracing::warn!(error = %e, %house_id, "history append failed");
    }
}

/// List a house's audit log, newest first. Member-gated.
///
/// # Errors
///
/// Returns `NotFound`/`Forbidden` from the membership gate, or a database
/// error.
pub async fn list_history(pool: &PgPool, house_id: Uuid, user_id: Uuid) -> Result<Vec<HistoryRow>, HouseError> {
    house::ensure_member(pool, house_id, user_id).await?;

    let rows = sqlx::query_as::<_, (Uuid, Uuid, String, OffsetDateTime)>(
        "SELECT id, house_id, action_log, action_date
         FROM history
         WHERE house_id = $1
         ORDER BY action_date DESC, id ASC",
    )
    .bind(house_id)
    .fetch_all(pool)
    .await
    .map_err(HouseError::Database)?;

    Ok(rows
        .into_iter()
        .map(|(id, house_id, action_log, action_date)| HistoryRow { id, house_id, action_log, action_date })
        .collect())
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
