//! Chore-template and completed-chore routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::routes::houses::house_error_to_status;
use crate::services::scoring::{self, LogEntry};
use crate::services::task::{self, MadeTaskRow, PossibleTaskRow, TaskError};
use crate::state::AppState;

pub(crate) fn task_error_to_status(err: TaskError) -> StatusCode {
    match err {
        TaskError::NotFound(_) => StatusCode::NOT_FOUND,
        TaskError::House(e) => house_error_to_status(e),
        TaskError::InvalidWeights => StatusCode::BAD_REQUEST,
        TaskError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Parse an RFC 3339 timestamp (offset required).
pub(crate) fn parse_rfc3339(raw: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).ok()
}

// =============================================================================
// TEMPLATE CRUD
// =============================================================================

/// `GET /api/houses/:id/tasks` — list a house's chore templates.
pub async fn list_possible_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
) -> Result<Json<Vec<PossibleTaskRow>>, StatusCode> {
    let rows = task::list_possible_tasks(&state.pool, house_id, auth.user.id)
        .await
        .map_err(task_error_to_status)?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct CreateTaskBody {
    pub name: String,
    pub duration: i32,
    pub difficulty: i32,
}

/// `POST /api/houses/:id/tasks` — create a chore template.
pub async fn create_possible_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<PossibleTaskRow>), StatusCode> {
    let row = task::create_possible_task(&state.pool, house_id, auth.user.id, &body.name, body.duration, body.difficulty)
        .await
        .map_err(task_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Deserialize)]
pub struct UpdateTaskBody {
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub difficulty: Option<i32>,
}

/// `PATCH /api/tasks/:id` — partial update of a chore template.
pub async fn update_possible_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<PossibleTaskRow>, StatusCode> {
    let row = task::update_possible_task(
        &state.pool,
        task_id,
        auth.user.id,
        body.name.as_deref(),
        body.duration,
        body.difficulty,
    )
    .await
    .map_err(task_error_to_status)?;
    Ok(Json(row))
}

/// `DELETE /api/tasks/:id` — delete a chore template.
pub async fn delete_possible_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    task::delete_possible_task(&state.pool, task_id, auth.user.id)
        .await
        .map_err(task_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

// =============================================================================
// COMPLETED CHORES
// =============================================================================

/// `POST /api/made-tasks` — log a batch of completed chores.
///
/// Batch contract: valid entries persist even when some fail. A response
/// with any per-entry error is a 400 carrying only the error list;
/// otherwise a 201 carrying the created task IDs.
pub async fn log_made_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(entries): Json<Vec<LogEntry>>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let outcome = scoring::log_made_tasks(&state.pool, auth.user.id, &entries)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if outcome.errors.is_empty() {
        Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "created_task_ids": outcome.created_task_ids })),
        ))
    } else {
        Ok((StatusCode::BAD_REQUEST, Json(serde_json::json!({ "errors": outcome.errors }))))
    }
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub house_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /api/made-tasks?house_id&start_date&end_date` — completed chores
/// in an inclusive date range, ascending by completion time.
pub async fn made_tasks_in_range(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<MadeTaskRow>>, StatusCode> {
    let house_id = query.house_id.ok_or(StatusCode::BAD_REQUEST)?;
    let start = query
        .start_date
        .as_deref()
        .and_then(parse_rfc3339)
        .ok_or(StatusCode::BAD_REQUEST)?;
    let end = query
        .end_date
        .as_deref()
        .and_then(parse_rfc3339)
        .ok_or(StatusCode::BAD_REQUEST)?;

    let rows = task::made_tasks_in_range(&state.pool, house_id, auth.user.id, start, end)
        .await
        .map_err(task_error_to_status)?;
    Ok(Json(rows))
}

#[cfg(test)]
#[path = "tasks_test.rs"]
mod tests;
