//! House routes — CRUD, membership, scores, and audit log.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::history::{self, HistoryRow};
use crate::services::house::{self, HouseError, HouseRow};
use crate::services::scoring::{self, ScoreRow};
use crate::state::AppState;

pub(crate) fn house_error_to_status(err: HouseError) -> StatusCode {
    match err {
        HouseError::NotFound(_) | HouseError::NotMember(_) => StatusCode::NOT_FOUND,
        HouseError::Forbidden(_) => StatusCode::FORBIDDEN,
        HouseError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /api/houses` — create a house; creator becomes member and admin.
pub async fn create_house(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<(StatusCode, Json<HouseRow>), StatusCode> {
    let row = house::create_house(&state.pool, auth.user.id)
        .await
        .map_err(house_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/houses` — houses the caller belongs to.
pub async fn list_houses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<HouseRow>>, StatusCode> {
    let rows = house::list_houses(&state.pool, auth.user.id)
        .await
        .map_err(house_error_to_status)?;
    Ok(Json(rows))
}

/// `GET /api/houses/:id` — fetch one house.
pub async fn get_house(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
) -> Result<Json<HouseRow>, StatusCode> {
    let row = house::get_house(&state.pool, house_id, auth.user.id)
        .await
        .map_err(house_error_to_status)?;
    Ok(Json(row))
}

#[derive(Deserialize)]
pub struct UpdateHouseBody {
    pub name: Option<String>,
    pub image_name: Option<String>,
}

/// `PATCH /api/houses/:id` — partial update of name/image.
pub async fn update_house(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
    Json(body): Json<UpdateHouseBody>,
) -> Result<Json<HouseRow>, StatusCode> {
    let row = house::update_house(
        &state.pool,
        house_id,
        auth.user.id,
        body.name.as_deref(),
        body.image_name.as_deref(),
    )
    .await
    .map_err(house_error_to_status)?;
    Ok(Json(row))
}

/// `DELETE /api/houses/:id` — admin-only cascade delete.
pub async fn delete_house(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    house::delete_house(&state.pool, house_id, auth.user.id)
        .await
        .map_err(house_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `DELETE /api/houses/:id/members/:user_id` — admin-only member removal.
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((house_id, member_user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    house::remove_member(&state.pool, house_id, auth.user.id, member_user_id)
        .await
        .map_err(house_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `GET /api/houses/:id/scores` — all score rows for the house.
pub async fn list_scores(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
) -> Result<Json<Vec<ScoreRow>>, StatusCode> {
    let rows = scoring::list_scores(&state.pool, house_id, auth.user.id)
        .await
        .map_err(house_error_to_status)?;
    Ok(Json(rows))
}

/// `GET /api/houses/:id/history` — audit log, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryRow>>, StatusCode> {
    let rows = history::list_history(&state.pool, house_id, auth.user.id)
        .await
        .map_err(house_error_to_status)?;
    Ok(Json(rows))
}

#[cfg(test)]
#[path = "houses_test.rs"]
mod tests;
