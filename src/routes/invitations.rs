//! Invitation routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::routes::auth::AuthUser;
use crate::services::invitation::{self, InvitationError};
use crate::state::AppState;

pub(crate) fn invitation_error_to_status(err: InvitationError) -> StatusCode {
    match err {
        InvitationError::NotFound => StatusCode::NOT_FOUND,
        InvitationError::AlreadyMember => StatusCode::BAD_REQUEST,
        InvitationError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `POST /api/houses/:id/invitations` — issue a join token.
pub async fn create_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(house_id): Path<Uuid>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let token = invitation::create_invitation(&state.pool, house_id, auth.user.id)
        .await
        .map_err(invitation_error_to_status)?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "token": token }))))
}

/// `POST /api/invitations/:token/accept` — redeem a join token.
///
/// A token that does not even parse as a UUID cannot exist, so it gets the
/// same 404 as an unknown one.
pub async fn accept_invitation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let token = Uuid::parse_str(&token).map_err(|_| StatusCode::NOT_FOUND)?;
    let house_name = invitation::accept_invitation(&state.pool, token, auth.user.id)
        .await
        .map_err(invitation_error_to_status)?;
    Ok(Json(serde_json::json!({
        "house": house_name,
        "message": format!("You have joined {house_name}"),
    })))
}

#[cfg(test)]
#[path = "invitations_test.rs"]
mod tests;
