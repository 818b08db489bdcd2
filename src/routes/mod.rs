//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every endpoint lives under `/api`. Handlers authenticate through the
//! `AuthUser` extractor (session cookie) and delegate to the service
//! layer; the only logic here is request decoding and error-to-status
//! mapping.

pub mod auth;
pub mod houses;
pub mod invitations;
pub mod tasks;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/houses", get(houses::list_houses).post(houses::create_house))
        .route(
            "/api/houses/{id}",
            get(houses::get_house)
                .patch(houses::update_house)
                .delete(houses::delete_house),
        )
        .route("/api/houses/{id}/members/{user_id}", delete(houses::remove_member))
        .route("/api/houses/{id}/scores", get(houses::list_scores))
        .route("/api/houses/{id}/history", get(houses::list_history))
        .route("/api/houses/{id}/invitations", post(invitations::create_invitation))
        .route("/api/invitations/{token}/accept", post(invitations::accept_invitation))
        .route(
            "/api/houses/{id}/tasks",
            get(tasks::list_possible_tasks).post(tasks::create_possible_task),
        )
        .route(
            "/api/tasks/{id}",
            patch(tasks::update_possible_task).delete(tasks::delete_possible_task),
        )
        .route(
            "/api/made-tasks",
            get(tasks::made_tasks_in_range).post(tasks::log_made_tasks),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
