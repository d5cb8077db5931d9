//! Roster API endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use entities::User;
use serde::{Deserialize, Serialize};
use shift_store::ShiftStore;
use tracker::MoveDirection;
use uuid::Uuid;

use crate::error::ServerResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
    pub departments: Vec<String>,
}

/// Lists the roster in display order.
pub async fn list_users<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<ListUsersResponse>> {
    let tracker = state.tracker.read().await;
    Ok(Json(ListUsersResponse {
        users: tracker.users().to_vec(),
        departments: tracker.display_departments(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub admin_pin: Option<String>,
    pub name: String,
    pub department: Option<String>,
}

/// Adds a user to the roster.
pub async fn add_user<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<AddUserRequest>,
) -> ServerResult<Json<User>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    let user = tracker
        .add_user(&session, &request.name, request.department)
        .await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub admin_pin: Option<String>,
    pub user: User,
}

/// Replaces a user's record.
pub async fn update_user<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<UpdateUserRequest>,
) -> ServerResult<Json<User>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    tracker.update_user(&session, request.user.clone()).await?;
    Ok(Json(request.user))
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    pub admin_pin: Option<String>,
    pub user_id: Uuid,
}

/// Deletes a user and their shifts.
pub async fn delete_user<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<DeleteUserRequest>,
) -> ServerResult<Json<serde_json::Value>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    tracker.delete_user(&session, request.user_id).await?;
    Ok(Json(serde_json::json!({ "deleted": request.user_id })))
}

#[derive(Debug, Deserialize)]
pub struct MoveUserRequest {
    pub admin_pin: Option<String>,
    pub user_id: Uuid,
    pub direction: MoveDirection,
}

/// Moves a user within their department's display order.
pub async fn move_user<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<MoveUserRequest>,
) -> ServerResult<Json<Vec<User>>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    let roster = tracker
        .move_user(&session, request.user_id, request.direction)
        .await?;
    Ok(Json(roster))
}
