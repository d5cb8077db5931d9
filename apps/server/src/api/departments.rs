//! Department API endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shift_store::ShiftStore;

use crate::error::ServerResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListDepartmentsResponse {
    pub departments: Vec<String>,
}

/// Lists department names in display order.
pub async fn list_departments<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<ListDepartmentsResponse>> {
    let tracker = state.tracker.read().await;
    Ok(Json(ListDepartmentsResponse {
        departments: tracker.display_departments(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddDepartmentRequest {
    pub admin_pin: Option<String>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AddDepartmentResponse {
    pub added: bool,
    pub departments: Vec<String>,
}

/// Adds a department.
pub async fn add_department<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<AddDepartmentRequest>,
) -> ServerResult<Json<AddDepartmentResponse>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    let added = tracker.add_department(&session, &request.name).await?;
    Ok(Json(AddDepartmentResponse {
        added,
        departments: tracker.departments().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RenameDepartmentRequest {
    pub admin_pin: Option<String>,
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Serialize)]
pub struct RenameDepartmentResponse {
    /// The name now in effect: the new one, or `None` when the rename was
    /// a no-op.
    pub renamed_to: Option<String>,
    pub departments: Vec<String>,
}

/// Renames a department, cascading to its users.
pub async fn rename_department<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RenameDepartmentRequest>,
) -> ServerResult<Json<RenameDepartmentResponse>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    let renamed_to = tracker
        .rename_department(&session, &request.old_name, &request.new_name)
        .await?;
    Ok(Json(RenameDepartmentResponse {
        renamed_to,
        departments: tracker.departments().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteDepartmentRequest {
    pub admin_pin: Option<String>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteDepartmentResponse {
    /// Where the deleted department's users were reassigned.
    pub fallback: String,
    pub departments: Vec<String>,
}

/// Deletes a department, reassigning its users.
pub async fn delete_department<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<DeleteDepartmentRequest>,
) -> ServerResult<Json<DeleteDepartmentResponse>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    let fallback = tracker.delete_department(&session, &request.name).await?;
    Ok(Json(DeleteDepartmentResponse {
        fallback,
        departments: tracker.departments().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReorderDepartmentsRequest {
    pub admin_pin: Option<String>,
    pub ordered: Vec<String>,
}

/// Replaces the department ordering.
pub async fn reorder_departments<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<ReorderDepartmentsRequest>,
) -> ServerResult<Json<ListDepartmentsResponse>> {
    let session = state.require_admin(request.admin_pin.as_deref())?;
    let mut tracker = state.tracker.write().await;
    tracker
        .reorder_departments(&session, request.ordered)
        .await?;
    Ok(Json(ListDepartmentsResponse {
        departments: tracker.departments().to_vec(),
    }))
}
