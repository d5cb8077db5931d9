//! API endpoints.

pub mod departments;
pub mod reports;
pub mod shifts;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use shift_store::ShiftStore;

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: ShiftStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Roster endpoints
        .route("/api/user/list", post(users::list_users))
        .route("/api/user/add", post(users::add_user))
        .route("/api/user/update", post(users::update_user))
        .route("/api/user/delete", post(users::delete_user))
        .route("/api/user/move", post(users::move_user))
        // Department endpoints
        .route("/api/department/list", post(departments::list_departments))
        .route("/api/department/add", post(departments::add_department))
        .route("/api/department/rename", post(departments::rename_department))
        .route("/api/department/delete", post(departments::delete_department))
        .route("/api/department/reorder", post(departments::reorder_departments))
        // Shift lifecycle endpoints
        .route("/api/shift/toggle", post(shifts::toggle))
        .route("/api/shift/clock-in", post(shifts::clock_in))
        .route("/api/shift/clock-out", post(shifts::clock_out))
        .route("/api/shift/list", post(shifts::list_shifts))
        .route("/api/shift/active", post(shifts::active_shifts))
        .route("/api/shift/add-manual", post(shifts::add_manual_shift))
        .route("/api/shift/delete", post(shifts::delete_shift))
        // Report endpoints
        .route("/api/report/week-hours", post(reports::week_hours))
        .route("/api/report/csv", post(reports::export_csv))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
