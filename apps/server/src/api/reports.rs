//! Report API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shift_store::ShiftStore;
use tracker::report;
use uuid::Uuid;

use crate::error::ServerResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct WeekHoursResponse {
    pub user_id: Uuid,
    /// Hours worked over the last seven local calendar days.
    pub hours: f64,
}

/// Hours worked by a user over the last seven days.
pub async fn week_hours<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<ReportRequest>,
) -> ServerResult<Json<WeekHoursResponse>> {
    let tracker = state.tracker.read().await;
    let shifts = tracker.shifts(request.user_id).await?;
    Ok(Json(WeekHoursResponse {
        user_id: request.user_id,
        hours: report::week_hours(&shifts, Utc::now()),
    }))
}

/// A user's shift history rendered as a CSV download.
pub async fn export_csv<S: ShiftStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<ReportRequest>,
) -> ServerResult<(HeaderMap, String)> {
    let tracker = state.tracker.read().await;
    let user = tracker.user(request.user_id)?.clone();
    let shifts = tracker.shifts(request.user_id).await?;
    let csv = report::shifts_to_csv(&user.name, &shifts, Utc::now());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        "text/csv; charset=utf-8".parse().map_err(|_| {
            crate::error::ServerError::Internal("Invalid header value".to_string())
        })?,
    );
    Ok((headers, csv))
}
