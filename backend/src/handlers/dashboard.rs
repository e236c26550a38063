//! HTTP handlers for dashboard endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::dashboard::{DashboardService, DashboardStats};
use crate::AppState;

/// Get the dashboard KPI stats
pub async fn get_dashboard_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.db);
    let stats = service.get_stats().await?;
    Ok(Json(stats))
}
