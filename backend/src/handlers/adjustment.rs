//! HTTP handlers for stock adjustment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::adjustment::{
    Adjustment, AdjustmentFilter, AdjustmentService, AdjustmentSummary, AdjustmentWithItems,
    CreateAdjustmentInput,
};
use crate::services::document::AdvanceStatusInput;
use crate::AppState;

/// List adjustments with optional status and location filters
pub async fn list_adjustments(
    State(state): State<AppState>,
    Query(filter): Query<AdjustmentFilter>,
) -> AppResult<Json<Vec<AdjustmentSummary>>> {
    let service = AdjustmentService::new(state.db);
    let adjustments = service.list_adjustments(filter).await?;
    Ok(Json(adjustments))
}

/// Create a new adjustment
pub async fn create_adjustment(
    State(state): State<AppState>,
    Json(input): Json<CreateAdjustmentInput>,
) -> AppResult<(StatusCode, Json<AdjustmentWithItems>)> {
    let service = AdjustmentService::new(state.db);
    let adjustment = service.create_adjustment(input).await?;
    Ok((StatusCode::CREATED, Json(adjustment)))
}

/// Get an adjustment with its line items
pub async fn get_adjustment(
    State(state): State<AppState>,
    Path(adjustment_id): Path<Uuid>,
) -> AppResult<Json<AdjustmentWithItems>> {
    let service = AdjustmentService::new(state.db);
    let adjustment = service.get_adjustment(adjustment_id).await?;
    Ok(Json(adjustment))
}

/// Advance an adjustment's status one lifecycle step
pub async fn advance_adjustment_status(
    State(state): State<AppState>,
    Path(adjustment_id): Path<Uuid>,
    Json(input): Json<AdvanceStatusInput>,
) -> AppResult<Json<Adjustment>> {
    let service = AdjustmentService::new(state.db);
    let adjustment = service.advance_status(adjustment_id, input).await?;
    Ok(Json(adjustment))
}
