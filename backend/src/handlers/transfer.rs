//! HTTP handlers for internal transfer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::document::AdvanceStatusInput;
use crate::services::transfer::{
    CreateTransferInput, Transfer, TransferFilter, TransferService, TransferSummary,
    TransferWithItems,
};
use crate::AppState;

/// List transfers with an optional status filter
pub async fn list_transfers(
    State(state): State<AppState>,
    Query(filter): Query<TransferFilter>,
) -> AppResult<Json<Vec<TransferSummary>>> {
    let service = TransferService::new(state.db);
    let transfers = service.list_transfers(filter).await?;
    Ok(Json(transfers))
}

/// Create a new transfer
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(input): Json<CreateTransferInput>,
) -> AppResult<(StatusCode, Json<TransferWithItems>)> {
    let service = TransferService::new(state.db);
    let transfer = service.create_transfer(input).await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

/// Get a transfer with its line items
pub async fn get_transfer(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
) -> AppResult<Json<TransferWithItems>> {
    let service = TransferService::new(state.db);
    let transfer = service.get_transfer(transfer_id).await?;
    Ok(Json(transfer))
}

/// Advance a transfer's status one lifecycle step
pub async fn advance_transfer_status(
    State(state): State<AppState>,
    Path(transfer_id): Path<Uuid>,
    Json(input): Json<AdvanceStatusInput>,
) -> AppResult<Json<Transfer>> {
    let service = TransferService::new(state.db);
    let transfer = service.advance_status(transfer_id, input).await?;
    Ok(Json(transfer))
}
