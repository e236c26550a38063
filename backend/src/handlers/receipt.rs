//! HTTP handlers for goods receipt endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::document::AdvanceStatusInput;
use crate::services::receipt::{
    CreateReceiptInput, Receipt, ReceiptFilter, ReceiptService, ReceiptSummary, ReceiptWithItems,
};
use crate::AppState;

/// List receipts with optional status and supplier filters
pub async fn list_receipts(
    State(state): State<AppState>,
    Query(filter): Query<ReceiptFilter>,
) -> AppResult<Json<Vec<ReceiptSummary>>> {
    let service = ReceiptService::new(state.db);
    let receipts = service.list_receipts(filter).await?;
    Ok(Json(receipts))
}

/// Create a new receipt
pub async fn create_receipt(
    State(state): State<AppState>,
    Json(input): Json<CreateReceiptInput>,
) -> AppResult<(StatusCode, Json<ReceiptWithItems>)> {
    let service = ReceiptService::new(state.db);
    let receipt = service.create_receipt(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Get a receipt with its line items
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
) -> AppResult<Json<ReceiptWithItems>> {
    let service = ReceiptService::new(state.db);
    let receipt = service.get_receipt(receipt_id).await?;
    Ok(Json(receipt))
}

/// Advance a receipt's status one lifecycle step
pub async fn advance_receipt_status(
    State(state): State<AppState>,
    Path(receipt_id): Path<Uuid>,
    Json(input): Json<AdvanceStatusInput>,
) -> AppResult<Json<Receipt>> {
    let service = ReceiptService::new(state.db);
    let receipt = service.advance_status(receipt_id, input).await?;
    Ok(Json(receipt))
}
