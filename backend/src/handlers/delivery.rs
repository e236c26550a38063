//! HTTP handlers for delivery order endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::delivery::{
    CreateDeliveryInput, DeliveryFilter, DeliveryOrder, DeliveryService, DeliverySummary,
    DeliveryWithItems,
};
use crate::services::document::AdvanceStatusInput;
use crate::AppState;

/// List delivery orders with an optional status filter
pub async fn list_deliveries(
    State(state): State<AppState>,
    Query(filter): Query<DeliveryFilter>,
) -> AppResult<Json<Vec<DeliverySummary>>> {
    let service = DeliveryService::new(state.db);
    let deliveries = service.list_deliveries(filter).await?;
    Ok(Json(deliveries))
}

/// Create a new delivery order
pub async fn create_delivery(
    State(state): State<AppState>,
    Json(input): Json<CreateDeliveryInput>,
) -> AppResult<(StatusCode, Json<DeliveryWithItems>)> {
    let service = DeliveryService::new(state.db);
    let delivery = service.create_delivery(input).await?;
    Ok((StatusCode::CREATED, Json(delivery)))
}

/// Get a delivery order with its line items
pub async fn get_delivery(
    State(state): State<AppState>,
    Path(delivery_id): Path<Uuid>,
) -> AppResult<Json<DeliveryWithItems>> {
    let service = DeliveryService::new(state.db);
    let delivery = service.get_delivery(delivery_id).await?;
    Ok(Json(delivery))
}

/// Advance a delivery order's status one lifecycle step
pub async fn advance_delivery_status(
    State(state): State<AppState>,
    Path(delivery_id): Path<Uuid>,
    Json(input): Json<AdvanceStatusInput>,
) -> AppResult<Json<DeliveryOrder>> {
    let service = DeliveryService::new(state.db);
    let delivery = service.advance_status(delivery_id, input).await?;
    Ok(Json(delivery))
}
