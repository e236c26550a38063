//! HTTP handlers for stock level endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock::{ProductStock, StockService};
use crate::AppState;

/// Get per-location stock levels and totals for a product
pub async fn get_product_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductStock>> {
    let service = StockService::new(state.db);
    let stock = service.get_product_stock(product_id).await?;
    Ok(Json(stock))
}

/// Total stock for a product across all locations
#[derive(Serialize)]
pub struct TotalStockResponse {
    pub product_id: Uuid,
    pub total_stock: i64,
}

/// Get the total on-hand quantity for a product
pub async fn get_total_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<TotalStockResponse>> {
    let service = StockService::new(state.db);
    let total_stock = service.get_total_stock(product_id).await?;
    Ok(Json(TotalStockResponse {
        product_id,
        total_stock,
    }))
}

/// List ids of products at or below their minimum stock level
pub async fn list_low_stock_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Uuid>>> {
    let service = StockService::new(state.db);
    let ids = service.get_low_stock_product_ids().await?;
    Ok(Json(ids))
}
