//! Route definitions for StockMaster Pro

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Catalog
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/locations", location_routes())
        .nest("/suppliers", supplier_routes())
        // Stock levels
        .nest("/stock", stock_routes())
        // Movement documents
        .nest("/receipts", receipt_routes())
        .nest("/deliveries", delivery_routes())
        .nest("/transfers", transfer_routes())
        .nest("/adjustments", adjustment_routes())
        // Dashboard
        .nest("/dashboard", dashboard_routes())
        // Users and settings
        .nest("/users", user_routes())
        .route("/settings", get(handlers::get_settings))
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/:product_id", get(handlers::get_product))
}

/// Category routes
fn category_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_categories).post(handlers::create_category),
    )
}

/// Location routes
fn location_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_locations).post(handlers::create_location),
    )
}

/// Supplier routes
fn supplier_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_suppliers).post(handlers::create_supplier),
    )
}

/// Stock level routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/products/:product_id", get(handlers::get_product_stock))
        .route("/products/:product_id/total", get(handlers::get_total_stock))
        .route("/low", get(handlers::list_low_stock_products))
}

/// Goods receipt routes
fn receipt_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_receipts).post(handlers::create_receipt))
        .route("/:receipt_id", get(handlers::get_receipt))
        .route("/:receipt_id/status", post(handlers::advance_receipt_status))
}

/// Delivery order routes
fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_deliveries).post(handlers::create_delivery))
        .route("/:delivery_id", get(handlers::get_delivery))
        .route("/:delivery_id/status", post(handlers::advance_delivery_status))
}

/// Internal transfer routes
fn transfer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transfers).post(handlers::create_transfer))
        .route("/:transfer_id", get(handlers::get_transfer))
        .route("/:transfer_id/status", post(handlers::advance_transfer_status))
}

/// Stock adjustment routes
fn adjustment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_adjustments).post(handlers::create_adjustment))
        .route("/:adjustment_id", get(handlers::get_adjustment))
        .route(
            "/:adjustment_id/status",
            post(handlers::advance_adjustment_status),
        )
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(handlers::get_dashboard_stats))
}

/// User management routes
fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_users).post(handlers::create_user))
}
