//! Dashboard aggregator: read-only KPI composition

use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use shared::models::{DeliveryStatus, ReceiptStatus};

/// Dashboard service for summary statistics
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Dashboard KPI stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub low_stock_items: i64,
    pub pending_receipts: i64,
    pub pending_deliveries: i64,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the dashboard KPIs inside one repeatable-read transaction so
    /// the four counts come from a single consistent snapshot
    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        let mut tx = self.db.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        // Distinct products with stock on hand anywhere
        let total_products: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT p.id)
            FROM products p
            INNER JOIN stock_levels sl ON p.id = sl.product_id
            WHERE sl.quantity > 0
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        // Products at or below their minimum stock level
        let low_stock_items: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM (
                SELECT p.id
                FROM products p
                LEFT JOIN stock_levels sl ON p.id = sl.product_id
                GROUP BY p.id, p.min_stock_level
                HAVING COALESCE(SUM(sl.quantity), 0) <= p.min_stock_level
            ) AS low_stock_products
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let pending_receipt_statuses: Vec<String> = ReceiptStatus::PENDING
            .iter()
            .map(|s| s.to_string())
            .collect();
        let pending_receipts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM receipts WHERE status = ANY($1)")
                .bind(&pending_receipt_statuses)
                .fetch_one(&mut *tx)
                .await?;

        let pending_delivery_statuses: Vec<String> = DeliveryStatus::PENDING
            .iter()
            .map(|s| s.to_string())
            .collect();
        let pending_deliveries: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM delivery_orders WHERE status = ANY($1)")
                .bind(&pending_delivery_statuses)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(DashboardStats {
            total_products,
            low_stock_items,
            pending_receipts,
            pending_deliveries,
        })
    }
}
