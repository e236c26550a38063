//! Stock level store: the authoritative per-(product, location) quantities
//! that every movement document mutates

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Stock level service for reading and mutating per-location quantities
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// A single (product, location) stock row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockLevel {
    pub id: Uuid,
    pub product_id: Uuid,
    pub location_id: Uuid,
    pub quantity: i64,
    pub reserved_quantity: i64,
    pub updated_at: DateTime<Utc>,
}

/// Per-location stock breakdown row for a product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockLevelAtLocation {
    pub location_id: Uuid,
    pub location_name: String,
    pub quantity: i64,
    pub reserved_quantity: i64,
}

/// Stock view for a product across all locations
#[derive(Debug, Clone, Serialize)]
pub struct ProductStock {
    pub product_id: Uuid,
    pub total_stock: i64,
    pub reserved_stock: i64,
    pub levels: Vec<StockLevelAtLocation>,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Total on-hand quantity for a product across all locations (0 if none)
    pub async fn get_total_stock(&self, product_id: Uuid) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM stock_levels WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }

    /// Product ids whose total stock is at or below their minimum stock
    /// level; products with no stock rows count as zero
    pub async fn get_low_stock_product_ids(&self) -> AppResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT p.id
            FROM products p
            LEFT JOIN stock_levels sl ON p.id = sl.product_id
            GROUP BY p.id, p.min_stock_level
            HAVING COALESCE(SUM(sl.quantity), 0) <= p.min_stock_level
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(ids)
    }

    /// Per-location breakdown and totals for a product
    pub async fn get_product_stock(&self, product_id: Uuid) -> AppResult<ProductStock> {
        let product_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let levels = sqlx::query_as::<_, StockLevelAtLocation>(
            r#"
            SELECT sl.location_id, l.name AS location_name, sl.quantity, sl.reserved_quantity
            FROM stock_levels sl
            JOIN locations l ON l.id = sl.location_id
            WHERE sl.product_id = $1
            ORDER BY l.name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        let total_stock = levels.iter().map(|l| l.quantity).sum();
        let reserved_stock = levels.iter().map(|l| l.reserved_quantity).sum();

        Ok(ProductStock {
            product_id,
            total_stock,
            reserved_stock,
            levels,
        })
    }

    /// Apply a signed quantity delta to a (product, location) row, creating
    /// the row if absent. Zero is a valid resting value.
    ///
    /// This is a single upsert statement, so concurrent deltas on the same
    /// key serialize on the row and no update is lost. Takes an executor so
    /// document transitions can apply all their deltas inside one
    /// transaction.
    pub async fn apply_delta<'e, E>(
        executor: E,
        product_id: Uuid,
        location_id: Uuid,
        quantity_delta: i64,
        reserved_delta: i64,
    ) -> AppResult<StockLevel>
    where
        E: PgExecutor<'e>,
    {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            INSERT INTO stock_levels (product_id, location_id, quantity, reserved_quantity)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (product_id, location_id)
            DO UPDATE SET
                quantity = stock_levels.quantity + EXCLUDED.quantity,
                reserved_quantity = stock_levels.reserved_quantity + EXCLUDED.reserved_quantity,
                updated_at = NOW()
            RETURNING id, product_id, location_id, quantity, reserved_quantity, updated_at
            "#,
        )
        .bind(product_id)
        .bind(location_id)
        .bind(quantity_delta)
        .bind(reserved_delta)
        .fetch_one(executor)
        .await?;

        Ok(level)
    }
}
