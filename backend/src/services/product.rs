//! Product catalog service with stock aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use shared::validation::is_blank;

/// Product service for catalog CRUD and stock-aware listings
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// A product joined with its aggregate stock across all locations
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductWithStock {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub unit_of_measure: String,
    pub min_stock_level: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub category_name: Option<String>,
    pub total_stock: i64,
    pub reserved_stock: i64,
    pub is_low_stock: bool,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub unit_of_measure: Option<String>,
    pub min_stock_level: Option<i64>,
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
}

/// Filters for listing products
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    /// Category name to filter on
    pub category: Option<String>,
    /// Case-insensitive substring match against name or sku
    pub search: Option<String>,
    /// Only products at or below their minimum stock level
    pub low_stock: Option<bool>,
}

const PRODUCT_WITH_STOCK_SELECT: &str = r#"
    SELECT p.id, p.name, p.sku, p.unit_of_measure, p.min_stock_level, p.description,
           p.created_at,
           c.name AS category_name,
           COALESCE(SUM(sl.quantity), 0)::BIGINT AS total_stock,
           COALESCE(SUM(sl.reserved_quantity), 0)::BIGINT AS reserved_stock,
           (COALESCE(SUM(sl.quantity), 0) <= p.min_stock_level) AS is_low_stock
    FROM products p
    LEFT JOIN categories c ON p.category_id = c.id
    LEFT JOIN stock_levels sl ON p.id = sl.product_id
"#;

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product; the sku must be unique across all products
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<ProductWithStock> {
        let name = input
            .name
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "name".to_string(),
                message: "Product name is required".to_string(),
            })?;
        let sku = input
            .sku
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "sku".to_string(),
                message: "SKU is required".to_string(),
            })?;
        let unit_of_measure = input
            .unit_of_measure
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "unit_of_measure".to_string(),
                message: "Unit of measure is required".to_string(),
            })?;

        let min_stock_level = input.min_stock_level.unwrap_or(0);
        if min_stock_level < 0 {
            return Err(AppError::Validation {
                field: "min_stock_level".to_string(),
                message: "Minimum stock level cannot be negative".to_string(),
            });
        }

        // Validate category exists if provided
        if let Some(category_id) = input.category_id {
            let category_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
            )
            .bind(category_id)
            .fetch_one(&self.db)
            .await?;

            if !category_exists {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }

        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (name, sku, category_id, unit_of_measure, min_stock_level, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&name)
        .bind(&sku)
        .bind(input.category_id)
        .bind(&unit_of_measure)
        .bind(min_stock_level)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await;

        let id = match result {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::DuplicateEntry("sku".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(product_id = %id, sku = %sku, "created product");

        self.get_product(id).await
    }

    /// List products joined with current aggregate stock
    pub async fn list_products(&self, filter: ProductFilter) -> AppResult<Vec<ProductWithStock>> {
        let search = filter
            .search
            .filter(|s| !is_blank(s))
            .map(|s| format!("%{}%", s.to_lowercase()));

        let query = format!(
            r#"
            {PRODUCT_WITH_STOCK_SELECT}
            WHERE ($1::text IS NULL OR c.name = $1)
              AND ($2::text IS NULL OR LOWER(p.name) LIKE $2 OR LOWER(p.sku) LIKE $2)
            GROUP BY p.id, c.name
            HAVING $3::bool IS NOT TRUE
                OR COALESCE(SUM(sl.quantity), 0) <= p.min_stock_level
            ORDER BY p.created_at DESC
            "#
        );

        let products = sqlx::query_as::<_, ProductWithStock>(&query)
            .bind(&filter.category)
            .bind(&search)
            .bind(filter.low_stock)
            .fetch_all(&self.db)
            .await?;

        Ok(products)
    }

    /// Get a single product with its aggregate stock
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<ProductWithStock> {
        let query = format!(
            r#"
            {PRODUCT_WITH_STOCK_SELECT}
            WHERE p.id = $1
            GROUP BY p.id, c.name
            "#
        );

        let product = sqlx::query_as::<_, ProductWithStock>(&query)
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }
}
