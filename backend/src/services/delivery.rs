//! Delivery order documents: outbound stock to customers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::document::{
    ensure_location_exists, ensure_product_exists, line_error, next_document_number,
    require_created_by, AdvanceStatusInput,
};
use crate::services::stock::StockService;
use shared::models::{DeliveryStatus, DocumentKind};
use shared::validation::is_blank;

/// Delivery service for outbound movement documents
#[derive(Clone)]
pub struct DeliveryService {
    db: PgPool,
}

/// Delivery order header
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeliveryOrder {
    pub id: Uuid,
    pub order_number: String,
    pub sales_order_id: Option<String>,
    pub customer_name: String,
    pub shipping_address: Option<String>,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Delivery line item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeliveryItem {
    pub id: Uuid,
    pub delivery_order_id: Uuid,
    pub product_id: Uuid,
    pub location_id: Uuid,
    pub quantity_requested: i64,
}

/// Delivery header with its line items
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryWithItems {
    #[serde(flatten)]
    pub delivery: DeliveryOrder,
    pub items: Vec<DeliveryItem>,
}

/// Delivery list row with line count
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DeliverySummary {
    pub id: Uuid,
    pub order_number: String,
    pub sales_order_id: Option<String>,
    pub customer_name: String,
    pub shipping_address: Option<String>,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub item_count: i64,
}

/// Input for creating a delivery order
#[derive(Debug, Deserialize)]
pub struct CreateDeliveryInput {
    pub sales_order_id: Option<String>,
    pub customer_name: Option<String>,
    pub shipping_address: Option<String>,
    pub items: Option<Vec<DeliveryLineInput>>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// One submitted delivery line
#[derive(Debug, Deserialize)]
pub struct DeliveryLineInput {
    pub product_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub quantity_requested: Option<i64>,
}

/// Filters for listing deliveries
#[derive(Debug, Default, Deserialize)]
pub struct DeliveryFilter {
    pub status: Option<String>,
}

impl DeliveryService {
    /// Create a new DeliveryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Submit a delivery order: validate, then persist header and lines
    /// atomically
    pub async fn create_delivery(&self, input: CreateDeliveryInput) -> AppResult<DeliveryWithItems> {
        let created_by = require_created_by(input.created_by)?;

        let customer_name = input
            .customer_name
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "customer_name".to_string(),
                message: "Customer name is required".to_string(),
            })?;

        let items = input.items.unwrap_or_default();
        if items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Items are required".to_string(),
            });
        }

        let mut lines = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let product_id = item
                .product_id
                .ok_or_else(|| line_error(index, "product_id", "product is required"))?;
            let location_id = item
                .location_id
                .ok_or_else(|| line_error(index, "location_id", "location is required"))?;
            let quantity_requested = item
                .quantity_requested
                .ok_or_else(|| line_error(index, "quantity_requested", "quantity is required"))?;
            if quantity_requested <= 0 {
                return Err(line_error(
                    index,
                    "quantity_requested",
                    "quantity must be positive",
                ));
            }
            lines.push((product_id, location_id, quantity_requested));
        }

        let mut tx = self.db.begin().await?;

        for (product_id, location_id, _) in &lines {
            ensure_product_exists(&mut tx, *product_id).await?;
            ensure_location_exists(&mut tx, *location_id).await?;
        }

        let order_number = next_document_number(&mut tx, DocumentKind::Delivery).await?;

        let delivery = sqlx::query_as::<_, DeliveryOrder>(
            r#"
            INSERT INTO delivery_orders (order_number, sales_order_id, customer_name,
                                         shipping_address, status, total_items, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, order_number, sales_order_id, customer_name, shipping_address,
                      status, total_items, notes, created_by, created_at
            "#,
        )
        .bind(&order_number)
        .bind(&input.sales_order_id)
        .bind(&customer_name)
        .bind(&input.shipping_address)
        .bind(DeliveryStatus::Draft.as_str())
        .bind(lines.len() as i32)
        .bind(&input.notes)
        .bind(&created_by)
        .fetch_one(&mut *tx)
        .await?;

        let mut stored = Vec::with_capacity(lines.len());
        for (product_id, location_id, quantity_requested) in &lines {
            let item = sqlx::query_as::<_, DeliveryItem>(
                r#"
                INSERT INTO delivery_items (delivery_order_id, product_id, location_id, quantity_requested)
                VALUES ($1, $2, $3, $4)
                RETURNING id, delivery_order_id, product_id, location_id, quantity_requested
                "#,
            )
            .bind(delivery.id)
            .bind(product_id)
            .bind(location_id)
            .bind(quantity_requested)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            order_number = %delivery.order_number,
            items = stored.len(),
            "created delivery order"
        );

        Ok(DeliveryWithItems {
            delivery,
            items: stored,
        })
    }

    /// List delivery orders with an optional status filter
    pub async fn list_deliveries(&self, filter: DeliveryFilter) -> AppResult<Vec<DeliverySummary>> {
        let status = parse_status_filter(filter.status)?.map(|s| s.as_str().to_string());

        let deliveries = sqlx::query_as::<_, DeliverySummary>(
            r#"
            SELECT d.id, d.order_number, d.sales_order_id, d.customer_name, d.shipping_address,
                   d.status, d.total_items, d.notes, d.created_by, d.created_at,
                   COUNT(di.id) AS item_count
            FROM delivery_orders d
            LEFT JOIN delivery_items di ON di.delivery_order_id = d.id
            WHERE ($1::text IS NULL OR d.status = $1)
            GROUP BY d.id
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(deliveries)
    }

    /// Get a delivery order with its line items
    pub async fn get_delivery(&self, delivery_id: Uuid) -> AppResult<DeliveryWithItems> {
        let delivery = sqlx::query_as::<_, DeliveryOrder>(
            r#"
            SELECT id, order_number, sales_order_id, customer_name, shipping_address,
                   status, total_items, notes, created_by, created_at
            FROM delivery_orders
            WHERE id = $1
            "#,
        )
        .bind(delivery_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery order".to_string()))?;

        let items = sqlx::query_as::<_, DeliveryItem>(
            r#"
            SELECT id, delivery_order_id, product_id, location_id, quantity_requested
            FROM delivery_items
            WHERE delivery_order_id = $1
            "#,
        )
        .bind(delivery_id)
        .fetch_all(&self.db)
        .await?;

        Ok(DeliveryWithItems { delivery, items })
    }

    /// Advance a delivery order one step along its lifecycle.
    ///
    /// Shipping a delivery takes each line's requested quantity out of stock
    /// at the line's location; the delivered step is confirmation only and
    /// has no further stock effect.
    pub async fn advance_status(
        &self,
        delivery_id: Uuid,
        input: AdvanceStatusInput,
    ) -> AppResult<DeliveryOrder> {
        let target = parse_status_filter(input.status)?.ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: "Target status is required".to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let current_str = sqlx::query_scalar::<_, String>(
            "SELECT status FROM delivery_orders WHERE id = $1 FOR UPDATE",
        )
        .bind(delivery_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery order".to_string()))?;
        let current = DeliveryStatus::from_str(&current_str)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;

        if !current.can_advance_to(target) {
            return Err(AppError::InvalidStateTransition(format!(
                "Delivery cannot move from {} to {}",
                current.as_str(),
                target.as_str()
            )));
        }

        let delivery = sqlx::query_as::<_, DeliveryOrder>(
            r#"
            UPDATE delivery_orders SET status = $1 WHERE id = $2
            RETURNING id, order_number, sales_order_id, customer_name, shipping_address,
                      status, total_items, notes, created_by, created_at
            "#,
        )
        .bind(target.as_str())
        .bind(delivery_id)
        .fetch_one(&mut *tx)
        .await?;

        if target == DeliveryStatus::Shipped {
            let items = sqlx::query_as::<_, DeliveryItem>(
                r#"
                SELECT id, delivery_order_id, product_id, location_id, quantity_requested
                FROM delivery_items
                WHERE delivery_order_id = $1
                "#,
            )
            .bind(delivery_id)
            .fetch_all(&mut *tx)
            .await?;

            for item in &items {
                StockService::apply_delta(
                    &mut *tx,
                    item.product_id,
                    item.location_id,
                    -item.quantity_requested,
                    0,
                )
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            order_number = %delivery.order_number,
            status = %delivery.status,
            "advanced delivery order"
        );

        Ok(delivery)
    }
}

fn parse_status_filter(status: Option<String>) -> AppResult<Option<DeliveryStatus>> {
    match status.filter(|s| !is_blank(s)) {
        None => Ok(None),
        Some(s) => DeliveryStatus::from_str(&s)
            .map(Some)
            .map_err(|e| AppError::Validation {
                field: "status".to_string(),
                message: e.to_string(),
            }),
    }
}
