//! Goods receipt documents: inbound stock from suppliers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::document::{
    ensure_location_exists, ensure_product_exists, ensure_supplier_exists, line_error,
    next_document_number, require_created_by, AdvanceStatusInput,
};
use crate::services::stock::StockService;
use shared::models::{DocumentKind, ReceiptStatus};
use shared::validation::is_blank;

/// Receipt service for inbound movement documents
#[derive(Clone)]
pub struct ReceiptService {
    db: PgPool,
}

/// Receipt header
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Receipt {
    pub id: Uuid,
    pub receipt_number: String,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Receipt line item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReceiptItem {
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub product_id: Uuid,
    pub location_id: Uuid,
    pub quantity_expected: i64,
}

/// Receipt header with its line items
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptWithItems {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub items: Vec<ReceiptItem>,
}

/// Receipt list row with denormalized supplier name and line count
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReceiptSummary {
    pub id: Uuid,
    pub receipt_number: String,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub supplier_name: Option<String>,
    pub item_count: i64,
}

/// Input for creating a receipt
#[derive(Debug, Deserialize)]
pub struct CreateReceiptInput {
    pub supplier_id: Option<Uuid>,
    pub items: Option<Vec<ReceiptLineInput>>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// One submitted receipt line
#[derive(Debug, Deserialize)]
pub struct ReceiptLineInput {
    pub product_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub quantity_expected: Option<i64>,
}

/// Filters for listing receipts
#[derive(Debug, Default, Deserialize)]
pub struct ReceiptFilter {
    pub status: Option<String>,
    pub supplier_id: Option<Uuid>,
}

impl ReceiptService {
    /// Create a new ReceiptService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Submit a receipt: validate, then persist header and lines atomically
    pub async fn create_receipt(&self, input: CreateReceiptInput) -> AppResult<ReceiptWithItems> {
        let created_by = require_created_by(input.created_by)?;

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
            let quantity_expected = item
                .quantity_expected
                .ok_or_else(|| line_error(index, "quantity_expected", "quantity is required"))?;
            if quantity_expected <= 0 {
                return Err(line_error(
                    index,
                    "quantity_expected",
                    "quantity must be positive",
                ));
            }
            lines.push((product_id, location_id, quantity_expected));
        }

        let mut tx = self.db.begin().await?;

        if let Some(supplier_id) = input.supplier_id {
            ensure_supplier_exists(&mut tx, supplier_id).await?;
        }
        for (product_id, location_id, _) in &lines {
            ensure_product_exists(&mut tx, *product_id).await?;
            ensure_location_exists(&mut tx, *location_id).await?;
        }

        let receipt_number = next_document_number(&mut tx, DocumentKind::Receipt).await?;

        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            INSERT INTO receipts (receipt_number, supplier_id, status, total_items, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, receipt_number, supplier_id, status, total_items, notes,
                      created_by, created_at
            "#,
        )
        .bind(&receipt_number)
        .bind(input.supplier_id)
        .bind(ReceiptStatus::Draft.as_str())
        .bind(lines.len() as i32)
        .bind(&input.notes)
        .bind(&created_by)
        .fetch_one(&mut *tx)
        .await?;

        let mut stored = Vec::with_capacity(lines.len());
        for (product_id, location_id, quantity_expected) in &lines {
            let item = sqlx::query_as::<_, ReceiptItem>(
                r#"
                INSERT INTO receipt_items (receipt_id, product_id, location_id, quantity_expected)
                VALUES ($1, $2, $3, $4)
                RETURNING id, receipt_id, product_id, location_id, quantity_expected
                "#,
            )
            .bind(receipt.id)
            .bind(product_id)
            .bind(location_id)
            .bind(quantity_expected)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            receipt_number = %receipt.receipt_number,
            items = stored.len(),
            "created receipt"
        );

        Ok(ReceiptWithItems {
            receipt,
            items: stored,
        })
    }

    /// List receipts with optional status and supplier filters
    pub async fn list_receipts(&self, filter: ReceiptFilter) -> AppResult<Vec<ReceiptSummary>> {
        let status = parse_status_filter(filter.status)?.map(|s| s.as_str().to_string());

        let receipts = sqlx::query_as::<_, ReceiptSummary>(
            r#"
            SELECT r.id, r.receipt_number, r.supplier_id, r.status, r.total_items, r.notes,
                   r.created_by, r.created_at,
                   s.name AS supplier_name,
                   COUNT(ri.id) AS item_count
            FROM receipts r
            LEFT JOIN suppliers s ON r.supplier_id = s.id
            LEFT JOIN receipt_items ri ON ri.receipt_id = r.id
            WHERE ($1::text IS NULL OR r.status = $1)
              AND ($2::uuid IS NULL OR r.supplier_id = $2)
            GROUP BY r.id, s.name
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(status)
        .bind(filter.supplier_id)
        .fetch_all(&self.db)
        .await?;

        Ok(receipts)
    }

    /// Get a receipt with its line items
    pub async fn get_receipt(&self, receipt_id: Uuid) -> AppResult<ReceiptWithItems> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, receipt_number, supplier_id, status, total_items, notes,
                   created_by, created_at
            FROM receipts
            WHERE id = $1
            "#,
        )
        .bind(receipt_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Receipt".to_string()))?;

        let items = sqlx::query_as::<_, ReceiptItem>(
            r#"
            SELECT id, receipt_id, product_id, location_id, quantity_expected
            FROM receipt_items
            WHERE receipt_id = $1
            "#,
        )
        .bind(receipt_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ReceiptWithItems { receipt, items })
    }

    /// Advance a receipt one step along its lifecycle.
    ///
    /// Completing a receipt puts each line's expected quantity into stock at
    /// the line's location, inside the same transaction as the status
    /// update.
    pub async fn advance_status(
        &self,
        receipt_id: Uuid,
        input: AdvanceStatusInput,
    ) -> AppResult<Receipt> {
        let target = parse_status_filter(input.status)?.ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: "Target status is required".to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let current_str =
            sqlx::query_scalar::<_, String>("SELECT status FROM receipts WHERE id = $1 FOR UPDATE")
                .bind(receipt_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Receipt".to_string()))?;
        let current = ReceiptStatus::from_str(&current_str)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;

        if !current.can_advance_to(target) {
            return Err(AppError::InvalidStateTransition(format!(
                "Receipt cannot move from {} to {}",
                current.as_str(),
                target.as_str()
            )));
        }

        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            UPDATE receipts SET status = $1 WHERE id = $2
            RETURNING id, receipt_number, supplier_id, status, total_items, notes,
                      created_by, created_at
            "#,
        )
        .bind(target.as_str())
        .bind(receipt_id)
        .fetch_one(&mut *tx)
        .await?;

        if target == ReceiptStatus::Completed {
            let items = sqlx::query_as::<_, ReceiptItem>(
                r#"
                SELECT id, receipt_id, product_id, location_id, quantity_expected
                FROM receipt_items
                WHERE receipt_id = $1
                "#,
            )
            .bind(receipt_id)
            .fetch_all(&mut *tx)
            .await?;

            for item in &items {
                StockService::apply_delta(
                    &mut *tx,
                    item.product_id,
                    item.location_id,
                    item.quantity_expected,
                    0,
                )
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            receipt_number = %receipt.receipt_number,
            status = %receipt.status,
            "advanced receipt"
        );

        Ok(receipt)
    }
}

fn parse_status_filter(status: Option<String>) -> AppResult<Option<ReceiptStatus>> {
    match status.filter(|s| !is_blank(s)) {
        None => Ok(None),
        Some(s) => ReceiptStatus::from_str(&s)
            .map(Some)
            .map_err(|e| AppError::Validation {
                field: "status".to_string(),
                message: e.to_string(),
            }),
    }
}
