//! Internal transfer documents: stock moved between locations

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
use shared::models::{DocumentKind, TransferStatus};
use shared::validation::is_blank;

/// Transfer service for inter-location movement documents
#[derive(Clone)]
pub struct TransferService {
    db: PgPool,
}

/// Transfer header
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transfer {
    pub id: Uuid,
    pub transfer_number: String,
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Transfer line item
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransferItem {
    pub id: Uuid,
    pub transfer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub notes: Option<String>,
}

/// Transfer header with its line items
#[derive(Debug, Clone, Serialize)]
pub struct TransferWithItems {
    #[serde(flatten)]
    pub transfer: Transfer,
    pub items: Vec<TransferItem>,
}

/// Transfer list row with denormalized location names and line count
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransferSummary {
    pub id: Uuid,
    pub transfer_number: String,
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub from_location_name: String,
    pub to_location_name: String,
    pub item_count: i64,
}

/// Input for creating a transfer
#[derive(Debug, Deserialize)]
pub struct CreateTransferInput {
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub items: Option<Vec<TransferLineInput>>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// One submitted transfer line
#[derive(Debug, Deserialize)]
pub struct TransferLineInput {
    pub product_id: Option<Uuid>,
    pub quantity: Option<i64>,
    pub notes: Option<String>,
}

/// Filters for listing transfers
#[derive(Debug, Default, Deserialize)]
pub struct TransferFilter {
    pub status: Option<String>,
}

impl TransferService {
    /// Create a new TransferService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Submit a transfer: validate, then persist header and lines atomically.
    ///
    /// Source and destination must differ; the check runs before any
    /// persistence.
    pub async fn create_transfer(&self, input: CreateTransferInput) -> AppResult<TransferWithItems> {
        let created_by = require_created_by(input.created_by)?;

        let from_location_id = input.from_location_id.ok_or_else(|| AppError::Validation {
            field: "from_location_id".to_string(),
            message: "From location is required".to_string(),
        })?;
        let to_location_id = input.to_location_id.ok_or_else(|| AppError::Validation {
            field: "to_location_id".to_string(),
            message: "To location is required".to_string(),
        })?;

        if from_location_id == to_location_id {
            return Err(AppError::Validation {
                field: "to_location_id".to_string(),
                message: "From and to locations cannot be the same".to_string(),
            });
        }

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
            let quantity = item
                .quantity
                .ok_or_else(|| line_error(index, "quantity", "quantity is required"))?;
            if quantity <= 0 {
                return Err(line_error(index, "quantity", "quantity must be positive"));
            }
            lines.push((product_id, quantity, item.notes));
        }

        let mut tx = self.db.begin().await?;

        ensure_location_exists(&mut tx, from_location_id).await?;
        ensure_location_exists(&mut tx, to_location_id).await?;
        for (product_id, _, _) in &lines {
            ensure_product_exists(&mut tx, *product_id).await?;
        }

        let transfer_number = next_document_number(&mut tx, DocumentKind::Transfer).await?;

        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            INSERT INTO internal_transfers (transfer_number, from_location_id, to_location_id,
                                            status, total_items, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, transfer_number, from_location_id, to_location_id, status,
                      total_items, notes, created_by, created_at
            "#,
        )
        .bind(&transfer_number)
        .bind(from_location_id)
        .bind(to_location_id)
        .bind(TransferStatus::Draft.as_str())
        .bind(lines.len() as i32)
        .bind(&input.notes)
        .bind(&created_by)
        .fetch_one(&mut *tx)
        .await?;

        let mut stored = Vec::with_capacity(lines.len());
        for (product_id, quantity, notes) in &lines {
            let item = sqlx::query_as::<_, TransferItem>(
                r#"
                INSERT INTO transfer_items (transfer_id, product_id, quantity, notes)
                VALUES ($1, $2, $3, $4)
                RETURNING id, transfer_id, product_id, quantity, notes
                "#,
            )
            .bind(transfer.id)
            .bind(product_id)
            .bind(quantity)
            .bind(notes)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            transfer_number = %transfer.transfer_number,
            items = stored.len(),
            "created transfer"
        );

        Ok(TransferWithItems {
            transfer,
            items: stored,
        })
    }

    /// List transfers with an optional status filter
    pub async fn list_transfers(&self, filter: TransferFilter) -> AppResult<Vec<TransferSummary>> {
        let status = parse_status_filter(filter.status)?.map(|s| s.as_str().to_string());

        let transfers = sqlx::query_as::<_, TransferSummary>(
            r#"
            SELECT t.id, t.transfer_number, t.from_location_id, t.to_location_id, t.status,
                   t.total_items, t.notes, t.created_by, t.created_at,
                   fl.name AS from_location_name,
                   tl.name AS to_location_name,
                   COUNT(ti.id) AS item_count
            FROM internal_transfers t
            JOIN locations fl ON t.from_location_id = fl.id
            JOIN locations tl ON t.to_location_id = tl.id
            LEFT JOIN transfer_items ti ON ti.transfer_id = t.id
            WHERE ($1::text IS NULL OR t.status = $1)
            GROUP BY t.id, fl.name, tl.name
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(transfers)
    }

    /// Get a transfer with its line items
    pub async fn get_transfer(&self, transfer_id: Uuid) -> AppResult<TransferWithItems> {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, transfer_number, from_location_id, to_location_id, status,
                   total_items, notes, created_by, created_at
            FROM internal_transfers
            WHERE id = $1
            "#,
        )
        .bind(transfer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transfer".to_string()))?;

        let items = sqlx::query_as::<_, TransferItem>(
            r#"
            SELECT id, transfer_id, product_id, quantity, notes
            FROM transfer_items
            WHERE transfer_id = $1
            "#,
        )
        .bind(transfer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(TransferWithItems { transfer, items })
    }

    /// Advance a transfer one step along its lifecycle.
    ///
    /// Completing a transfer moves each line's quantity from the source
    /// location to the destination inside one transaction, so the product's
    /// total stock is unchanged by the pair of deltas.
    pub async fn advance_status(
        &self,
        transfer_id: Uuid,
        input: AdvanceStatusInput,
    ) -> AppResult<Transfer> {
        let target = parse_status_filter(input.status)?.ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: "Target status is required".to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let current_str = sqlx::query_scalar::<_, String>(
            "SELECT status FROM internal_transfers WHERE id = $1 FOR UPDATE",
        )
        .bind(transfer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Transfer".to_string()))?;
        let current = TransferStatus::from_str(&current_str)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;

        if !current.can_advance_to(target) {
            return Err(AppError::InvalidStateTransition(format!(
                "Transfer cannot move from {} to {}",
                current.as_str(),
                target.as_str()
            )));
        }

        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            UPDATE internal_transfers SET status = $1 WHERE id = $2
            RETURNING id, transfer_number, from_location_id, to_location_id, status,
                      total_items, notes, created_by, created_at
            "#,
        )
        .bind(target.as_str())
        .bind(transfer_id)
        .fetch_one(&mut *tx)
        .await?;

        if target == TransferStatus::Completed {
            let items = sqlx::query_as::<_, TransferItem>(
                r#"
                SELECT id, transfer_id, product_id, quantity, notes
                FROM transfer_items
                WHERE transfer_id = $1
                "#,
            )
            .bind(transfer_id)
            .fetch_all(&mut *tx)
            .await?;

            for item in &items {
                StockService::apply_delta(
                    &mut *tx,
                    item.product_id,
                    transfer.from_location_id,
                    -item.quantity,
                    0,
                )
                .await?;
                StockService::apply_delta(
                    &mut *tx,
                    item.product_id,
                    transfer.to_location_id,
                    item.quantity,
                    0,
                )
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            transfer_number = %transfer.transfer_number,
            status = %transfer.status,
            "advanced transfer"
        );

        Ok(transfer)
    }
}

fn parse_status_filter(status: Option<String>) -> AppResult<Option<TransferStatus>> {
    match status.filter(|s| !is_blank(s)) {
        None => Ok(None),
        Some(s) => TransferStatus::from_str(&s)
            .map(Some)
            .map_err(|e| AppError::Validation {
                field: "status".to_string(),
                message: e.to_string(),
            }),
    }
}
