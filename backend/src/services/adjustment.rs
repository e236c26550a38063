//! Stock adjustment documents: reconciling recorded quantities with
//! physical counts

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
use shared::models::{AdjustmentReason, AdjustmentStatus, DocumentKind};
use shared::validation::{adjustment_difference, is_blank};

/// Adjustment service for count-reconciliation documents
#[derive(Clone)]
pub struct AdjustmentService {
    db: PgPool,
}

/// Adjustment header
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Adjustment {
    pub id: Uuid,
    pub adjustment_number: String,
    pub location_id: Uuid,
    pub reason: String,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Adjustment line item; difference is counted minus recorded, signed
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdjustmentItem {
    pub id: Uuid,
    pub adjustment_id: Uuid,
    pub product_id: Uuid,
    pub recorded_quantity: i64,
    pub counted_quantity: i64,
    pub difference: i64,
    pub notes: Option<String>,
}

/// Adjustment header with its line items
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentWithItems {
    #[serde(flatten)]
    pub adjustment: Adjustment,
    pub items: Vec<AdjustmentItem>,
}

/// Adjustment list row with denormalized location name and line count
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdjustmentSummary {
    pub id: Uuid,
    pub adjustment_number: String,
    pub location_id: Uuid,
    pub reason: String,
    pub status: String,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub location_name: String,
    pub item_count: i64,
}

/// Input for creating an adjustment
#[derive(Debug, Deserialize)]
pub struct CreateAdjustmentInput {
    pub location_id: Option<Uuid>,
    pub reason: Option<String>,
    pub items: Option<Vec<AdjustmentLineInput>>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// One submitted adjustment line
#[derive(Debug, Deserialize)]
pub struct AdjustmentLineInput {
    pub product_id: Option<Uuid>,
    pub recorded_quantity: Option<i64>,
    pub counted_quantity: Option<i64>,
    pub notes: Option<String>,
}

/// Filters for listing adjustments
#[derive(Debug, Default, Deserialize)]
pub struct AdjustmentFilter {
    pub status: Option<String>,
    pub location_id: Option<Uuid>,
}

impl AdjustmentService {
    /// Create a new AdjustmentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Submit an adjustment: validate, then persist header and lines
    /// atomically. The reason must come from the fixed vocabulary.
    pub async fn create_adjustment(
        &self,
        input: CreateAdjustmentInput,
    ) -> AppResult<AdjustmentWithItems> {
        let created_by = require_created_by(input.created_by)?;

        let location_id = input.location_id.ok_or_else(|| AppError::Validation {
            field: "location_id".to_string(),
            message: "Location is required".to_string(),
        })?;

        let reason_str = input
            .reason
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "reason".to_string(),
                message: "Reason is required".to_string(),
            })?;
        let reason =
            AdjustmentReason::from_str(&reason_str).map_err(|e| AppError::Validation {
                field: "reason".to_string(),
                message: e.to_string(),
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
            let recorded_quantity = item
                .recorded_quantity
                .ok_or_else(|| line_error(index, "recorded_quantity", "recorded quantity is required"))?;
            let counted_quantity = item
                .counted_quantity
                .ok_or_else(|| line_error(index, "counted_quantity", "counted quantity is required"))?;
            if recorded_quantity < 0 {
                return Err(line_error(
                    index,
                    "recorded_quantity",
                    "quantity cannot be negative",
                ));
            }
            if counted_quantity < 0 {
                return Err(line_error(
                    index,
                    "counted_quantity",
                    "quantity cannot be negative",
                ));
            }
            lines.push((product_id, recorded_quantity, counted_quantity, item.notes));
        }

        let mut tx = self.db.begin().await?;

        ensure_location_exists(&mut tx, location_id).await?;
        for (product_id, _, _, _) in &lines {
            ensure_product_exists(&mut tx, *product_id).await?;
        }

        let adjustment_number = next_document_number(&mut tx, DocumentKind::Adjustment).await?;

        let adjustment = sqlx::query_as::<_, Adjustment>(
            r#"
            INSERT INTO inventory_adjustments (adjustment_number, location_id, reason,
                                               status, total_items, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, adjustment_number, location_id, reason, status, total_items,
                      notes, created_by, created_at
            "#,
        )
        .bind(&adjustment_number)
        .bind(location_id)
        .bind(reason.as_str())
        .bind(AdjustmentStatus::Draft.as_str())
        .bind(lines.len() as i32)
        .bind(&input.notes)
        .bind(&created_by)
        .fetch_one(&mut *tx)
        .await?;

        let mut stored = Vec::with_capacity(lines.len());
        for (product_id, recorded_quantity, counted_quantity, notes) in &lines {
            let difference = adjustment_difference(*counted_quantity, *recorded_quantity);
            let item = sqlx::query_as::<_, AdjustmentItem>(
                r#"
                INSERT INTO adjustment_items (adjustment_id, product_id, recorded_quantity,
                                              counted_quantity, difference, notes)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, adjustment_id, product_id, recorded_quantity, counted_quantity,
                          difference, notes
                "#,
            )
            .bind(adjustment.id)
            .bind(product_id)
            .bind(recorded_quantity)
            .bind(counted_quantity)
            .bind(difference)
            .bind(notes)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            adjustment_number = %adjustment.adjustment_number,
            items = stored.len(),
            "created adjustment"
        );

        Ok(AdjustmentWithItems {
            adjustment,
            items: stored,
        })
    }

    /// List adjustments with optional status and location filters
    pub async fn list_adjustments(
        &self,
        filter: AdjustmentFilter,
    ) -> AppResult<Vec<AdjustmentSummary>> {
        let status = parse_status_filter(filter.status)?.map(|s| s.as_str().to_string());

        let adjustments = sqlx::query_as::<_, AdjustmentSummary>(
            r#"
            SELECT a.id, a.adjustment_number, a.location_id, a.reason, a.status,
                   a.total_items, a.notes, a.created_by, a.created_at,
                   l.name AS location_name,
                   COUNT(ai.id) AS item_count
            FROM inventory_adjustments a
            JOIN locations l ON a.location_id = l.id
            LEFT JOIN adjustment_items ai ON ai.adjustment_id = a.id
            WHERE ($1::text IS NULL OR a.status = $1)
              AND ($2::uuid IS NULL OR a.location_id = $2)
            GROUP BY a.id, l.name
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(status)
        .bind(filter.location_id)
        .fetch_all(&self.db)
        .await?;

        Ok(adjustments)
    }

    /// Get an adjustment with its line items
    pub async fn get_adjustment(&self, adjustment_id: Uuid) -> AppResult<AdjustmentWithItems> {
        let adjustment = sqlx::query_as::<_, Adjustment>(
            r#"
            SELECT id, adjustment_number, location_id, reason, status, total_items,
                   notes, created_by, created_at
            FROM inventory_adjustments
            WHERE id = $1
            "#,
        )
        .bind(adjustment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Adjustment".to_string()))?;

        let items = sqlx::query_as::<_, AdjustmentItem>(
            r#"
            SELECT id, adjustment_id, product_id, recorded_quantity, counted_quantity,
                   difference, notes
            FROM adjustment_items
            WHERE adjustment_id = $1
            "#,
        )
        .bind(adjustment_id)
        .fetch_all(&self.db)
        .await?;

        Ok(AdjustmentWithItems { adjustment, items })
    }

    /// Advance an adjustment one step along its lifecycle.
    ///
    /// Approving an adjustment applies each line's signed difference at the
    /// document's location, bringing stock to the counted quantity.
    pub async fn advance_status(
        &self,
        adjustment_id: Uuid,
        input: AdvanceStatusInput,
    ) -> AppResult<Adjustment> {
        let target = parse_status_filter(input.status)?.ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: "Target status is required".to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let current_str = sqlx::query_scalar::<_, String>(
            "SELECT status FROM inventory_adjustments WHERE id = $1 FOR UPDATE",
        )
        .bind(adjustment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Adjustment".to_string()))?;
        let current = AdjustmentStatus::from_str(&current_str)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;

        if !current.can_advance_to(target) {
            return Err(AppError::InvalidStateTransition(format!(
                "Adjustment cannot move from {} to {}",
                current.as_str(),
                target.as_str()
            )));
        }

        let adjustment = sqlx::query_as::<_, Adjustment>(
            r#"
            UPDATE inventory_adjustments SET status = $1 WHERE id = $2
            RETURNING id, adjustment_number, location_id, reason, status, total_items,
                      notes, created_by, created_at
            "#,
        )
        .bind(target.as_str())
        .bind(adjustment_id)
        .fetch_one(&mut *tx)
        .await?;

        if target == AdjustmentStatus::Approved {
            let items = sqlx::query_as::<_, AdjustmentItem>(
                r#"
                SELECT id, adjustment_id, product_id, recorded_quantity, counted_quantity,
                       difference, notes
                FROM adjustment_items
                WHERE adjustment_id = $1
                "#,
            )
            .bind(adjustment_id)
            .fetch_all(&mut *tx)
            .await?;

            for item in &items {
                StockService::apply_delta(
                    &mut *tx,
                    item.product_id,
                    adjustment.location_id,
                    item.difference,
                    0,
                )
                .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            adjustment_number = %adjustment.adjustment_number,
            status = %adjustment.status,
            "advanced adjustment"
        );

        Ok(adjustment)
    }
}

fn parse_status_filter(status: Option<String>) -> AppResult<Option<AdjustmentStatus>> {
    match status.filter(|s| !is_blank(s)) {
        None => Ok(None),
        Some(s) => AdjustmentStatus::from_str(&s)
            .map(Some)
            .map_err(|e| AppError::Validation {
                field: "status".to_string(),
                message: e.to_string(),
            }),
    }
}
