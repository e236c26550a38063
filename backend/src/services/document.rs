//! Document number allocation and shared checks for movement documents

use chrono::{Datelike, Utc};
use serde::Deserialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{format_document_number, DocumentKind};

/// Input for advancing a document one step along its lifecycle
#[derive(Debug, Deserialize)]
pub struct AdvanceStatusInput {
    pub status: Option<String>,
}

/// Allocate the next document number for a variant: `PREFIX-YYYY-NNNNNN`.
///
/// The per-(prefix, year) counter is bumped by a single upsert inside the
/// caller's transaction, so two concurrent submissions can never observe the
/// same value.
pub async fn next_document_number(
    conn: &mut PgConnection,
    kind: DocumentKind,
) -> AppResult<String> {
    let year = Utc::now().year();

    let sequence: i64 = sqlx::query_scalar("SELECT next_document_seq($1, $2)")
        .bind(kind.prefix())
        .bind(year)
        .fetch_one(conn)
        .await?;

    Ok(format_document_number(kind, year, sequence))
}

/// Validation error for an incomplete or invalid line item.
///
/// Incomplete lines are rejected with the offending index rather than
/// silently dropped, so a submission never stores fewer lines than the
/// client sent.
pub(crate) fn line_error(index: usize, field: &str, message: &str) -> AppError {
    AppError::Validation {
        field: format!("items[{}].{}", index, field),
        message: format!("Line {}: {}", index, message),
    }
}

pub(crate) async fn ensure_product_exists(
    conn: &mut PgConnection,
    product_id: Uuid,
) -> AppResult<()> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(product_id)
        .fetch_one(conn)
        .await?;

    if !exists {
        return Err(AppError::NotFound("Product".to_string()));
    }
    Ok(())
}

pub(crate) async fn ensure_location_exists(
    conn: &mut PgConnection,
    location_id: Uuid,
) -> AppResult<()> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1)")
            .bind(location_id)
            .fetch_one(conn)
            .await?;

    if !exists {
        return Err(AppError::NotFound("Location".to_string()));
    }
    Ok(())
}

pub(crate) async fn ensure_supplier_exists(
    conn: &mut PgConnection,
    supplier_id: Uuid,
) -> AppResult<()> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
            .bind(supplier_id)
            .fetch_one(conn)
            .await?;

    if !exists {
        return Err(AppError::NotFound("Supplier".to_string()));
    }
    Ok(())
}

/// Extract a required, non-blank `created_by` caller identity.
///
/// Documents always record the explicit submitting user; there is no
/// ambient current-user fallback.
pub(crate) fn require_created_by(created_by: Option<String>) -> AppResult<String> {
    created_by
        .filter(|v| !shared::validation::is_blank(v))
        .ok_or_else(|| AppError::Validation {
            field: "created_by".to_string(),
            message: "created_by is required".to_string(),
        })
}
