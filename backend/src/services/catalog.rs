//! Catalog reference data: categories, locations, and suppliers
//!
//! Products get their own service because of the stock aggregation join.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{is_unique_violation, AppError, AppResult};
use shared::validation::is_blank;

/// Catalog service for reference data CRUD
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

/// Product category
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Warehouse location
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub location_type: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Supplier
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Input for creating a location
#[derive(Debug, Deserialize)]
pub struct CreateLocationInput {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub location_type: Option<String>,
    pub address: Option<String>,
}

/// Input for creating a supplier
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierInput {
    pub name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all categories ordered by name
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Create a category; the name must be unique
    pub async fn create_category(&self, input: CreateCategoryInput) -> AppResult<Category> {
        let name = input
            .name
            .filter(|n| !is_blank(n))
            .ok_or_else(|| AppError::Validation {
                field: "name".to_string(),
                message: "Category name is required".to_string(),
            })?;

        let result = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&name)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(category) => Ok(category),
            Err(e) if is_unique_violation(&e) => {
                Err(AppError::DuplicateEntry("category name".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List all locations ordered by name
    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT id, name, type, address, created_at FROM locations ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(locations)
    }

    /// Create a location; type defaults to "warehouse"
    pub async fn create_location(&self, input: CreateLocationInput) -> AppResult<Location> {
        let name = input
            .name
            .filter(|n| !is_blank(n))
            .ok_or_else(|| AppError::Validation {
                field: "name".to_string(),
                message: "Location name is required".to_string(),
            })?;

        let location_type = input
            .location_type
            .filter(|t| !is_blank(t))
            .unwrap_or_else(|| "warehouse".to_string());

        let location = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (name, type, address)
            VALUES ($1, $2, $3)
            RETURNING id, name, type, address, created_at
            "#,
        )
        .bind(&name)
        .bind(&location_type)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(location)
    }

    /// List all suppliers ordered by name
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT id, name, contact_email, contact_phone, address, created_at
            FROM suppliers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(suppliers)
    }

    /// Create a supplier
    pub async fn create_supplier(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        input.validate()?;

        let name = input
            .name
            .as_ref()
            .filter(|n| !is_blank(n))
            .ok_or_else(|| AppError::Validation {
                field: "name".to_string(),
                message: "Supplier name is required".to_string(),
            })?;

        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, contact_email, contact_phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, contact_email, contact_phone, address, created_at
            "#,
        )
        .bind(name)
        .bind(&input.contact_email)
        .bind(&input.contact_phone)
        .bind(&input.address)
        .fetch_one(&self.db)
        .await?;

        Ok(supplier)
    }
}
