//! Warehouse user accounts
//!
//! Session handling lives outside this service; it only manages the user
//! records themselves. Password hashes never leave the database layer.

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::models::UserRole;
use shared::validation::is_blank;

/// User service for account CRUD
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// A user account, without the password hash
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

/// Filters for listing users
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List users with optional role and active filters
    pub async fn list_users(&self, filter: UserFilter) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, full_name, role, is_active, created_at
            FROM users
            WHERE ($1::text IS NULL OR role = $1)
              AND ($2::bool IS NULL OR is_active = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&filter.role)
        .bind(filter.is_active)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// Create a user with a bcrypt-hashed password
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        input.validate()?;

        let username = input
            .username
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "username".to_string(),
                message: "Username is required".to_string(),
            })?;
        let email = input
            .email
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "email".to_string(),
                message: "Email is required".to_string(),
            })?;
        let password = input
            .password
            .filter(|v| !is_blank(v))
            .ok_or_else(|| AppError::Validation {
                field: "password".to_string(),
                message: "Password is required".to_string(),
            })?;

        let role = match input.role.filter(|r| !is_blank(r)) {
            Some(r) => UserRole::from_str(&r).map_err(|e| AppError::Validation {
                field: "role".to_string(),
                message: e.to_string(),
            })?,
            None => UserRole::default(),
        };

        // Check if user already exists
        let existing = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(&username)
        .bind(&email)
        .fetch_one(&self.db)
        .await?;

        if existing {
            return Err(AppError::DuplicateEntry("username or email".to_string()));
        }

        let password_hash = hash(&password, DEFAULT_COST)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, full_name, role, is_active, created_at
            "#,
        )
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(&input.full_name)
        .bind(role.as_str())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(username = %user.username, "created user");

        Ok(user)
    }
}
