//! HTTP handlers for user management endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::error::AppResult;
use crate::services::user::{CreateUserInput, User, UserFilter, UserService};
use crate::AppState;

/// List users with optional role and active filters
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<Vec<User>>> {
    let service = UserService::new(state.db);
    let users = service.list_users(filter).await?;
    Ok(Json(users))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let service = UserService::new(state.db);
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
