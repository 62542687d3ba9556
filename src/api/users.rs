//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, CreateUserBatch, User, UserBatchResult},
    AppState,
};

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Registered users", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Get a user by public ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User public ID")),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(&id).await?;
    Ok(Json(user))
}

/// Register a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid user fields", body = crate::error::ErrorResponse),
        (status = 409, description = "Username or email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUser>, AppError>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.services.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Register several users at once
#[utoipa::path(
    post,
    path = "/users/batch",
    tag = "users",
    request_body = CreateUserBatch,
    responses(
        (status = 201, description = "Users created", body = UserBatchResult),
        (status = 400, description = "Invalid user fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_users_batch(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserBatch>, AppError>,
) -> AppResult<(StatusCode, Json<UserBatchResult>)> {
    let result = state.services.users.create_users_batch(request).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Delete every user
#[utoipa::path(
    delete,
    path = "/users",
    tag = "users",
    responses(
        (status = 204, description = "All users deleted"),
        (status = 409, description = "Rental records still reference users")
    )
)]
pub async fn delete_all_users(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.services.users.delete_all_users().await?;
    Ok(StatusCode::NO_CONTENT)
}
