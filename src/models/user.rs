//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Club member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[serde(skip)]
    pub id: i32,
    pub public_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip)]
    pub hashed_password: String,
}

/// Create user request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 4, max = 20), custom(function = "validate_alphanumeric"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 20))]
    pub password: String,
}

/// Several registrations in one request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserBatch {
    #[validate(length(min = 1), nested)]
    pub users: Vec<CreateUser>,
}

/// Outcome of a batch registration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserBatchResult {
    pub users: Vec<User>,
    /// Entries skipped because the username or email was already taken
    pub already_exists: u32,
}

fn validate_alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanum"))
    }
}
