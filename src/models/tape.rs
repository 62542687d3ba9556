//! Tape model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Tape title as stored in the catalog, with the number of physical copies owned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tape {
    /// Internal key, never exposed
    #[serde(skip)]
    pub id: i32,
    pub public_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub director: String,
    pub genre: String,
    /// Number of copies; at most this many may be rented out at once
    pub quantity: i32,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

/// Create tape request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTape {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub director: String,
    #[validate(length(min = 1, max = 50))]
    pub genre: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

/// Partial tape update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTape {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub director: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub genre: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[schema(value_type = Option<String>, example = "19.99")]
    pub price: Option<Decimal>,
}

impl UpdateTape {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.director.is_none()
            && self.genre.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }
}
