//! Rental model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Rental lifecycle: created active, terminated by a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Active,
    Returned,
}

/// Rental of one tape copy by one user, joined with display fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    #[serde(skip)]
    pub id: i32,
    pub public_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub tape_id: i32,
    #[serde(skip)]
    pub user_id: i32,
    pub tape_public_id: Uuid,
    pub user_public_id: Uuid,
    pub tape_title: String,
    pub username: String,
    pub rented_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Rental {
    pub fn status(&self) -> RentalStatus {
        if self.returned_at.is_some() {
            RentalStatus::Returned
        } else {
            RentalStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == RentalStatus::Active
    }
}
