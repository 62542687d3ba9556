//! Tape catalog service

use rust_decimal::Decimal;
use validator::Validate;

use super::parse_public_id;
use crate::{
    error::{AppError, AppResult},
    models::tape::{CreateTape, Tape, UpdateTape},
    repository::Repository,
};

#[derive(Clone)]
pub struct TapesService {
    repository: Repository,
}

impl TapesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create_tape(&self, tape: CreateTape) -> AppResult<Tape> {
        tape.validate()?;
        check_price(tape.price)?;

        let created = self.repository.tapes.create(&tape).await?;
        tracing::info!("Tape created: {} ({} copies)", created.public_id, created.quantity);
        Ok(created)
    }

    pub async fn list_tapes(&self) -> AppResult<Vec<Tape>> {
        self.repository.tapes.list().await
    }

    pub async fn get_tape(&self, public_id: &str) -> AppResult<Tape> {
        let public_id = parse_public_id(public_id)?;
        self.repository.tapes.get_by_public_id(public_id).await
    }

    pub async fn update_tape(&self, public_id: &str, update: UpdateTape) -> AppResult<Tape> {
        let public_id = parse_public_id(public_id)?;
        update.validate()?;
        if update.is_empty() {
            return Err(AppError::BadRequest(
                "Tape update request needs at least one field".to_string(),
            ));
        }
        if let Some(price) = update.price {
            check_price(price)?;
        }

        self.repository.tapes.update(public_id, &update).await
    }

    pub async fn delete_tape(&self, public_id: &str) -> AppResult<()> {
        let public_id = parse_public_id(public_id)?;
        self.repository.tapes.delete(public_id).await?;
        tracing::info!("Tape deleted: {}", public_id);
        Ok(())
    }

    pub async fn delete_all_tapes(&self) -> AppResult<()> {
        let deleted = self.repository.tapes.delete_all().await?;
        tracing::warn!("Deleted all tapes ({} rows)", deleted);
        Ok(())
    }
}

fn check_price(price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("Price must be greater than zero".to_string()));
    }
    Ok(())
}
