//! Rental admission service

use std::sync::Arc;

use super::parse_public_id;
use crate::{
    error::{AppError, AppResult},
    models::rental::Rental,
    repository::RentalStore,
};

/// Active rentals a single user may hold at once
pub const MAX_RENTALS_PER_USER: i64 = 2;

#[derive(Clone)]
pub struct RentalsService {
    store: Arc<dyn RentalStore>,
}

impl RentalsService {
    pub fn new(store: Arc<dyn RentalStore>) -> Self {
        Self { store }
    }

    /// Rent one copy of a tape to a user.
    ///
    /// Checks run in a fixed order, each failing with its own error: both
    /// identifiers are parsed before any store access, the tape is looked up
    /// before the user, and the per-user limit is checked before tape
    /// availability. The two counts, the quantity read and the insert share
    /// one store transaction; any early return drops it uncommitted.
    pub async fn rent_tape(&self, tape_public_id: &str, user_public_id: &str) -> AppResult<Rental> {
        let tape_public_id = parse_public_id(tape_public_id)?;
        let user_public_id = parse_public_id(user_public_id)?;

        let tape = self.store.get_tape_by_public_id(tape_public_id).await?;
        let user = self.store.get_user_by_public_id(user_public_id).await?;

        let mut admission = self.store.begin_admission().await?;

        let user_rentals = admission.count_active_rentals_by_user(user.id).await?;
        if user_rentals >= MAX_RENTALS_PER_USER {
            tracing::debug!(
                "Rental refused: {} already holds {}/{} tapes",
                user.username,
                user_rentals,
                MAX_RENTALS_PER_USER
            );
            return Err(AppError::MaxRentalsPerUser);
        }

        let tape_rentals = admission.count_active_rentals_by_tape(tape.id).await?;
        let quantity = admission.tape_quantity(tape.id).await?;
        if tape_rentals >= i64::from(quantity) {
            tracing::debug!(
                "Rental refused: '{}' has {}/{} copies out",
                tape.title,
                tape_rentals,
                quantity
            );
            return Err(AppError::TapeUnavailable);
        }

        let rental = admission.create_rental(tape.id, user.id).await?;
        admission.commit().await?;

        tracing::info!(
            "Tape '{}' rented to {} (rental {})",
            rental.tape_title,
            rental.username,
            rental.public_id
        );
        Ok(rental)
    }

    /// Return the oldest copy of a tape the user currently holds
    pub async fn return_tape(&self, tape_public_id: &str, user_public_id: &str) -> AppResult<Rental> {
        let tape_public_id = parse_public_id(tape_public_id)?;
        let user_public_id = parse_public_id(user_public_id)?;

        let tape = self.store.get_tape_by_public_id(tape_public_id).await?;
        let user = self.store.get_user_by_public_id(user_public_id).await?;

        let rental = self.store.return_rental(tape.id, user.id).await?;

        tracing::info!(
            "Tape '{}' returned by {} (rental {})",
            rental.tape_title,
            rental.username,
            rental.public_id
        );
        Ok(rental)
    }

    pub async fn list_active_rentals(&self) -> AppResult<Vec<Rental>> {
        self.store.list_active_rentals().await
    }

    pub async fn delete_all_rentals(&self) -> AppResult<()> {
        let deleted = self.store.delete_all_rentals().await?;
        tracing::warn!("Deleted all rentals ({} rows)", deleted);
        Ok(())
    }
}
