//! Store contract the rental service depends on

use async_trait::async_trait;
use uuid::Uuid;

use super::{rentals::PgAdmission, Repository};
use crate::{
    error::AppResult,
    models::{rental::Rental, tape::Tape, user::User},
};

/// Entity lookups and rental bookkeeping.
///
/// Public identifiers are resolved to rows here; everything past the lookup
/// works on internal keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalStore: Send + Sync {
    async fn get_tape_by_public_id(&self, public_id: Uuid) -> AppResult<Tape>;

    async fn get_user_by_public_id(&self, public_id: Uuid) -> AppResult<User>;

    /// Start the unit of work that counts and inserts atomically
    async fn begin_admission(&self) -> AppResult<Box<dyn AdmissionTx>>;

    async fn return_rental(&self, tape_id: i32, user_id: i32) -> AppResult<Rental>;

    async fn list_active_rentals(&self) -> AppResult<Vec<Rental>>;

    async fn delete_all_rentals(&self) -> AppResult<u64>;
}

/// Capacity checks and insert of a single admission.
///
/// Once a count has been taken, no other admission for the same user or tape
/// can count or insert until this one commits or is dropped. Dropping without
/// `commit` discards the insert.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdmissionTx: Send {
    async fn count_active_rentals_by_user(&mut self, user_id: i32) -> AppResult<i64>;

    async fn count_active_rentals_by_tape(&mut self, tape_id: i32) -> AppResult<i64>;

    /// Copies owned, read from the locked tape row
    async fn tape_quantity(&mut self, tape_id: i32) -> AppResult<i32>;

    async fn create_rental(&mut self, tape_id: i32, user_id: i32) -> AppResult<Rental>;

    async fn commit(&mut self) -> AppResult<()>;
}

#[async_trait]
impl RentalStore for Repository {
    async fn get_tape_by_public_id(&self, public_id: Uuid) -> AppResult<Tape> {
        self.tapes.get_by_public_id(public_id).await
    }

    async fn get_user_by_public_id(&self, public_id: Uuid) -> AppResult<User> {
        self.users.get_by_public_id(public_id).await
    }

    async fn begin_admission(&self) -> AppResult<Box<dyn AdmissionTx>> {
        let admission = self.rentals.begin_admission().await?;
        Ok(Box::new(admission))
    }

    async fn return_rental(&self, tape_id: i32, user_id: i32) -> AppResult<Rental> {
        self.rentals.return_rental(tape_id, user_id).await
    }

    async fn list_active_rentals(&self) -> AppResult<Vec<Rental>> {
        self.rentals.list_active().await
    }

    async fn delete_all_rentals(&self) -> AppResult<u64> {
        self.rentals.delete_all().await
    }
}

#[async_trait]
impl AdmissionTx for PgAdmission {
    async fn count_active_rentals_by_user(&mut self, user_id: i32) -> AppResult<i64> {
        PgAdmission::count_active_rentals_by_user(self, user_id).await
    }

    async fn count_active_rentals_by_tape(&mut self, tape_id: i32) -> AppResult<i64> {
        PgAdmission::count_active_rentals_by_tape(self, tape_id).await
    }

    async fn tape_quantity(&mut self, tape_id: i32) -> AppResult<i32> {
        PgAdmission::tape_quantity(self, tape_id).await
    }

    async fn create_rental(&mut self, tape_id: i32, user_id: i32) -> AppResult<Rental> {
        PgAdmission::create_rental(self, tape_id, user_id).await
    }

    async fn commit(&mut self) -> AppResult<()> {
        PgAdmission::commit(self).await
    }
}
