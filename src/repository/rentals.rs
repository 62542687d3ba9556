//! Rentals repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::rental::Rental,
};

/// Columns of `Rental`, selected from a row source aliased `r`
const RENTAL_PROJECTION: &str = r#"
    SELECT r.id, r.public_id, r.created_at, r.tape_id, r.user_id,
           t.public_id AS tape_public_id, u.public_id AS user_public_id,
           t.title AS tape_title, u.username,
           r.rented_at, r.returned_at
"#;

const RENTAL_JOINS: &str = r#"
    JOIN tapes t ON t.id = r.tape_id
    JOIN users u ON u.id = r.user_id
"#;

#[derive(Clone)]
pub struct RentalsRepository {
    pool: Pool<Postgres>,
}

impl RentalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Active rentals, oldest first
    pub async fn list_active(&self) -> AppResult<Vec<Rental>> {
        let query = format!(
            "{} FROM rentals r {} WHERE r.returned_at IS NULL ORDER BY r.rented_at, r.id",
            RENTAL_PROJECTION, RENTAL_JOINS
        );
        let rentals = sqlx::query_as::<_, Rental>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rentals)
    }

    /// Mark the oldest active rental of `tape_id` by `user_id` as returned
    pub async fn return_rental(&self, tape_id: i32, user_id: i32) -> AppResult<Rental> {
        // SKIP LOCKED lets two concurrent returns of the same pair pick different rows
        let query = format!(
            r#"
            WITH r AS (
                UPDATE rentals SET returned_at = NOW()
                WHERE id = (
                    SELECT id FROM rentals
                    WHERE tape_id = $1 AND user_id = $2 AND returned_at IS NULL
                    ORDER BY rented_at, id
                    LIMIT 1
                    FOR UPDATE SKIP LOCKED
                )
                RETURNING *
            )
            {} FROM r {}
            "#,
            RENTAL_PROJECTION, RENTAL_JOINS
        );

        sqlx::query_as::<_, Rental>(&query)
            .bind(tape_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::RentalNotFound)
    }

    /// Delete every rental, active or not
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM rentals")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Open the transaction an admission runs in
    pub async fn begin_admission(&self) -> AppResult<PgAdmission> {
        let tx = self.pool.begin().await?;
        Ok(PgAdmission { tx: Some(tx) })
    }
}

/// One admission's transaction.
///
/// Counting locks the user row and then the tape row; every admission takes
/// them in that order. Dropping it uncommitted rolls the transaction back.
pub struct PgAdmission {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgAdmission {
    fn tx(&mut self) -> AppResult<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| AppError::Internal("Admission transaction already committed".to_string()))
    }

    pub async fn count_active_rentals_by_user(&mut self, user_id: i32) -> AppResult<i64> {
        let tx = self.tx()?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM rentals WHERE user_id = $1 AND returned_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    pub async fn count_active_rentals_by_tape(&mut self, tape_id: i32) -> AppResult<i64> {
        let tx = self.tx()?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM tapes WHERE id = $1 FOR UPDATE")
            .bind(tape_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AppError::TapeNotFound)?;

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM rentals WHERE tape_id = $1 AND returned_at IS NULL",
        )
        .bind(tape_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    pub async fn tape_quantity(&mut self, tape_id: i32) -> AppResult<i32> {
        let tx = self.tx()?;

        sqlx::query_scalar::<_, i32>("SELECT quantity FROM tapes WHERE id = $1 FOR UPDATE")
            .bind(tape_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AppError::TapeNotFound)
    }

    /// Insert the rental. Quantity is re-read under the tape lock, so a
    /// concurrent quantity update cannot be overshot.
    pub async fn create_rental(&mut self, tape_id: i32, user_id: i32) -> AppResult<Rental> {
        let tx = self.tx()?;

        let query = format!(
            r#"
            WITH r AS (
                INSERT INTO rentals (tape_id, user_id)
                SELECT t.id, $2 FROM tapes t
                WHERE t.id = $1
                  AND t.quantity > (
                      SELECT COUNT(*) FROM rentals
                      WHERE tape_id = $1 AND returned_at IS NULL
                  )
                RETURNING *
            )
            {} FROM r {}
            "#,
            RENTAL_PROJECTION, RENTAL_JOINS
        );

        sqlx::query_as::<_, Rental>(&query)
            .bind(tape_id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(AppError::TapeUnavailable)
    }

    pub async fn commit(&mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::Internal("Admission transaction already committed".to_string()))?;
        tx.commit().await?;
        Ok(())
    }
}
