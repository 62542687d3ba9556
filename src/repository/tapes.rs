//! Tapes repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::is_foreign_key_violation;
use crate::{
    error::{AppError, AppResult},
    models::tape::{CreateTape, Tape, UpdateTape},
};

#[derive(Clone)]
pub struct TapesRepository {
    pool: Pool<Postgres>,
}

impl TapesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all tapes
    pub async fn list(&self) -> AppResult<Vec<Tape>> {
        let tapes = sqlx::query_as::<_, Tape>("SELECT * FROM tapes ORDER BY title, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tapes)
    }

    /// Get tape by public ID
    pub async fn get_by_public_id(&self, public_id: Uuid) -> AppResult<Tape> {
        sqlx::query_as::<_, Tape>("SELECT * FROM tapes WHERE public_id = $1")
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::TapeNotFound)
    }

    /// Create a new tape
    pub async fn create(&self, tape: &CreateTape) -> AppResult<Tape> {
        let created = sqlx::query_as::<_, Tape>(
            r#"
            INSERT INTO tapes (title, director, genre, quantity, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&tape.title)
        .bind(&tape.director)
        .bind(&tape.genre)
        .bind(tape.quantity)
        .bind(tape.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Apply a partial update.
    ///
    /// The tape row is locked while the new quantity is checked against the
    /// copies currently rented out, so a concurrent admission cannot slip in
    /// between the check and the write.
    pub async fn update(&self, public_id: Uuid, data: &UpdateTape) -> AppResult<Tape> {
        let mut tx = self.pool.begin().await?;

        let tape_id: i32 = sqlx::query_scalar("SELECT id FROM tapes WHERE public_id = $1 FOR UPDATE")
            .bind(public_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::TapeNotFound)?;

        if let Some(quantity) = data.quantity {
            let rented: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM rentals WHERE tape_id = $1 AND returned_at IS NULL",
            )
            .bind(tape_id)
            .fetch_one(&mut *tx)
            .await?;

            if i64::from(quantity) < rented {
                return Err(AppError::Conflict(format!(
                    "Quantity cannot drop below the {} copies currently rented out",
                    rented
                )));
            }
        }

        let updated = sqlx::query_as::<_, Tape>(
            r#"
            UPDATE tapes SET
                title = COALESCE($2, title),
                director = COALESCE($3, director),
                genre = COALESCE($4, genre),
                quantity = COALESCE($5, quantity),
                price = COALESCE($6, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(tape_id)
        .bind(&data.title)
        .bind(&data.director)
        .bind(&data.genre)
        .bind(data.quantity)
        .bind(data.price)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a tape that has no rental history
    pub async fn delete(&self, public_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM tapes WHERE public_id = $1")
            .bind(public_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict("Tape has rental records and cannot be deleted".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::TapeNotFound);
        }
        Ok(())
    }

    /// Delete every tape
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM tapes")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict("Rental records still reference tapes".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(result.rows_affected())
    }
}
