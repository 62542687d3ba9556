//! User registration service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use validator::Validate;

use super::parse_public_id;
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, CreateUserBatch, User, UserBatchResult},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()?;

        let hashed = hash_password(&user.password)?;
        let created = self
            .repository
            .users
            .create(&user.username, &user.email, &hashed)
            .await?;

        tracing::info!("User registered: {} ({})", created.username, created.public_id);
        Ok(created)
    }

    /// Register several users, skipping those whose username or email is taken
    pub async fn create_users_batch(&self, batch: CreateUserBatch) -> AppResult<UserBatchResult> {
        batch.validate()?;

        let mut users = Vec::with_capacity(batch.users.len());
        let mut already_exists = 0;

        for user in batch.users {
            let hashed = hash_password(&user.password)?;
            match self
                .repository
                .users
                .create(&user.username, &user.email, &hashed)
                .await
            {
                Ok(created) => users.push(created),
                Err(AppError::Conflict(_)) => {
                    tracing::debug!("Skipping already registered user {}", user.username);
                    already_exists += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            "Batch registration: {} created, {} already registered",
            users.len(),
            already_exists
        );
        Ok(UserBatchResult { users, already_exists })
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn get_user(&self, public_id: &str) -> AppResult<User> {
        let public_id = parse_public_id(public_id)?;
        self.repository.users.get_by_public_id(public_id).await
    }

    pub async fn delete_all_users(&self) -> AppResult<()> {
        let deleted = self.repository.users.delete_all().await?;
        tracing::warn!("Deleted all users ({} rows)", deleted);
        Ok(())
    }
}

/// Hash a password using Argon2, as a PHC string
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
