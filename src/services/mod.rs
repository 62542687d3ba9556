//! Business logic services

pub mod rentals;
pub mod tapes;
pub mod users;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub tapes: tapes::TapesService,
    pub users: users::UsersService,
    pub rentals: rentals::RentalsService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            tapes: tapes::TapesService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            rentals: rentals::RentalsService::new(Arc::new(repository.clone())),
            repository,
        }
    }
}

/// Parse an externally supplied public identifier
pub(crate) fn parse_public_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidIdentifier(format!("'{}' is not a valid identifier", raw)))
}
