//! Data models for the VHS Club

pub mod rental;
pub mod tape;
pub mod user;

// Re-export commonly used types
pub use rental::{Rental, RentalStatus};
pub use tape::{CreateTape, Tape, UpdateTape};
pub use user::{CreateUser, CreateUserBatch, User, UserBatchResult};
