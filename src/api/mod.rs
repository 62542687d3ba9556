//! API handlers for VHS Club REST endpoints

pub mod health;
pub mod openapi;
pub mod rentals;
pub mod tapes;
pub mod users;
