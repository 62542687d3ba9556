//! VHS Club rental server
//!
//! REST JSON API for a video tape rental club: the tape catalog, club
//! members, and the rental desk that decides whether a member may take
//! a copy home.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
