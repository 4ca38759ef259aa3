//! Bookshelf Server
//!
//! Authors sign up, log in, and manage the books they own; everyone may read
//! the author directory and the book catalog. Served as a REST JSON API over
//! an in-memory store.

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
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the store and services, seeding the administrative author.
    /// Must complete before the router starts serving.
    pub fn bootstrap(config: AppConfig) -> AppResult<Self> {
        let repository = repository::Repository::new();
        let services = services::Services::new(repository, config.auth.clone());
        services.authors.seed_admin(&config.seed)?;

        Ok(Self {
            services: Arc::new(services),
        })
    }
}
