//! Author directory service

use crate::{
    config::SeedConfig,
    error::AppResult,
    models::{Author, AuthorWithBooks},
    repository::{
        keys::{normalize, Identity},
        Repository,
    },
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Insert the administrative author if it is not there yet
    pub fn seed_admin(&self, seed: &SeedConfig) -> AppResult<()> {
        if self.repository.seed_admin(seed)? {
            tracing::info!(author = %normalize(&seed.username), "Seeded administrative author");
        } else {
            tracing::debug!("Administrative author already present");
        }
        Ok(())
    }

    pub fn list_authors(&self) -> Vec<Author> {
        self.repository.authors_list()
    }

    /// Look up an author by username or display form of it
    pub fn get_author(&self, username: &str) -> AppResult<AuthorWithBooks> {
        self.repository.authors_get(&normalize(username))
    }

    /// Delete the acting author's own account together with their books
    pub fn delete_author(&self, acting: &Identity, username: &str) -> AppResult<()> {
        let removed = self.repository.authors_delete(acting, &normalize(username))?;
        tracing::info!(author = %acting, books = removed.len(), "Author deleted");
        Ok(())
    }
}
