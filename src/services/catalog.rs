//! Book catalog service

use crate::{
    error::AppResult,
    models::{Book, NewBook, UpdateBook},
    repository::{keys::Identity, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Registered authors and cataloged books
    pub fn counts(&self) -> (usize, usize) {
        self.repository.counts()
    }

    pub fn list_books(&self) -> Vec<Book> {
        self.repository.books_list()
    }

    pub fn get_book(&self, isbn: &str) -> AppResult<Book> {
        self.repository.books_get(isbn)
    }

    /// Add books attributed to the acting author
    pub fn add_books(&self, acting: &Identity, books: Vec<NewBook>) -> AppResult<Vec<Book>> {
        let added = self.repository.books_add(acting, books)?;
        tracing::info!(
            author = %acting,
            isbns = ?added.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>(),
            "Books added"
        );
        Ok(added)
    }

    /// Partially update a book owned by the acting author
    pub fn update_book(&self, acting: &Identity, isbn: &str, update: UpdateBook) -> AppResult<Book> {
        let updated = self.repository.books_update(acting, isbn, update)?;
        tracing::info!(author = %acting, isbn, "Book updated");
        Ok(updated)
    }

    pub fn delete_book(&self, acting: &Identity, isbn: &str) -> AppResult<()> {
        self.repository.books_delete(acting, isbn)?;
        tracing::info!(author = %acting, isbn, "Book deleted");
        Ok(())
    }
}
