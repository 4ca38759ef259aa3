//! Book catalog: ISBN to book record

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

#[derive(Debug, Default)]
pub struct BookCatalog {
    books: IndexMap<String, Book>,
}

pub(crate) fn book_not_found(isbn: &str) -> AppError {
    AppError::NotFound(format!("Book {} not found", isbn))
}

impl BookCatalog {
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.books.contains_key(isbn)
    }

    /// Insert or overwrite, keyed by the book's own ISBN. An overwritten
    /// entry keeps its position.
    pub fn upsert(&mut self, book: Book) -> Option<Book> {
        self.books.insert(book.isbn.clone(), book)
    }

    pub fn get_mut(&mut self, isbn: &str) -> AppResult<&mut Book> {
        self.books.get_mut(isbn).ok_or_else(|| book_not_found(isbn))
    }

    pub fn remove(&mut self, isbn: &str) -> AppResult<Book> {
        self.books.shift_remove(isbn).ok_or_else(|| book_not_found(isbn))
    }

    pub fn list(&self) -> Vec<Book> {
        self.books.values().cloned().collect()
    }

    /// Resolve an ordered ISBN list, skipping anything no longer cataloged
    pub fn resolve(&self, isbns: &[String]) -> Vec<Book> {
        isbns
            .iter()
            .filter_map(|isbn| self.books.get(isbn).cloned())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.books.len()
    }
}
