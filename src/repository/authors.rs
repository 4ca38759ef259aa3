//! Author registry: normalized key to author profile and owned ISBNs

use indexmap::IndexMap;

use super::keys::NormalizedKey;
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book},
};

/// Registry entry. Owned books are kept as ISBNs and resolved against the
/// catalog on read, so the two indices never hold diverging copies.
#[derive(Debug, Clone)]
pub struct AuthorEntry {
    pub author: Author,
    pub books: Vec<String>,
}

#[derive(Debug, Default)]
pub struct AuthorRegistry {
    entries: IndexMap<NormalizedKey, AuthorEntry>,
}

fn author_not_found(key: &NormalizedKey) -> AppError {
    AppError::NotFound(format!("Author {} not found", key))
}

impl AuthorRegistry {
    pub fn create(&mut self, key: NormalizedKey, author: Author) -> AppResult<()> {
        if self.entries.contains_key(&key) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        self.entries.insert(
            key,
            AuthorEntry {
                author,
                books: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn lookup(&self, key: &NormalizedKey) -> Option<&AuthorEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &NormalizedKey) -> bool {
        self.entries.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// All authors in sign-up order
    pub fn list(&self) -> Vec<Author> {
        self.entries.values().map(|e| e.author.clone()).collect()
    }

    pub fn owns(&self, key: &NormalizedKey, isbn: &str) -> bool {
        self.entries
            .get(key)
            .map(|e| e.books.iter().any(|b| b == isbn))
            .unwrap_or(false)
    }

    /// Append a book to the author's owned list. Re-attributing an owned book is a no-op.
    pub fn attribute_book(&mut self, key: &NormalizedKey, book: &Book) -> AppResult<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| author_not_found(key))?;
        if !entry.books.iter().any(|b| *b == book.isbn) {
            entry.books.push(book.isbn.clone());
        }
        Ok(())
    }

    /// Remove an ISBN from the owned list; absent ISBNs are not an error.
    pub fn remove_book(&mut self, key: &NormalizedKey, isbn: &str) -> AppResult<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| author_not_found(key))?;
        entry.books.retain(|b| b != isbn);
        Ok(())
    }

    pub fn delete(&mut self, key: &NormalizedKey) -> AppResult<AuthorEntry> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| author_not_found(key))
    }
}
