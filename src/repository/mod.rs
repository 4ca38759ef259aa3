//! In-memory store for authors, credentials and books
//!
//! The three indices live behind one `RwLock`. Every operation that touches
//! more than one index holds the write guard for its whole duration, so a
//! reader never sees a book in the catalog without its owner (or the reverse).

pub mod authors;
pub mod books;
pub mod credentials;
pub mod keys;

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use validator::Validate;

use crate::{
    config::SeedConfig,
    error::{AppError, AppResult},
    models::{Author, AuthorWithBooks, Book, NewBook, UpdateBook},
};

use authors::AuthorRegistry;
use books::{book_not_found, BookCatalog};
use credentials::CredentialStore;
use keys::{normalize, Identity, NormalizedKey};

#[derive(Debug, Default)]
struct Store {
    credentials: CredentialStore,
    authors: AuthorRegistry,
    books: BookCatalog,
}

/// Shared handle to the store
#[derive(Clone, Default)]
pub struct Repository {
    store: Arc<RwLock<Store>>,
}

fn not_owner(isbn: &str) -> AppError {
    AppError::Authorization(format!("Book {} belongs to another author", isbn))
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the administrative author unless already present.
    /// Returns whether anything was inserted.
    pub fn seed_admin(&self, seed: &SeedConfig) -> AppResult<bool> {
        if self.store.read().credentials.contains(&seed.username) {
            return Ok(false);
        }

        let secret_hash = credentials::hash_secret(&seed.password)?;
        let admin = Author {
            name: seed.name.clone(),
            home: seed.home.clone(),
            age: seed.age.clone(),
            username: seed.username.clone(),
        };
        match self.register_author(admin, secret_hash) {
            Ok(_) => Ok(true),
            // seeded concurrently
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create the credential and the registry entry together
    pub fn register_author(&self, author: Author, secret_hash: String) -> AppResult<Identity> {
        let key = normalize(&author.username);
        let mut guard = self.store.write();
        let store = &mut *guard;

        if store.credentials.contains(&author.username) || store.authors.contains(&key) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        store.credentials.register(&author.username, secret_hash)?;
        store.authors.create(key.clone(), author)?;
        Ok(key)
    }

    /// Hash verification runs after the read guard is released
    pub fn verify_credentials(&self, username: &str, secret: &str) -> AppResult<Identity> {
        let (key, stored) = self.stored_credential(username);
        credentials::check_login(key, stored.as_deref(), secret)
    }

    fn stored_credential(&self, username: &str) -> (Identity, Option<String>) {
        let key = normalize(username);
        let stored = self.store.read().credentials.stored_hash(&key);
        (key, stored)
    }

    /// Number of registered authors and cataloged books
    pub fn counts(&self) -> (usize, usize) {
        let store = self.store.read();
        (store.authors.len(), store.books.len())
    }

    // ---- authors ----

    pub fn authors_list(&self) -> Vec<Author> {
        self.store.read().authors.list()
    }

    pub fn authors_get(&self, key: &NormalizedKey) -> AppResult<AuthorWithBooks> {
        let store = self.store.read();
        let entry = store
            .authors
            .lookup(key)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", key)))?;
        Ok(AuthorWithBooks {
            author: entry.author.clone(),
            books: store.books.resolve(&entry.books),
        })
    }

    /// Delete an author account. Only the author may delete themselves; their
    /// books and credential go with them. Returns the removed ISBNs.
    pub fn authors_delete(&self, acting: &Identity, key: &NormalizedKey) -> AppResult<Vec<String>> {
        let mut guard = self.store.write();
        let store = &mut *guard;

        if !store.authors.contains(key) {
            return Err(AppError::NotFound(format!("Author {} not found", key)));
        }
        if acting != key {
            return Err(AppError::Authorization(
                "Authors may only delete their own account".to_string(),
            ));
        }

        let entry = store.authors.delete(key)?;
        for isbn in &entry.books {
            store.books.remove(isbn)?;
        }
        store.credentials.remove(key);
        Ok(entry.books)
    }

    // ---- books ----

    pub fn books_list(&self) -> Vec<Book> {
        self.store.read().books.list()
    }

    pub fn books_get(&self, isbn: &str) -> AppResult<Book> {
        self.store
            .read()
            .books
            .get(isbn)
            .cloned()
            .ok_or_else(|| book_not_found(isbn))
    }

    /// Add a batch of books attributed to `acting`.
    ///
    /// The whole batch is checked before anything is written: an invalid book,
    /// an unknown author or an ISBN owned by someone else leaves both indices
    /// untouched. Duplicate ISBNs inside the batch resolve last-write-wins.
    pub fn books_add(&self, acting: &Identity, books: Vec<NewBook>) -> AppResult<Vec<Book>> {
        if books.is_empty() {
            return Err(AppError::Validation("At least one book is required".to_string()));
        }
        for book in &books {
            book.validate()?;
        }

        let mut guard = self.store.write();
        let store = &mut *guard;

        if !store.authors.contains(acting) {
            return Err(AppError::NotFound(format!("Author {} not found", acting)));
        }
        for book in &books {
            if store.books.contains(&book.isbn) && !store.authors.owns(acting, &book.isbn) {
                return Err(AppError::Conflict(format!(
                    "Book {} already exists and belongs to another author",
                    book.isbn
                )));
            }
        }

        let mut added: IndexMap<String, Book> = IndexMap::with_capacity(books.len());
        for new_book in books {
            let book = new_book.into_book(acting.as_str());
            store.authors.attribute_book(acting, &book)?;
            store.books.upsert(book.clone());
            added.insert(book.isbn.clone(), book);
        }
        Ok(added.into_values().collect())
    }

    /// Merge the supplied fields into a book owned by `acting`
    pub fn books_update(&self, acting: &Identity, isbn: &str, update: UpdateBook) -> AppResult<Book> {
        let mut guard = self.store.write();
        let store = &mut *guard;

        if !store.books.contains(isbn) {
            return Err(book_not_found(isbn));
        }
        if !store.authors.owns(acting, isbn) {
            return Err(not_owner(isbn));
        }

        let book = store.books.get_mut(isbn)?;
        update.apply_to(book);
        Ok(book.clone())
    }

    /// Remove a book owned by `acting` from the catalog and from the owned list
    pub fn books_delete(&self, acting: &Identity, isbn: &str) -> AppResult<()> {
        let mut guard = self.store.write();
        let store = &mut *guard;

        if !store.books.contains(isbn) {
            return Err(book_not_found(isbn));
        }
        if !store.authors.contains(acting) {
            return Err(AppError::NotFound(format!("Author {} not found", acting)));
        }
        if !store.authors.owns(acting, isbn) {
            return Err(not_owner(isbn));
        }

        store.authors.remove_book(acting, isbn)?;
        store.books.remove(isbn)?;
        Ok(())
    }
}
