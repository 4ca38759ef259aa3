//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Catalog book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Caller-supplied, unique within the catalog
    pub isbn: String,
    #[serde(alias = "book_name")]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default, alias = "pub")]
    pub publisher: String,
    /// Identities attributed to the book, adding author always included
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Create book request (one element of an add-books batch)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBook {
    #[validate(
        length(min = 1, message = "ISBN is required"),
        custom(function = "super::not_blank")
    )]
    pub isbn: String,
    #[serde(alias = "book_name")]
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "super::not_blank")
    )]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default, alias = "pub")]
    pub publisher: String,
    /// Optional co-authors
    #[serde(default)]
    pub authors: Vec<String>,
}

impl NewBook {
    /// Build the stored record, attributing it to `identity`
    pub fn into_book(self, identity: &str) -> Book {
        let mut authors = self.authors;
        if !authors.iter().any(|a| a == identity) {
            authors.push(identity.to_string());
        }
        Book {
            isbn: self.isbn,
            title: self.title,
            genre: self.genre,
            publisher: self.publisher,
            authors,
        }
    }
}

/// Partial update request. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBook {
    #[serde(alias = "book_name")]
    pub title: Option<String>,
    pub genre: Option<String>,
    #[serde(alias = "pub")]
    pub publisher: Option<String>,
}

impl UpdateBook {
    pub fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(publisher) = self.publisher {
            book.publisher = publisher;
        }
    }
}
