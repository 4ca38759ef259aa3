//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod session;

use std::borrow::Cow;
use validator::ValidationError;

// Re-export commonly used types
pub use author::{Author, AuthorWithBooks, SignUp};
pub use book::{Book, NewBook, UpdateBook};
pub use session::SessionClaims;

/// Rejects values made only of spaces, which would otherwise pass a length check
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::from("must not be blank"));
        return Err(error);
    }
    Ok(())
}
