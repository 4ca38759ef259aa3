//! Author model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;

/// Public author profile. The secret lives only in the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    /// Display name, not unique
    pub name: String,
    pub home: String,
    pub age: String,
    /// Login identity, unique after normalization
    pub username: String,
}

/// Author together with the books they own
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<Book>,
}

/// Sign-up request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUp {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Home is required"))]
    pub home: String,
    #[validate(length(min = 1, message = "Age is required"))]
    pub age: String,
    #[validate(
        length(min = 1, message = "Username is required"),
        custom(function = "super::not_blank")
    )]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl SignUp {
    /// Split the request into the public profile and the secret
    pub fn into_parts(self) -> (Author, String) {
        (
            Author {
                name: self.name,
                home: self.home,
                age: self.age,
                username: self.username,
            },
            self.password,
        )
    }
}
