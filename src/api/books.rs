//! Book (catalog) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBook, UpdateBook},
};

use super::AuthenticatedUser;

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> Json<Vec<Book>> {
    Json(state.services.catalog.list_books())
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(&isbn)?;
    Ok(Json(book))
}

/// Add books attributed to the authenticated author
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = Vec<NewBook>,
    responses(
        (status = 201, description = "Books added", body = Vec<Book>),
        (status = 400, description = "Invalid book data"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "ISBN owned by another author")
    )
)]
pub async fn add_books(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(books), _): WithRejection<Json<Vec<NewBook>>, AppError>,
) -> AppResult<(StatusCode, Json<Vec<Book>>)> {
    let added = state.services.catalog.add_books(&user.identity, books)?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// Update some fields of a book you own
#[utoipa::path(
    patch,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(isbn): Path<String>,
    WithRejection(Json(update), _): WithRejection<Json<UpdateBook>, AppError>,
) -> AppResult<Json<Book>> {
    let updated = state
        .services
        .catalog
        .update_book(&user.identity, &isbn, update)?;
    Ok(Json(updated))
}

/// Delete a book you own
#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Book or author not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(isbn): Path<String>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(&user.identity, &isbn)?;
    Ok(StatusCode::NO_CONTENT)
}
