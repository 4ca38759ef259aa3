//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Author, AuthorWithBooks},
};

use super::AuthenticatedUser;

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(State(state): State<crate::AppState>) -> Json<Vec<Author>> {
    Json(state.services.authors.list_authors())
}

/// Get an author and the books they own
#[utoipa::path(
    get,
    path = "/authors/{username}",
    tag = "authors",
    params(
        ("username" = String, Path, description = "Username (case and spaces ignored)")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorWithBooks),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<AuthorWithBooks>> {
    let author = state.services.authors.get_author(&username)?;
    Ok(Json(author))
}

/// Delete your own author account and every book you own
#[utoipa::path(
    delete,
    path = "/authors/{username}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    state
        .services
        .authors
        .delete_author(&user.identity, &username)?;

    // the username may be taken again, so no old session may outlive the account
    state.services.auth.revoke_author(&user.identity);
    Ok(StatusCode::NO_CONTENT)
}
