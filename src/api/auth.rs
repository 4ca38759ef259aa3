//! Authentication endpoints

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar, WithRejection,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Author, SignUp},
};

use super::{session_token, JWT_COOKIE};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a new author
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignUp,
    responses(
        (status = 201, description = "Author registered", body = Author),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn sign_up(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): WithRejection<Json<SignUp>, AppError>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.auth.sign_up(request)?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Authenticate and receive a session token (also set as the `jwt` cookie)
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let issued = state
        .services
        .auth
        .authenticate(&request.username, &request.password)?;

    let cookie = Cookie::build((JWT_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
        }),
    ))
}

/// Revoke the presented session token and clear the cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse)
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(token) = session_token(&headers) {
        // an already invalid token needs no revoking
        if let Err(e) = state.services.auth.revoke(&token) {
            tracing::debug!("Logout with unusable token: {}", e);
        }
    }

    (
        jar.remove(Cookie::build(JWT_COOKIE).path("/")),
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
}
