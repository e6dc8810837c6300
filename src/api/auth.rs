//! Authentication and user administration endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateMemberRequest, LoginRequest, RegisterRequest, User},
};

use super::AuthenticatedUser;

/// Authentication response: the sanitized account plus a bearer token
#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, token) = state.services.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (user, token) = state.services.auth.login(payload).await?;
    Ok(Json(AuthResponse { user, token }))
}

/// Get the current account
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<User>> {
    let user = state.services.auth.get_profile(claims.sub).await?;
    Ok(Json(user))
}

/// List all accounts
#[utoipa::path(
    get,
    path = "/api/auth/users",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of accounts", body = Vec<User>),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.auth.list_users(&claims).await?;
    Ok(Json(users))
}

/// Create a member account, optionally with the ADMIN role
#[utoipa::path(
    post,
    path = "/api/auth/users",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 403, description = "Administrator privileges required"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_member(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<CreateMemberRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state
        .services
        .auth
        .create_member_as_admin(&claims, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
