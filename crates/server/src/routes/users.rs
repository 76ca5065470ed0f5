use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use service::users::domain::{LoginInput, RegisterInput, UpdateUserInput};

use crate::auth::{AppState, CurrentUser};
use crate::errors::ApiError;
use crate::response::success;

#[utoipa::path(post, path = "/api/v1/users/register", tag = "users",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "Validation error or email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let session = state.users.register(input).await?;
    Ok((
        StatusCode::CREATED,
        success(json!({ "user": session.user, "token": session.token })),
    ))
}

#[utoipa::path(post, path = "/api/v1/users/login", tag = "users",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>, ApiError> {
    let session = state.users.login(input).await?;
    Ok(success(json!({ "user": session.user, "token": session.token })))
}

#[utoipa::path(get, path = "/api/v1/users/me", tag = "users",
    responses(
        (status = 200, description = "Current profile"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .users
        .profile(current.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(success(json!({ "user": user })))
}

#[utoipa::path(put, path = "/api/v1/users/me", tag = "users",
    request_body = crate::openapi::UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 400, description = "Validation error or email already in use"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<Value>, ApiError> {
    let user = state.users.update_profile(current.id, input).await?;
    Ok(success(json!({ "user": user })))
}

#[utoipa::path(delete, path = "/api/v1/users/me", tag = "users",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    state.users.delete_account(current.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
