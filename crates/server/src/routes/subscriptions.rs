use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use service::subscriptions::domain::{NewSubscription, SubscriptionUpdate};

use crate::auth::{AppState, CurrentUser};
use crate::errors::ApiError;
use crate::response::success;

/// Ownership guard shared by the by-id handlers: load the record, 404 when
/// it does not exist, 403 when it belongs to someone else.
async fn load_owned(
    state: &AppState,
    id: Uuid,
    requester: &CurrentUser,
) -> Result<models::subscription::Model, ApiError> {
    let subscription = state
        .subscriptions
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("subscription not found".into()))?;
    if subscription.user_id != requester.id {
        return Err(ApiError::Forbidden("not authorized to access this subscription".into()));
    }
    Ok(subscription)
}

#[utoipa::path(post, path = "/api/v1/subscriptions", tag = "subscriptions",
    request_body = crate::openapi::CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(input): Json<NewSubscription>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Owner is always the authenticated caller, never a body field
    let subscription = state.subscriptions.create(current.id, input).await?;
    Ok((StatusCode::CREATED, success(json!({ "subscription": subscription }))))
}

#[utoipa::path(get, path = "/api/v1/subscriptions", tag = "subscriptions",
    responses(
        (status = 200, description = "Caller's subscriptions, ascending by billing date"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, ApiError> {
    let subscriptions = state.subscriptions.list_by_owner(current.id).await?;
    Ok(success(json!({ "subscriptions": subscriptions })))
}

#[utoipa::path(get, path = "/api/v1/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_one(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let subscription = load_owned(&state, id, &current).await?;
    Ok(success(json!({ "subscription": subscription })))
}

#[utoipa::path(put, path = "/api/v1/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    request_body = crate::openapi::UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(changes): Json<SubscriptionUpdate>,
) -> Result<Json<Value>, ApiError> {
    load_owned(&state, id, &current).await?;
    let subscription = state.subscriptions.update(id, changes).await?;
    Ok(success(json!({ "subscription": subscription })))
}

#[utoipa::path(delete, path = "/api/v1/subscriptions/{id}", tag = "subscriptions",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Not found")
    )
)]
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_owned(&state, id, &current).await?;
    if !state.subscriptions.delete(id).await? {
        return Err(ApiError::NotFound("subscription not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
