use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use crate::errors::ApiError;
use service::subscriptions::{repository::SeaOrmSubscriptionRepository, SubscriptionService};
use service::users::{repo::seaorm::SeaOrmUserRepository, service::Claims, UserService};

pub type AppUserService = UserService<SeaOrmUserRepository>;
pub type AppSubscriptionService = SubscriptionService<SeaOrmSubscriptionRepository>;

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

/// Shared handler state; services are injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<AppUserService>,
    pub subscriptions: Arc<AppSubscriptionService>,
    pub auth: AuthSettings,
}

/// Verified request identity, attached by [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Middleware for the protected route group: verifies the bearer token and
/// attaches the resolved identity to the request extensions. Short-circuits
/// with 401 before any handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_owned();

    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header) = header else {
        tracing::warn!(path = %path, "missing Authorization header");
        return Err(ApiError::Unauthorized("missing bearer token".into()));
    };

    let prefix = "Bearer ";
    if !header.starts_with(prefix) {
        tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
        return Err(ApiError::Unauthorized("invalid authorization header".into()));
    }
    let token = &header[prefix.len()..];

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::warn!(path = %path, err = %e, "token validation failed");
        ApiError::Unauthorized("invalid or expired token".into())
    })?;

    let id = Uuid::parse_str(&data.claims.sub)
        .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?;
    req.extensions_mut().insert(CurrentUser { id, email: data.claims.email });

    Ok(next.run(req).await)
}
