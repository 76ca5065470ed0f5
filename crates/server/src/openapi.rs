use utoipa::OpenApi;
use utoipa::ToSchema;
use chrono::{DateTime, Utc};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(utoipa::ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub name: String,
    pub price: f64,
    pub billing_date: DateTime<Utc>,
    pub description: Option<String>,
}

#[derive(utoipa::ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateSubscriptionRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub billing_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::profile,
        crate::routes::users::update_profile,
        crate::routes::users::delete_account,
        crate::routes::subscriptions::create,
        crate::routes::subscriptions::list,
        crate::routes::subscriptions::get_one,
        crate::routes::subscriptions::update,
        crate::routes::subscriptions::remove,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            UpdateUserRequest,
            CreateSubscriptionRequest,
            UpdateSubscriptionRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
