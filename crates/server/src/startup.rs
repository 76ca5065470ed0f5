use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth::{AppState, AuthSettings};
use crate::routes;
use service::subscriptions::{repository::SeaOrmSubscriptionRepository, SubscriptionService};
use service::users::{repo::seaorm::SeaOrmUserRepository, service::AuthConfig, UserService};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolve the bind address: config first, SERVER_HOST/SERVER_PORT override
fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_or_env()?;

    // DB connection + schema
    let db = models::db::connect_with(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    // Services are constructed once and injected into the handlers
    let users = Arc::new(UserService::new(
        Arc::new(SeaOrmUserRepository { db: db.clone() }),
        AuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
            password_algorithm: "argon2".into(),
        },
    ));
    let subscriptions = Arc::new(SubscriptionService::new(Arc::new(SeaOrmSubscriptionRepository { db })));

    let state = AppState {
        users,
        subscriptions,
        auth: AuthSettings { jwt_secret: cfg.auth.jwt_secret.clone() },
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    // Bind and serve
    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, "starting subscription tracker api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
