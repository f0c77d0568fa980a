//! Storefront - catalog, cart and back-office API

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use storefront::api::{self, AppState, AuthKeys};
use storefront::config::Config;
use storefront::repository::{
    MemoryAdminRepository, MemoryCartRepository, MemoryContentRepository, MemoryProductRepository, PgAdminRepository, PgCartRepository,
    PgContentRepository, PgProductRepository,
};
use storefront::services::EventPublisher;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => { tracing::warn!(error = %e, "NATS unavailable, events disabled"); None }
        },
        None => None,
    };

    let state = match &config.database_url {
        Some(url) => {
            let db = PgPoolOptions::new().max_connections(config.db_max_connections).connect(url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            AppState {
                products: Arc::new(PgProductRepository::new(db.clone())),
                carts: Arc::new(PgCartRepository::new(db.clone())),
                content: Arc::new(PgContentRepository::new(db.clone())),
                admins: Arc::new(PgAdminRepository::new(db)),
                events: EventPublisher::new(nats), auth: AuthKeys::from_secret(&config.jwt_secret), page_size: config.page_size,
            }
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            AppState {
                products: Arc::new(MemoryProductRepository::new()),
                carts: Arc::new(MemoryCartRepository::new()),
                content: Arc::new(MemoryContentRepository::new()),
                admins: Arc::new(MemoryAdminRepository::new()),
                events: EventPublisher::new(nats), auth: AuthKeys::from_secret(&config.jwt_secret), page_size: config.page_size,
            }
        }
    };

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(listener, app).with_graceful_shutdown(async { tokio::signal::ctrl_c().await.ok(); }).await?;
    Ok(())
}
