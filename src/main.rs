use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelrank_api::{
    config::Config,
    db::{self, CachedGenreStore, PgStore},
    routes::{create_router, AppState, Settings, Stores},
    services::OpenAiOracle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelrank_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to Postgres")?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    let store = Arc::new(PgStore::new(pool));

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_handle) = db::Cache::new(redis_client);

    let stores = Stores {
        movies: store.clone(),
        rankings: store.clone(),
        preferences: store.clone(),
        genres: Arc::new(CachedGenreStore::new(
            store,
            cache,
            config.genre_cache_ttl_secs,
        )),
    };

    let oracle = Arc::new(OpenAiOracle::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
    ));

    let state = AppState::new(stores, oracle, Settings::from(&config));
    let app = create_router(state, &config.origins());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, origins = ?config.origins(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
