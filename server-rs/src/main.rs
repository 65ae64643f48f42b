use std::net::SocketAddr;
use std::sync::Arc;

use game_store_api::cache::Cache;
use game_store_api::config::{Config, StoreBackend};
use game_store_api::services::location::{
    HttpGeocoder, LocationStamper, NoopGeocoder, ReverseGeocoder,
};
use game_store_api::store::{MemoryStore, PgStore, Store};
use game_store_api::{build_router, db, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .json()
        .init();

    let store: Arc<dyn Store> = match config.store {
        StoreBackend::Postgres => Arc::new(PgStore::new(db::create_pool(&config).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let cache = if config.redis.enabled {
        match Cache::connect(&config).await {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, listing cache disabled");
                Cache::disabled()
            }
        }
    } else {
        Cache::disabled()
    };

    let geocoder: Arc<dyn ReverseGeocoder> = match &config.geocoder.url {
        Some(url) => Arc::new(HttpGeocoder::new(url, config.geocoder.timeout)?),
        None => Arc::new(NoopGeocoder),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let poll_interval = config.connectivity.poll_interval;
    let state = AppState::new(store.clone(), cache, config, LocationStamper::new(geocoder));
    state.connectivity.spawn(store.clone(), poll_interval);

    tracing::info!(
        %addr,
        backend = store.backend(),
        cache = state.cache.is_enabled(),
        "Game Store API listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
