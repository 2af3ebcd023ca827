mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use crate::app::App;
use crate::cli::{CacheBackendArg, Cli, StoreBackendArg, StrategyArg};
use crate::state::AppState;
use anyhow::Context;
use clap::Parser;
use curtail_cache::{LayeredCache, MokaCache, NullCache, RedisCache};
use curtail_core::{LinkStore, ResolutionCache};
use curtail_generator::{RandomCode, SlugCode, Strategy};
use curtail_service::LinkService;
use curtail_storage::{InMemoryStore, MySqlStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        store = %config.store,
        cache = %config.cache,
        strategy = %config.strategy,
        "starting curtail gateway"
    );

    let store = build_store(&config).await?;
    let cache = build_cache(&config).await?;
    let strategy = build_strategy(&config);

    let service = LinkService::new(store, cache, strategy);
    let state = AppState::new(Arc::new(service), config.public_base_url.clone());

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");
    axum::serve(listener, App::router(state)).await?;

    Ok(())
}

async fn build_store(config: &Cli) -> anyhow::Result<Box<dyn LinkStore>> {
    match config.store {
        StoreBackendArg::InMemory => Ok(Box::new(InMemoryStore::new())),
        StoreBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when the store backend is mysql")?;
            let store = MySqlStore::connect(dsn).await?;
            store.migrate().await?;
            Ok(Box::new(store))
        }
    }
}

async fn build_cache(config: &Cli) -> anyhow::Result<Box<dyn ResolutionCache>> {
    match config.cache {
        CacheBackendArg::InMemory => Ok(Box::new(MokaCache::new())),
        CacheBackendArg::Disabled => Ok(Box::new(NullCache::new())),
        CacheBackendArg::Redis => Ok(Box::new(RedisCache::new(redis_conn(config).await?))),
        CacheBackendArg::Layered => Ok(Box::new(LayeredCache::new(
            MokaCache::new(),
            RedisCache::new(redis_conn(config).await?),
        ))),
    }
}

async fn redis_conn(config: &Cli) -> anyhow::Result<redis::aio::MultiplexedConnection> {
    let url = config
        .redis_url
        .as_deref()
        .context("redis url is required when the cache backend is redis or layered")?;
    let client = redis::Client::open(url)?;
    Ok(client.get_multiplexed_async_connection().await?)
}

fn build_strategy(config: &Cli) -> Strategy {
    match config.strategy {
        StrategyArg::Random => Strategy::Random(RandomCode::with_length(config.code_length)),
        StrategyArg::Slug => Strategy::Slug(SlugCode::new()),
    }
}
