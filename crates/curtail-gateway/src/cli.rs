use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "CURTAIL_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "CURTAIL_PUBLIC_BASE_URL";
pub const STORE_BACKEND_ENV: &str = "CURTAIL_STORE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "CURTAIL_MYSQL_DSN";
pub const CACHE_BACKEND_ENV: &str = "CURTAIL_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "CURTAIL_REDIS_URL";
pub const STRATEGY_ENV: &str = "CURTAIL_CODE_STRATEGY";
pub const CODE_LENGTH_ENV: &str = "CURTAIL_RANDOM_CODE_LENGTH";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StoreBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackendArg::InMemory => write!(f, "in-memory"),
            StoreBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
    /// In-process L1 in front of Redis.
    #[value(name = "layered")]
    Layered,
    /// No cache; every resolution hits the store.
    #[value(name = "none")]
    Disabled,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::InMemory => write!(f, "in-memory"),
            CacheBackendArg::Redis => write!(f, "redis"),
            CacheBackendArg::Layered => write!(f, "layered"),
            CacheBackendArg::Disabled => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    #[value(name = "random")]
    Random,
    #[value(name = "slug")]
    Slug,
}

impl Display for StrategyArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyArg::Random => write!(f, "random"),
            StrategyArg::Slug => write!(f, "slug"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "curtail")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public base URL short links are advertised under.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORE_BACKEND_ENV,
        value_enum,
        default_value_t = StoreBackendArg::InMemory
    )]
    pub store: StoreBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("store", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::InMemory
    )]
    pub cache: CacheBackendArg,

    #[arg(
        long,
        env = REDIS_URL_ENV,
        required_if_eq_any([("cache", "redis"), ("cache", "layered")])
    )]
    pub redis_url: Option<String>,

    #[arg(
        long,
        env = STRATEGY_ENV,
        value_enum,
        default_value_t = StrategyArg::Random
    )]
    pub strategy: StrategyArg,

    /// Length of generated codes under the random strategy.
    #[arg(long, env = CODE_LENGTH_ENV, default_value_t = 6)]
    pub code_length: usize,
}
