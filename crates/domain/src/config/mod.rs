//! Configuration for Warden DNS
//!
//! All configuration is sourced from the environment (the deployment
//! surface is containers and routers, where env vars are the lingua
//! franca). Structures are organized by concern:
//! - `root`: top-level `Config` and the env loader
//! - `server`: bind addresses
//! - `dns`: upstream resolvers and timeouts
//! - `database`: threat-table backing store
//! - `cache`: response-cache backing store and decision TTLs
//! - `limits`: reserved rate-limit knobs
//! - `logging`: level and output format
//! - `errors`: configuration errors

pub mod cache;
pub mod database;
pub mod dns;
pub mod errors;
pub mod limits;
pub mod logging;
pub mod root;
pub mod server;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use limits::LimitsConfig;
pub use logging::{Environment, LoggingConfig};
pub use root::Config;
pub use server::ServerConfig;
