//! Warden DNS Infrastructure Layer
//!
//! Concrete implementations of the application ports: the Postgres threat
//! table and query log, the Redis (or in-process) decision cache, the UDP
//! wire path, and the feed ingestion pipeline.
pub mod cache;
pub mod database;
pub mod dns;
pub mod feeds;
pub mod repositories;
