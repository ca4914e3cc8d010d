//! Warden DNS Domain Layer
pub mod config;
pub mod errors;
pub mod feed;
pub mod query_log;
pub mod record_type;
pub mod threat;
pub mod validators;

pub use config::{Config, ConfigError, Environment};
pub use record_type::RecordType;
pub use errors::DomainError;
pub use feed::{FeedDescriptor, FeedFormat};
pub use query_log::{Decision, QueryRecord};
pub use threat::{TableStats, ThreatEntry, ThreatType};
