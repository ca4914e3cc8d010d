use crate::record_type::RecordType;
use chrono::{DateTime, Utc};
use std::net::IpAddr;
use std::sync::Arc;

/// Outcome of handling one client query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Blocked,
    Error,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::Blocked => "blocked",
            Decision::Error => "error",
        }
    }
}

/// One resolved-query record for the append-only log.
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub timestamp: DateTime<Utc>,
    pub client_addr: IpAddr,
    pub domain: Arc<str>,
    pub qtype: RecordType,
    pub decision: Decision,
    /// The threat category that caused a block, or `"cached"` when the
    /// verdict came straight from the decision cache.
    pub threat_type: Option<Arc<str>>,
    pub response_ms: Option<u64>,
}
