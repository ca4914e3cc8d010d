pub mod decision_cache;
pub mod feed_ingestor;
pub mod query_log;
pub mod threat_table;

pub use decision_cache::{domain_key, DecisionCache, DECISION_ALLOWED, DECISION_BLOCKED};
pub use feed_ingestor::{CycleSummary, FeedIngestor};
pub use query_log::QueryLogSink;
pub use threat_table::{ActiveThreat, ThreatTable};
