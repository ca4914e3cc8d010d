pub mod query_log;
pub mod threat_table;

pub use query_log::PgQueryLogSink;
pub use threat_table::PgThreatTable;
