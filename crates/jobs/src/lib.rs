//! Warden DNS Background Jobs
pub mod feed_sync;
pub mod retention;
pub mod runner;

pub use feed_sync::FeedSyncJob;
pub use retention::RetentionJob;
pub use runner::JobRunner;
