pub mod parsers;
pub mod pipeline;

pub use parsers::{parse_feed, ParseOutcome};
pub use pipeline::FeedIngestionPipeline;
