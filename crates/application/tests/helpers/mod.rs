pub mod mock_stores;

pub use mock_stores::{MockDecisionCache, MockQueryLogSink, MockThreatTable};
