pub mod classify_query;
pub mod maintenance;
pub mod stats;

pub use classify_query::{ClassifyQueryUseCase, Verdict, CACHE_HIT_LABEL};
pub use maintenance::{PurgeReport, PurgeStaleDataUseCase};
pub use stats::GetTableStatsUseCase;
