//! Warden DNS Application Layer
//!
//! Ports (the seams between the resolver core and its collaborators) and
//! the use cases that orchestrate them. Implementations live in the
//! infrastructure layer and are injected at composition time.
pub mod metrics;
pub mod ports;
pub mod use_cases;

pub use metrics::DnsMetrics;
