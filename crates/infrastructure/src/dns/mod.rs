pub mod forwarder;
pub mod server;
pub mod wire;

pub use forwarder::{ForwardReply, UdpForwarder, UpstreamForwarder};
pub use server::DnsServer;
