use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// UDP bind address for the resolver. A bare `:port` binds all
    /// interfaces.
    #[serde(default = "default_dns_address")]
    pub dns_address: String,

    /// Bind address reserved for the external health/metrics collaborator.
    #[serde(default = "default_http_address")]
    pub http_address: String,
}

impl ServerConfig {
    pub fn dns_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_bind_address(&self.dns_address)
    }

    pub fn http_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        parse_bind_address(&self.http_address)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_address: default_dns_address(),
            http_address: default_http_address(),
        }
    }
}

fn default_dns_address() -> String {
    ":53".to_string()
}

fn default_http_address() -> String {
    ":8080".to_string()
}

/// Parse a bind address, accepting the bare `:port` shorthand for
/// all-interfaces.
pub fn parse_bind_address(address: &str) -> Result<SocketAddr, ConfigError> {
    let candidate = if address.starts_with(':') {
        format!("0.0.0.0{address}")
    } else {
        address.to_string()
    };
    candidate
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(address.to_string()))
}
