use super::wire;
use async_trait::async_trait;
use hickory_proto::op::{Message, Query, ResponseCode};
use hickory_proto::rr::Record;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};
use warden_dns_domain::DomainError;

/// Maximum UDP DNS response size with EDNS(0).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Answer from an upstream resolver, as consumed by the server.
#[derive(Debug, Clone)]
pub struct ForwardReply {
    pub rcode: ResponseCode,
    pub answers: Vec<Record>,
}

/// Seam between the server and the upstream pool, so end-to-end tests can
/// script upstream behavior.
#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    async fn forward(&self, question: &Query) -> Result<ForwardReply, DomainError>;
}

/// Sequential-failover UDP forwarder.
///
/// Upstreams are tried in configured order with a per-attempt timeout.
/// The first result with (`NoError` and at least one answer) wins; a
/// `NXDomain` is terminal and propagated as-is so a stale fallback never
/// masks a legitimate "does not exist". Any other outcome moves to the
/// next upstream.
pub struct UdpForwarder {
    upstreams: Vec<SocketAddr>,
    attempt_timeout: Duration,
}

impl UdpForwarder {
    pub fn new(upstreams: Vec<SocketAddr>, attempt_timeout: Duration) -> Self {
        Self {
            upstreams,
            attempt_timeout,
        }
    }

    async fn exchange(&self, server: SocketAddr, question: &Query) -> Result<Message, DomainError> {
        let (id, query_bytes) = wire::build_upstream_query(question)?;

        // Per-attempt ephemeral socket, closed on completion.
        let bind_addr: SocketAddr = if server.is_ipv4() {
            "0.0.0.0:0".parse().unwrap()
        } else {
            "[::]:0".parse().unwrap()
        };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::UpstreamError {
                server: server.to_string(),
                reason: format!("bind failed: {e}"),
            })?;

        tokio::time::timeout(self.attempt_timeout, socket.send_to(&query_bytes, server))
            .await
            .map_err(|_| DomainError::UpstreamError {
                server: server.to_string(),
                reason: "send timeout".to_string(),
            })?
            .map_err(|e| DomainError::UpstreamError {
                server: server.to_string(),
                reason: format!("send failed: {e}"),
            })?;

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (received, from_addr) =
            tokio::time::timeout(self.attempt_timeout, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| DomainError::UpstreamError {
                    server: server.to_string(),
                    reason: "response timeout".to_string(),
                })?
                .map_err(|e| DomainError::UpstreamError {
                    server: server.to_string(),
                    reason: format!("receive failed: {e}"),
                })?;

        if from_addr.ip() != server.ip() {
            warn!(
                expected = %server,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        let reply = wire::decode(&recv_buf[..received])?;
        if reply.id() != id {
            return Err(DomainError::UpstreamError {
                server: server.to_string(),
                reason: "response id mismatch".to_string(),
            });
        }
        Ok(reply)
    }
}

#[async_trait]
impl UpstreamForwarder for UdpForwarder {
    async fn forward(&self, question: &Query) -> Result<ForwardReply, DomainError> {
        for server in &self.upstreams {
            match self.exchange(*server, question).await {
                Ok(reply) => {
                    let rcode = reply.response_code();
                    if rcode == ResponseCode::NXDomain {
                        debug!(server = %server, "Upstream returned NXDOMAIN");
                        return Ok(ForwardReply {
                            rcode,
                            answers: Vec::new(),
                        });
                    }
                    if rcode == ResponseCode::NoError && !reply.answers().is_empty() {
                        return Ok(ForwardReply {
                            rcode,
                            answers: reply.answers().to_vec(),
                        });
                    }
                    debug!(
                        server = %server,
                        rcode = ?rcode,
                        answers = reply.answers().len(),
                        "Upstream gave no usable answer, trying next"
                    );
                }
                Err(e) => {
                    debug!(server = %server, error = %e, "Upstream attempt failed");
                }
            }
        }
        Err(DomainError::UpstreamsExhausted)
    }
}
