use super::forwarder::UpstreamForwarder;
use super::wire;
use chrono::Utc;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::Record;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use warden_dns_application::ports::QueryLogSink;
use warden_dns_application::use_cases::{ClassifyQueryUseCase, Verdict};
use warden_dns_application::DnsMetrics;
use warden_dns_domain::validators::normalize_domain;
use warden_dns_domain::{Decision, QueryRecord, RecordType};

/// Large enough for any EDNS(0)-sized request.
const MAX_UDP_REQUEST_SIZE: usize = 4096;

/// The UDP DNS server.
///
/// Each inbound datagram is handed to its own handler task; handlers share
/// state only through the classifier's stores, the metrics registry and the
/// log sink. Shutdown stops accepting, then waits for in-flight handlers up
/// to a bounded deadline.
pub struct DnsServer {
    socket: UdpSocket,
    classifier: Arc<ClassifyQueryUseCase>,
    forwarder: Arc<dyn UpstreamForwarder>,
    query_log: Arc<dyn QueryLogSink>,
    metrics: Arc<DnsMetrics>,
    ready: AtomicBool,
    shutdown: CancellationToken,
    handlers: TaskTracker,
}

impl DnsServer {
    /// Bind the listener. Binding failure is the one fatal runtime error.
    pub async fn bind(
        addr: SocketAddr,
        classifier: Arc<ClassifyQueryUseCase>,
        forwarder: Arc<dyn UpstreamForwarder>,
        query_log: Arc<dyn QueryLogSink>,
        metrics: Arc<DnsMetrics>,
    ) -> Result<Arc<Self>, std::io::Error> {
        let socket = Self::tuned_socket(addr)?;
        let socket = UdpSocket::from_std(socket)?;
        info!(bind_address = %socket.local_addr()?, "DNS server listening");

        Ok(Arc::new(Self {
            socket,
            classifier,
            forwarder,
            query_log,
            metrics,
            ready: AtomicBool::new(true),
            shutdown: CancellationToken::new(),
            handlers: TaskTracker::new(),
        }))
    }

    /// socket2-built UDP socket with buffers sized for DNS burst traffic.
    /// The OS default of ~256KB drops datagrams under load.
    fn tuned_socket(addr: SocketAddr) -> Result<std::net::UdpSocket, std::io::Error> {
        let domain = if addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

        socket.set_reuse_address(true)?;
        #[cfg(unix)]
        socket.set_reuse_port(true)?;

        socket.set_recv_buffer_size(8 * 1024 * 1024)?;
        socket.set_send_buffer_size(4 * 1024 * 1024)?;

        socket.bind(&addr.into())?;
        socket.set_nonblocking(true)?;

        Ok(socket.into())
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    /// Readiness predicate consumed by the external health endpoint: true
    /// from socket bind until a shutdown request.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Accept loop. Runs until shutdown is requested.
    pub async fn run(self: Arc<Self>) {
        let mut buf = vec![0u8; MAX_UDP_REQUEST_SIZE];
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                received = self.socket.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => {
                        let packet = buf[..len].to_vec();
                        let server = Arc::clone(&self);
                        self.handlers.spawn(async move {
                            server.handle_packet(packet, peer).await;
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "UDP receive failed");
                    }
                }
            }
        }
        debug!("DNS accept loop stopped");
    }

    /// Stop accepting and drain in-flight handlers, abandoning whatever is
    /// left when the grace period runs out.
    pub async fn shutdown(&self, grace: Duration) {
        self.ready.store(false, Ordering::SeqCst);
        self.shutdown.cancel();
        self.handlers.close();
        match tokio::time::timeout(grace, self.handlers.wait()).await {
            Ok(()) => info!("All in-flight handlers drained"),
            Err(_) => warn!(
                grace_secs = grace.as_secs(),
                "Shutdown deadline exceeded, abandoning in-flight handlers"
            ),
        }
    }

    async fn handle_packet(&self, packet: Vec<u8>, peer: SocketAddr) {
        let started = Instant::now();

        let request = match wire::decode(&packet) {
            Ok(message) => message,
            Err(e) => {
                self.metrics.errors_total.inc();
                debug!(peer = %peer, error = %e, "Dropping undecodable datagram");
                return;
            }
        };

        if request.message_type() != MessageType::Query || request.op_code() != OpCode::Query {
            let mut response = wire::response_skeleton(&request);
            response.set_response_code(ResponseCode::NotImp);
            self.send(&response, peer).await;
            return;
        }

        self.metrics.queries_total.inc();

        let mut answers: Vec<Record> = Vec::new();
        let mut rcode = ResponseCode::NoError;
        let mut decision = Decision::Allowed;
        let mut threat: Option<Arc<str>> = None;

        // Questions are processed in order; the first blocked one aborts
        // the loop with an empty answer section.
        for question in request.queries() {
            let queried_name = question.name().to_ascii();
            self.metrics
                .observe_query_type(RecordType::from_code(u16::from(question.query_type())));

            match self.classifier.classify(&queried_name).await {
                Verdict::Block { threat_type } => {
                    answers.clear();
                    rcode = ResponseCode::NXDomain;
                    decision = Decision::Blocked;
                    threat = Some(threat_type);
                    break;
                }
                Verdict::Allow => match self.forwarder.forward(question).await {
                    Ok(reply) if reply.rcode == ResponseCode::NXDomain => {
                        rcode = ResponseCode::NXDomain;
                        break;
                    }
                    Ok(reply) => {
                        answers.extend(reply.answers);
                    }
                    Err(e) => {
                        warn!(domain = %queried_name, error = %e, "Forwarding failed");
                        answers.clear();
                        rcode = ResponseCode::ServFail;
                        decision = Decision::Error;
                        break;
                    }
                },
            }
        }

        // Accounting happens before the send so the observable state is
        // settled by the time the client reads the response.
        let elapsed = started.elapsed();
        self.metrics
            .response_time_seconds
            .observe(elapsed.as_secs_f64());
        match decision {
            Decision::Blocked => self.metrics.blocked_total.inc(),
            Decision::Allowed => self.metrics.allowed_total.inc(),
            Decision::Error => self.metrics.errors_total.inc(),
        }
        if let Some(question) = request.queries().first() {
            self.query_log.log(QueryRecord {
                timestamp: Utc::now(),
                client_addr: peer.ip(),
                domain: Arc::from(normalize_domain(&question.name().to_ascii()).as_str()),
                qtype: RecordType::from_code(u16::from(question.query_type())),
                decision,
                threat_type: threat,
                response_ms: Some(elapsed.as_millis() as u64),
            });
        }

        let mut response = wire::response_skeleton(&request);
        for record in answers {
            response.add_answer(record);
        }
        response.set_response_code(rcode);
        self.send(&response, peer).await;
    }

    async fn send(&self, response: &Message, peer: SocketAddr) {
        match wire::encode(response) {
            Ok(bytes) => {
                if let Err(e) = self.socket.send_to(&bytes, peer).await {
                    debug!(peer = %peer, error = %e, "Failed to send response");
                }
            }
            Err(e) => {
                warn!(peer = %peer, error = %e, "Failed to encode response");
            }
        }
    }
}
