//! Upstream failover and exhaustion as seen from the client side.

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{RData, RecordType};
use std::net::Ipv4Addr;
use std::time::Duration;
use warden_dns_application::ports::{domain_key, DecisionCache, DECISION_BLOCKED};

#[path = "../common/mod.rs"]
mod common;
use common::{query_server, start_resolver, Behavior, MockUpstream};

const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(300);

#[tokio::test]
async fn dead_primary_fails_over_to_secondary() {
    let dead = MockUpstream::spawn(Behavior::Ignore).await;
    let live = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(203, 0, 113, 10))).await;
    let resolver = start_resolver(vec![dead.addr, live.addr], ATTEMPT_TIMEOUT).await;

    let response = query_server(resolver.addr, "example.com.", RecordType::A).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    match response.answers()[0].data() {
        RData::A(a) => assert_eq!(a.0, Ipv4Addr::new(203, 0, 113, 10)),
        other => panic!("expected A record, got {other:?}"),
    }
    assert_eq!(dead.query_count(), 1);
    assert_eq!(live.query_count(), 1);

    // The query as a whole succeeded: no error is counted, and the
    // recorded latency includes the wasted first attempt.
    assert_eq!(resolver.metrics.errors_total.get(), 0);
    assert_eq!(resolver.metrics.allowed_total.get(), 1);
    assert_eq!(resolver.metrics.response_time_seconds.get_sample_count(), 1);
    assert!(
        resolver.metrics.response_time_seconds.get_sample_sum()
            >= ATTEMPT_TIMEOUT.as_secs_f64()
    );
}

#[tokio::test]
async fn all_upstreams_failing_returns_servfail() {
    let dead1 = MockUpstream::spawn(Behavior::Ignore).await;
    let dead2 = MockUpstream::spawn(Behavior::Ignore).await;
    let resolver = start_resolver(vec![dead1.addr, dead2.addr], ATTEMPT_TIMEOUT).await;

    let response = query_server(resolver.addr, "example.com.", RecordType::A).await;

    assert_eq!(response.response_code(), ResponseCode::ServFail);
    assert!(response.answers().is_empty());
    assert_eq!(resolver.metrics.errors_total.get(), 1);
    assert_eq!(resolver.metrics.blocked_total.get(), 0);

    // A forwarding failure never poisons the cache with a block verdict.
    assert_ne!(
        resolver
            .cache
            .get(&domain_key("example.com"))
            .await
            .unwrap()
            .as_deref(),
        Some(DECISION_BLOCKED)
    );
}

#[tokio::test]
async fn blocked_verdict_still_served_while_upstreams_are_down() {
    let dead = MockUpstream::spawn(Behavior::Ignore).await;
    let resolver = start_resolver(vec![dead.addr], ATTEMPT_TIMEOUT).await;
    resolver
        .table
        .insert("evil.example", warden_dns_domain::ThreatType::Malware, 0.95);

    let response = query_server(resolver.addr, "evil.example.", RecordType::A).await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert_eq!(dead.query_count(), 0);
    assert_eq!(resolver.metrics.blocked_total.get(), 1);
}
