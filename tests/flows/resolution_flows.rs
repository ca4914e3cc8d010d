//! End-to-end request-path flows: real UDP server, real classifier and
//! forwarder, in-memory stores, scripted upstreams.

use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{RData, RecordType};
use std::net::Ipv4Addr;
use std::time::Duration;
use warden_dns_application::ports::{domain_key, DecisionCache, DECISION_ALLOWED, DECISION_BLOCKED};
use warden_dns_domain::{Decision, ThreatType};

#[path = "../common/mod.rs"]
mod common;
use common::{
    exchange, query_server, question, start_resolver, Behavior, MockUpstream, CLIENT_ID,
};

const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(300);

#[tokio::test]
async fn cached_block_answers_nxdomain_without_upstream() {
    let upstream = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(10, 0, 0, 1))).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;
    resolver
        .cache
        .set(
            &domain_key("ads.example"),
            DECISION_BLOCKED,
            Duration::from_secs(3600),
        )
        .await
        .unwrap();

    let response = query_server(resolver.addr, "ads.example.", RecordType::A).await;

    assert_eq!(response.id(), CLIENT_ID);
    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());
    assert_eq!(response.queries()[0].name().to_ascii(), "ads.example.");
    assert!(!response.authoritative());
    assert!(response.recursion_available());

    assert_eq!(upstream.query_count(), 0, "blocked query must not reach upstream");
    assert_eq!(resolver.metrics.blocked_total.get(), 1);
    assert_eq!(resolver.metrics.cache_hits.get(), 1);
    assert_eq!(resolver.metrics.queries_total.get(), 1);
}

#[tokio::test]
async fn table_block_with_parent_escalation_caches_the_subdomain() {
    let upstream = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(10, 0, 0, 1))).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;
    resolver.table.insert("doubleclick.net", ThreatType::Ads, 0.90);

    let response =
        query_server(resolver.addr, "tracker.cdn.doubleclick.net.", RecordType::A).await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());
    assert_eq!(upstream.query_count(), 0);

    // The queried subdomain, not the ancestor, now carries the verdict.
    assert_eq!(
        resolver
            .cache
            .get(&domain_key("tracker.cdn.doubleclick.net"))
            .await
            .unwrap()
            .as_deref(),
        Some(DECISION_BLOCKED)
    );
    assert_eq!(resolver.metrics.blocked_total.get(), 1);
}

#[tokio::test]
async fn allowed_query_returns_upstream_answer_and_caches_allow() {
    let upstream = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(93, 184, 216, 34))).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;

    let response = query_server(resolver.addr, "example.com.", RecordType::A).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 1);
    match response.answers()[0].data() {
        RData::A(a) => assert_eq!(a.0, Ipv4Addr::new(93, 184, 216, 34)),
        other => panic!("expected A record, got {other:?}"),
    }

    assert_eq!(resolver.metrics.allowed_total.get(), 1);
    assert_eq!(
        resolver
            .cache
            .get(&domain_key("example.com"))
            .await
            .unwrap()
            .as_deref(),
        Some(DECISION_ALLOWED)
    );
}

#[tokio::test]
async fn upstream_nxdomain_is_propagated() {
    let upstream = MockUpstream::spawn(Behavior::Nxdomain).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;

    let response = query_server(resolver.addr, "nosuch.example.", RecordType::A).await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());
    // An upstream NXDOMAIN is a successful resolution, not an error.
    assert_eq!(resolver.metrics.errors_total.get(), 0);
    assert_eq!(resolver.metrics.allowed_total.get(), 1);
}

#[tokio::test]
async fn empty_question_message_gets_empty_response_with_preserved_id() {
    let upstream = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(10, 0, 0, 1))).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;

    let mut request = Message::new(0x7777, MessageType::Query, OpCode::Query);
    request.set_recursion_desired(true);
    let response = exchange(resolver.addr, &request).await;

    assert_eq!(response.id(), 0x7777);
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert!(response.queries().is_empty());
    assert!(response.answers().is_empty());
    assert_eq!(upstream.query_count(), 0);
}

#[tokio::test]
async fn first_blocked_question_aborts_a_multi_question_message() {
    let upstream = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(10, 0, 0, 2))).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;
    resolver.table.insert("evil.example", ThreatType::Malware, 0.95);

    let mut request = Message::new(CLIENT_ID, MessageType::Query, OpCode::Query);
    request.set_recursion_desired(true);
    request.add_query(question("fine.example.", RecordType::A));
    request.add_query(question("evil.example.", RecordType::A));
    let response = exchange(resolver.addr, &request).await;

    // The first question was forwarded, but the blocked second question
    // aborts the loop and empties the answer section.
    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());
    assert_eq!(resolver.metrics.blocked_total.get(), 1);
}

#[tokio::test]
async fn query_records_reach_the_log_sink() {
    let upstream = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(10, 0, 0, 3))).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;
    resolver.table.insert("evil.example", ThreatType::Phishing, 0.95);

    query_server(resolver.addr, "example.com.", RecordType::A).await;
    query_server(resolver.addr, "evil.example.", RecordType::A).await;

    let records = resolver.query_log.records();
    assert_eq!(records.len(), 2);

    let allowed = &records[0];
    assert_eq!(allowed.domain.as_ref(), "example.com");
    assert_eq!(allowed.decision, Decision::Allowed);
    assert!(allowed.threat_type.is_none());

    let blocked = &records[1];
    assert_eq!(blocked.domain.as_ref(), "evil.example");
    assert_eq!(blocked.decision, Decision::Blocked);
    assert_eq!(blocked.threat_type.as_deref(), Some("phishing"));
    assert!(blocked.response_ms.is_some());
}

#[tokio::test]
async fn readiness_flips_on_shutdown() {
    let upstream = MockUpstream::spawn(Behavior::AnswerA(Ipv4Addr::new(10, 0, 0, 4))).await;
    let resolver = start_resolver(vec![upstream.addr], ATTEMPT_TIMEOUT).await;

    assert!(resolver.server.is_ready());
    resolver.server.shutdown(Duration::from_secs(5)).await;
    assert!(!resolver.server.is_ready());
}
