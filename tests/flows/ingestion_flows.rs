//! Feed ingestion cycles against stubbed HTTP endpoints: cross-feed
//! confidence merging, per-feed interval gating, idempotence.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use warden_dns_application::ports::{FeedIngestor, ThreatTable};
use warden_dns_domain::{FeedDescriptor, FeedFormat};
use warden_dns_infrastructure::feeds::FeedIngestionPipeline;

#[path = "../common/mod.rs"]
mod common;
use common::{spawn_http_stub, MemoryThreatTable};

const ADBLOCK_BODY: &str = "! test list\n||evil.example^\n||ads.example^\n";
const URLHAUS_BODY: &str = r#"{"query_status":"ok","urls":[
    {"url":"http://evil.example/drop.exe","url_status":"online","threat":"malware_download","host":"evil.example"}
]}"#;

async fn two_feed_pipeline(
    interval: Duration,
) -> (Arc<MemoryThreatTable>, FeedIngestionPipeline) {
    let adblock = spawn_http_stub(ADBLOCK_BODY).await;
    let urlhaus = spawn_http_stub(URLHAUS_BODY).await;

    let feeds = vec![
        FeedDescriptor::new(
            "easylist-test",
            &format!("http://{adblock}/list.txt"),
            FeedFormat::AdblockFilter,
            interval,
        ),
        FeedDescriptor::new(
            "urlhaus-test",
            &format!("http://{urlhaus}/v1/urls/recent/"),
            FeedFormat::UrlhausJson,
            interval,
        ),
    ];

    let table = Arc::new(MemoryThreatTable::new());
    let pipeline = FeedIngestionPipeline::new(Arc::clone(&table) as _, feeds).unwrap();
    (table, pipeline)
}

#[tokio::test]
async fn two_feeds_merge_to_the_maximum_confidence() {
    let (table, pipeline) = two_feed_pipeline(Duration::from_secs(3600)).await;

    let summary = pipeline.update_all(&CancellationToken::new()).await.unwrap();

    assert_eq!(summary.feeds_fetched, 2);
    assert_eq!(summary.entries_emitted, 3);
    assert_eq!(table.row_count(), 2);

    // evil.example came from the ad list at 0.80 and URLhaus at 0.90;
    // the merged row keeps the maximum.
    assert_eq!(table.confidence_of("evil.example"), Some(0.90));
    assert_eq!(table.confidence_of("ads.example"), Some(0.80));

    let active = table.lookup_active("evil.example").await.unwrap().unwrap();
    assert_eq!(active.confidence, 0.90);
}

#[tokio::test]
async fn second_cycle_within_interval_skips_every_feed() {
    let (table, pipeline) = two_feed_pipeline(Duration::from_secs(3600)).await;

    pipeline.update_all(&CancellationToken::new()).await.unwrap();
    let second = pipeline.update_all(&CancellationToken::new()).await.unwrap();

    assert_eq!(second.feeds_fetched, 0);
    assert_eq!(second.feeds_skipped, 2);
    assert_eq!(table.row_count(), 2);
}

#[tokio::test]
async fn repeated_cycles_never_lower_confidence_or_grow_rows() {
    // Zero interval: every cycle refetches.
    let (table, pipeline) = two_feed_pipeline(Duration::ZERO).await;

    pipeline.update_all(&CancellationToken::new()).await.unwrap();
    let rows_after_first = table.row_count();
    let confidence_after_first = table.confidence_of("evil.example");

    pipeline.update_all(&CancellationToken::new()).await.unwrap();

    assert_eq!(table.row_count(), rows_after_first);
    assert!(table.confidence_of("evil.example") >= confidence_after_first);
}

#[tokio::test]
async fn cancelled_cycle_stops_at_the_feed_boundary() {
    let (table, pipeline) = two_feed_pipeline(Duration::from_secs(3600)).await;

    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let summary = pipeline.update_all(&cancelled).await.unwrap();

    assert_eq!(summary.feeds_fetched, 0);
    assert_eq!(table.row_count(), 0);
}

#[tokio::test]
async fn unreachable_feed_is_skipped_without_failing_the_cycle() {
    // One live stub, one connection-refused port.
    let live = spawn_http_stub("||ads.example^\n").await;
    let feeds = vec![
        FeedDescriptor::new(
            "dead-feed",
            "http://127.0.0.1:1/list.txt",
            FeedFormat::AdblockFilter,
            Duration::from_secs(3600),
        ),
        FeedDescriptor::new(
            "live-feed",
            &format!("http://{live}/list.txt"),
            FeedFormat::AdblockFilter,
            Duration::from_secs(3600),
        ),
    ];
    let table = Arc::new(MemoryThreatTable::new());
    let pipeline = FeedIngestionPipeline::new(Arc::clone(&table) as _, feeds).unwrap();

    let summary = pipeline.update_all(&CancellationToken::new()).await.unwrap();

    assert_eq!(summary.feeds_failed, 1);
    assert_eq!(summary.feeds_fetched, 1);
    assert_eq!(table.row_count(), 1);
}
