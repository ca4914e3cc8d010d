use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use warden_dns_application::ports::QueryLogSink;
use warden_dns_application::DnsMetrics;
use warden_dns_domain::{DomainError, QueryRecord};

const CHANNEL_CAPACITY: usize = 10_000;
const MAX_BATCH_SIZE: usize = 500;
const FLUSH_INTERVAL_MS: u64 = 100;

/// Flattened row for the channel (owned data, Send-safe).
struct LogEntry {
    domain: String,
    query_type: String,
    response_type: &'static str,
    threat_type: Option<String>,
    client_ip: String,
    response_time_ms: Option<i64>,
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    fn from_record(record: &QueryRecord) -> Self {
        Self {
            domain: record.domain.to_string(),
            query_type: record.qtype.to_string(),
            response_type: record.decision.as_str(),
            threat_type: record.threat_type.as_ref().map(|t| t.to_string()),
            client_ip: record.client_addr.to_string(),
            response_time_ms: record.response_ms.map(|t| t as i64),
            timestamp: record.timestamp,
        }
    }
}

/// Postgres query-log sink.
///
/// The handler hands records to a bounded channel and never waits; a
/// background task flushes them in multi-row INSERT batches. When the
/// channel is saturated records are dropped and the drop is counted.
pub struct PgQueryLogSink {
    pool: PgPool,
    sender: mpsc::Sender<LogEntry>,
    metrics: Arc<DnsMetrics>,
}

impl PgQueryLogSink {
    pub fn new(pool: PgPool, metrics: Arc<DnsMetrics>) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);

        let flush_pool = pool.clone();
        tokio::spawn(async move {
            Self::flush_loop(flush_pool, receiver).await;
        });

        info!(
            channel_capacity = CHANNEL_CAPACITY,
            batch_size = MAX_BATCH_SIZE,
            flush_interval_ms = FLUSH_INTERVAL_MS,
            "Query log batching enabled"
        );

        Self {
            pool,
            sender,
            metrics,
        }
    }

    async fn flush_loop(pool: PgPool, mut receiver: mpsc::Receiver<LogEntry>) {
        let mut batch: Vec<LogEntry> = Vec::with_capacity(MAX_BATCH_SIZE);
        let mut flush_interval =
            tokio::time::interval(Duration::from_millis(FLUSH_INTERVAL_MS));

        loop {
            tokio::select! {
                maybe_entry = receiver.recv() => {
                    match maybe_entry {
                        Some(entry) => {
                            batch.push(entry);
                            while batch.len() < MAX_BATCH_SIZE {
                                match receiver.try_recv() {
                                    Ok(e) => batch.push(e),
                                    Err(_) => break,
                                }
                            }
                            if batch.len() >= MAX_BATCH_SIZE {
                                Self::flush_batch(&pool, &mut batch).await;
                            }
                        }
                        None => {
                            if !batch.is_empty() {
                                Self::flush_batch(&pool, &mut batch).await;
                            }
                            info!("Query log flush task shutting down");
                            return;
                        }
                    }
                }
                _ = flush_interval.tick() => {
                    if !batch.is_empty() {
                        Self::flush_batch(&pool, &mut batch).await;
                    }
                }
            }
        }
    }

    async fn flush_batch(pool: &PgPool, batch: &mut Vec<LogEntry>) {
        let count = batch.len();
        if count == 0 {
            return;
        }

        let mut sql = String::from(
            "INSERT INTO dns_logs \
             (domain, query_type, response_type, threat_type, client_ip, response_time_ms, timestamp) VALUES ",
        );
        for i in 0..count {
            if i > 0 {
                sql.push_str(", ");
            }
            let base = i * 7;
            sql.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
                base + 1,
                base + 2,
                base + 3,
                base + 4,
                base + 5,
                base + 6,
                base + 7
            ));
        }

        let mut query = sqlx::query(&sql);
        for entry in batch.iter() {
            query = query
                .bind(&entry.domain)
                .bind(&entry.query_type)
                .bind(entry.response_type)
                .bind(entry.threat_type.as_deref())
                .bind(&entry.client_ip)
                .bind(entry.response_time_ms)
                .bind(entry.timestamp);
        }

        match query.execute(pool).await {
            Ok(_) => debug!(count, "Query log batch flushed"),
            Err(e) => error!(error = %e, count, "Failed to flush query log batch"),
        }

        batch.clear();
    }
}

#[async_trait]
impl QueryLogSink for PgQueryLogSink {
    fn log(&self, record: QueryRecord) {
        let entry = LogEntry::from_record(&record);
        match self.sender.try_send(entry) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.metrics.log_dropped_total.inc();
                debug!(domain = %record.domain, "Query log channel full, dropping record");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Query log channel closed");
            }
        }
    }

    async fn cleanup(&self, max_age: Duration) -> Result<u64, DomainError> {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(max_age)
                .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        let result = sqlx::query("DELETE FROM dns_logs WHERE timestamp < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
