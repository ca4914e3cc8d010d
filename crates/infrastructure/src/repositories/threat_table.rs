use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{debug, warn};
use warden_dns_application::ports::{ActiveThreat, ThreatTable};
use warden_dns_domain::threat::freshness_cutoff;
use warden_dns_domain::validators::is_valid_domain;
use warden_dns_domain::{DomainError, TableStats, ThreatEntry, ThreatType};

/// Rows per INSERT statement. Eight binds per row keeps a full chunk well
/// under the Postgres bind limit.
const UPSERT_CHUNK_SIZE: usize = 500;

/// Postgres-backed threat table.
///
/// Reads filter by freshness so aged rows quietly fall out of the blocklist
/// without a synchronous deletion pass; the retention job deletes them
/// later. Writes merge per-domain: maximum confidence, latest sighting,
/// latest non-empty source and category.
pub struct PgThreatTable {
    pool: PgPool,
    lookup_timeout: Duration,
}

impl PgThreatTable {
    pub fn new(pool: PgPool, lookup_timeout: Duration) -> Self {
        Self {
            pool,
            lookup_timeout,
        }
    }

    fn upsert_sql(rows: usize) -> String {
        let mut sql = String::from(
            "INSERT INTO threat_domains \
             (domain, threat_type, confidence_score, source, first_seen, last_seen, is_active, metadata) VALUES ",
        );
        for i in 0..rows {
            if i > 0 {
                sql.push_str(", ");
            }
            let base = i * 8;
            sql.push_str(&format!(
                "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
                base + 1,
                base + 2,
                base + 3,
                base + 4,
                base + 5,
                base + 6,
                base + 7,
                base + 8
            ));
        }
        sql.push_str(
            " ON CONFLICT (domain) DO UPDATE SET \
             confidence_score = GREATEST(threat_domains.confidence_score, EXCLUDED.confidence_score), \
             threat_type = COALESCE(NULLIF(EXCLUDED.threat_type, ''), threat_domains.threat_type), \
             source = COALESCE(NULLIF(EXCLUDED.source, ''), threat_domains.source), \
             first_seen = LEAST(threat_domains.first_seen, EXCLUDED.first_seen), \
             last_seen = GREATEST(threat_domains.last_seen, EXCLUDED.last_seen), \
             is_active = TRUE, \
             metadata = threat_domains.metadata || EXCLUDED.metadata, \
             updated_at = NOW()",
        );
        sql
    }
}

/// Bring a stored confidence into `[0, 1]`. Early schema revisions stored
/// integer percentages.
fn normalize_confidence(raw: f64) -> f64 {
    if raw > 1.0 {
        (raw / 100.0).clamp(0.0, 1.0)
    } else {
        raw.clamp(0.0, 1.0)
    }
}

#[async_trait]
impl ThreatTable for PgThreatTable {
    async fn lookup_active(&self, domain: &str) -> Result<Option<ActiveThreat>, DomainError> {
        let cutoff = freshness_cutoff(Utc::now());
        let query = sqlx::query(
            "SELECT threat_type, confidence_score FROM threat_domains \
             WHERE domain = $1 AND is_active AND updated_at > $2 \
             ORDER BY confidence_score DESC LIMIT 1",
        )
        .bind(domain)
        .bind(cutoff)
        .fetch_optional(&self.pool);

        let row = tokio::time::timeout(self.lookup_timeout, query)
            .await
            .map_err(|_| DomainError::QueryTimeout)?
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(row.and_then(|row| {
            let threat_type: String = row.get("threat_type");
            let threat_type = threat_type.parse::<ThreatType>().ok()?;
            let confidence = normalize_confidence(row.get::<f64, _>("confidence_score"));
            Some(ActiveThreat {
                threat_type,
                confidence,
            })
        }))
    }

    async fn bulk_upsert(&self, entries: &[ThreatEntry]) -> Result<u64, DomainError> {
        let valid: Vec<&ThreatEntry> = entries
            .iter()
            .filter(|entry| {
                let ok = is_valid_domain(&entry.domain);
                if !ok {
                    warn!(domain = %entry.domain, source = %entry.source, "Skipping invalid domain in upsert batch");
                }
                ok
            })
            .collect();

        let mut written = 0u64;
        for chunk in valid.chunks(UPSERT_CHUNK_SIZE) {
            let sql = Self::upsert_sql(chunk.len());
            let mut query = sqlx::query(&sql);
            for entry in chunk {
                query = query
                    .bind(entry.domain.as_ref())
                    .bind(entry.threat_type.as_str())
                    .bind(entry.confidence.clamp(0.0, 1.0))
                    .bind(&entry.source)
                    .bind(entry.first_seen)
                    .bind(entry.last_seen)
                    .bind(entry.active)
                    .bind(serde_json::Value::Object(entry.metadata.clone()));
            }
            match query.execute(&self.pool).await {
                Ok(result) => written += result.rows_affected(),
                Err(e) => {
                    // A lost chunk is re-fetched next cycle; the batch as a
                    // whole never fails.
                    warn!(error = %e, rows = chunk.len(), "Upsert chunk failed, skipping");
                }
            }
        }

        debug!(written, batch = entries.len(), "Threat batch upserted");
        Ok(written)
    }

    async fn stats(&self) -> Result<TableStats, DomainError> {
        let recent_cutoff = Utc::now() - ChronoDuration::hours(24);

        let totals = sqlx::query(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE updated_at > $1) AS recent_24h \
             FROM threat_domains WHERE is_active",
        )
        .bind(recent_cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let mut stats = TableStats {
            total: totals.get::<i64, _>("total") as u64,
            recent_24h: totals.get::<i64, _>("recent_24h") as u64,
            ..TableStats::default()
        };

        let type_rows = sqlx::query(
            "SELECT threat_type, COUNT(*) AS count FROM threat_domains \
             WHERE is_active GROUP BY threat_type",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        for row in type_rows {
            let name: String = row.get("threat_type");
            if let Ok(threat_type) = name.parse::<ThreatType>() {
                stats
                    .by_type
                    .insert(threat_type, row.get::<i64, _>("count") as u64);
            }
        }

        let source_rows = sqlx::query(
            "SELECT source, COUNT(*) AS count FROM threat_domains \
             WHERE is_active GROUP BY source ORDER BY count DESC LIMIT 10",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        stats.by_source = source_rows
            .into_iter()
            .map(|row| (row.get("source"), row.get::<i64, _>("count") as u64))
            .collect();

        Ok(stats)
    }

    async fn cleanup(&self, max_age: Duration) -> Result<u64, DomainError> {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(max_age)
                .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        let result = sqlx::query("DELETE FROM threat_domains WHERE updated_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
