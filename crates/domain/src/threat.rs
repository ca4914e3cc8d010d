use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Minimum confidence for a threat row to produce a block verdict.
pub const BLOCK_CONFIDENCE_THRESHOLD: f64 = 0.70;

/// Rows whose `updated_at` is older than this behave as absent for
/// classification (but remain stored until the retention sweep).
pub const FRESHNESS_WINDOW_DAYS: i64 = 30;

/// The instant before which a threat row is considered stale.
///
/// Freshness is a strict inequality: a row updated exactly at the cutoff is
/// stale.
pub fn freshness_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(FRESHNESS_WINDOW_DAYS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatType {
    Malware,
    Phishing,
    Ads,
    Spam,
    Botnet,
}

impl ThreatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatType::Malware => "malware",
            ThreatType::Phishing => "phishing",
            ThreatType::Ads => "ads",
            ThreatType::Spam => "spam",
            ThreatType::Botnet => "botnet",
        }
    }
}

impl fmt::Display for ThreatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "malware" => Ok(ThreatType::Malware),
            "phishing" => Ok(ThreatType::Phishing),
            "ads" => Ok(ThreatType::Ads),
            "spam" => Ok(ThreatType::Spam),
            "botnet" => Ok(ThreatType::Botnet),
            other => Err(format!("unknown threat type: {other}")),
        }
    }
}

/// A normalized assertion that `domain` belongs to a threat category,
/// attributed to the feed that reported it.
#[derive(Debug, Clone)]
pub struct ThreatEntry {
    /// Lowercased, validated host name.
    pub domain: Arc<str>,
    pub threat_type: ThreatType,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Short identifier of the originating feed.
    pub source: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub active: bool,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl ThreatEntry {
    pub fn new(
        domain: impl Into<Arc<str>>,
        threat_type: ThreatType,
        confidence: f64,
        source: impl Into<String>,
        seen_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: domain.into(),
            threat_type,
            confidence,
            source: source.into(),
            first_seen: seen_at,
            last_seen: seen_at,
            active: true,
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Merge a second sighting of the same domain into this entry.
    ///
    /// Keeps the maximum confidence, the earliest first_seen, the latest
    /// last_seen, and the latest non-empty source/threat_type.
    pub fn merge_from(&mut self, other: &ThreatEntry) {
        debug_assert_eq!(self.domain, other.domain);
        self.confidence = self.confidence.max(other.confidence);
        self.first_seen = self.first_seen.min(other.first_seen);
        if other.last_seen >= self.last_seen {
            self.last_seen = other.last_seen;
            self.threat_type = other.threat_type;
            if !other.source.is_empty() {
                self.source = other.source.clone();
            }
        }
        self.active = self.active || other.active;
        for (k, v) in &other.metadata {
            self.metadata.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }
}

/// Aggregate counts over the threat table.
#[derive(Debug, Clone, Default)]
pub struct TableStats {
    pub total: u64,
    pub by_type: HashMap<ThreatType, u64>,
    pub recent_24h: u64,
    /// Top sources by row count, largest first, at most 10.
    pub by_source: Vec<(String, u64)>,
}
