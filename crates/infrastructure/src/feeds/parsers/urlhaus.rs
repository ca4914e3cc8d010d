use super::{url_host, ParseOutcome};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use warden_dns_domain::{FeedFormat, ThreatType};

const CONFIDENCE: f64 = 0.90;

#[derive(Deserialize)]
struct UrlhausFeed {
    #[serde(default)]
    urls: Vec<UrlhausRecord>,
}

#[derive(Deserialize)]
struct UrlhausRecord {
    #[serde(default)]
    url_status: String,
    #[serde(default)]
    threat: String,
    host: Option<String>,
    url: Option<String>,
}

/// URLhaus recent-URLs API. Only `online` entries are ingested; the threat
/// field decides malware vs phishing.
pub(super) fn parse(body: &[u8], source: &str, seen_at: DateTime<Utc>) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let feed: UrlhausFeed = match serde_json::from_slice(body) {
        Ok(feed) => feed,
        Err(_) => {
            outcome.skip();
            return outcome;
        }
    };

    for record in feed.urls {
        if record.url_status != "online" {
            outcome.skip();
            continue;
        }

        let domain = match record
            .host
            .as_deref()
            .or_else(|| record.url.as_deref().and_then(url_host))
        {
            Some(d) => d.to_string(),
            None => {
                outcome.skip();
                continue;
            }
        };

        let threat_type = if record.threat.contains("phish") {
            ThreatType::Phishing
        } else {
            ThreatType::Malware
        };

        let before = outcome.entries.len();
        if !outcome.push(
            FeedFormat::UrlhausJson,
            &domain,
            threat_type,
            CONFIDENCE,
            source,
            seen_at,
        ) {
            break;
        }
        if outcome.entries.len() > before {
            if let Some(url) = record.url {
                if let Some(entry) = outcome.entries.last_mut() {
                    entry
                        .metadata
                        .insert("url".to_string(), serde_json::Value::String(url));
                }
            }
        }
    }

    outcome
}
