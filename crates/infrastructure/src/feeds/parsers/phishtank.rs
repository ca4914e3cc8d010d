use super::{url_host, ParseOutcome};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use warden_dns_domain::{FeedFormat, ThreatType};

const CONFIDENCE: f64 = 0.95;

#[derive(Deserialize)]
struct PhishtankRecord {
    #[serde(default)]
    url: String,
    #[serde(default)]
    verified: String,
    #[serde(default)]
    online: String,
    target: Option<String>,
}

/// PhishTank verified-online JSON dump. Only rows that are both verified
/// and still online are ingested, which is what earns the catalog's
/// highest confidence.
pub(super) fn parse(body: &[u8], source: &str, seen_at: DateTime<Utc>) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let records: Vec<PhishtankRecord> = match serde_json::from_slice(body) {
        Ok(records) => records,
        Err(_) => {
            outcome.skip();
            return outcome;
        }
    };

    for record in records {
        if record.online != "yes" || record.verified != "yes" {
            outcome.skip();
            continue;
        }
        let domain = match url_host(&record.url) {
            Some(d) => d.to_string(),
            None => {
                outcome.skip();
                continue;
            }
        };
        let before = outcome.entries.len();
        if !outcome.push(
            FeedFormat::PhishtankJson,
            &domain,
            ThreatType::Phishing,
            CONFIDENCE,
            source,
            seen_at,
        ) {
            break;
        }
        if outcome.entries.len() > before {
            if let Some(target) = record.target {
                if let Some(entry) = outcome.entries.last_mut() {
                    entry
                        .metadata
                        .insert("target".to_string(), serde_json::Value::String(target));
                }
            }
        }
    }

    outcome
}
