use super::ParseOutcome;
use chrono::{DateTime, Utc};
use warden_dns_domain::{FeedFormat, ThreatType};

const CONFIDENCE: f64 = 0.85;

/// Plain domain list: one domain per line, `#` comments.
pub(super) fn parse(body: &[u8], source: &str, seen_at: DateTime<Utc>) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let text = String::from_utf8_lossy(body);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !outcome.push(
            FeedFormat::PlainDomains,
            line,
            ThreatType::Malware,
            CONFIDENCE,
            source,
            seen_at,
        ) {
            break;
        }
    }

    outcome
}
