use super::{url_host, ParseOutcome};
use chrono::{DateTime, Utc};
use warden_dns_domain::{FeedFormat, ThreatType};

const CONFIDENCE: f64 = 0.85;

/// OpenPhish text feed: one phishing URL per line.
pub(super) fn parse(body: &[u8], source: &str, seen_at: DateTime<Utc>) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let text = String::from_utf8_lossy(body);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match url_host(line) {
            Some(domain) => {
                let domain = domain.to_string();
                if !outcome.push(
                    FeedFormat::OpenphishText,
                    &domain,
                    ThreatType::Phishing,
                    CONFIDENCE,
                    source,
                    seen_at,
                ) {
                    break;
                }
            }
            None => outcome.skip(),
        }
    }

    outcome
}
