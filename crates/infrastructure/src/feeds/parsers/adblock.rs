use super::ParseOutcome;
use chrono::{DateTime, Utc};
use warden_dns_domain::{FeedFormat, ThreatType};

const CONFIDENCE: f64 = 0.80;

/// Adblock filter lists. Only the plain domain-anchor rules (`||domain^`,
/// `||domain/`) map onto DNS blocking; element hiding and the rest of the
/// filter grammar are skipped.
pub(super) fn parse(body: &[u8], source: &str, seen_at: DateTime<Utc>) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let text = String::from_utf8_lossy(body);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('!') || line.starts_with('[') {
            continue;
        }

        let Some(rest) = line.strip_prefix("||") else {
            outcome.skip();
            continue;
        };
        let Some(end) = rest.find(['^', '/']) else {
            outcome.skip();
            continue;
        };
        let domain = &rest[..end];

        if !outcome.push(
            FeedFormat::AdblockFilter,
            domain,
            ThreatType::Ads,
            CONFIDENCE,
            source,
            seen_at,
        ) {
            break;
        }
    }

    outcome
}
