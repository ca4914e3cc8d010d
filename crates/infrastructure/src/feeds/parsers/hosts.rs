use super::ParseOutcome;
use chrono::{DateTime, Utc};
use warden_dns_domain::{FeedFormat, ThreatType};

const CONFIDENCE: f64 = 0.85;

const SINK_ADDRS: [&str; 4] = ["0.0.0.0", "127.0.0.1", "::", "::1"];

fn is_self_referential(domain: &str) -> bool {
    matches!(
        domain,
        "localhost"
            | "localhost.localdomain"
            | "local"
            | "broadcasthost"
            | "ip6-localhost"
            | "ip6-loopback"
            | "0.0.0.0"
    )
}

/// Hosts-file format: `IP<space>domain`, one per line. Trailing comments
/// after the domain are ignored by taking the second whitespace token.
pub(super) fn parse(body: &[u8], source: &str, seen_at: DateTime<Utc>) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    let text = String::from_utf8_lossy(body);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (addr, domain) = match (parts.next(), parts.next()) {
            (Some(addr), Some(domain)) => (addr, domain),
            _ => {
                outcome.skip();
                continue;
            }
        };

        if !SINK_ADDRS.contains(&addr) {
            outcome.skip();
            continue;
        }
        if is_self_referential(domain) {
            outcome.skip();
            continue;
        }

        if !outcome.push(
            FeedFormat::Hosts,
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
