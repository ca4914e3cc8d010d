use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The closed set of external feed formats the ingestion pipeline
/// understands. Parser dispatch is by this tag, not by content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFormat {
    UrlhausJson,
    OpenphishText,
    PhishtankJson,
    Hosts,
    AdblockFilter,
    PlainDomains,
}

impl FeedFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedFormat::UrlhausJson => "urlhaus_json",
            FeedFormat::OpenphishText => "openphish_text",
            FeedFormat::PhishtankJson => "phishtank_json",
            FeedFormat::Hosts => "hosts",
            FeedFormat::AdblockFilter => "adblock_filter",
            FeedFormat::PlainDomains => "plain_domains",
        }
    }

    /// Ad lists run an order of magnitude larger than the threat feeds, so
    /// they get a more generous fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        match self {
            FeedFormat::Hosts | FeedFormat::AdblockFilter => Duration::from_secs(60),
            _ => Duration::from_secs(30),
        }
    }

    /// Per-feed row cap bounding memory for a single ingestion cycle.
    /// Parsing stops once the cap is reached.
    pub fn row_cap(&self) -> Option<usize> {
        match self {
            FeedFormat::Hosts => Some(50_000),
            FeedFormat::AdblockFilter => Some(30_000),
            _ => None,
        }
    }
}

/// A configured external threat or ad-block feed.
#[derive(Debug, Clone)]
pub struct FeedDescriptor {
    /// Short identifier; also recorded as the `source` of every entry the
    /// feed produces.
    pub name: String,
    pub source_url: String,
    pub format: FeedFormat,
    pub update_interval: Duration,
    /// Mutated only by the ingestion loop.
    pub last_updated: Option<DateTime<Utc>>,
    pub enabled: bool,
}

impl FeedDescriptor {
    pub fn new(
        name: &str,
        source_url: &str,
        format: FeedFormat,
        update_interval: Duration,
    ) -> Self {
        Self {
            name: name.to_string(),
            source_url: source_url.to_string(),
            format,
            update_interval,
            last_updated: None,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this feed is due for a fetch at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_updated {
            None => true,
            Some(last) => {
                let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
                elapsed >= self.update_interval
            }
        }
    }
}

const HOUR: Duration = Duration::from_secs(3600);
const DAY: Duration = Duration::from_secs(86_400);

/// The built-in feed catalog.
///
/// PhishTank ships disabled: its endpoint requires a registered API key.
pub fn default_catalog() -> Vec<FeedDescriptor> {
    vec![
        FeedDescriptor::new(
            "urlhaus",
            "https://urlhaus-api.abuse.ch/v1/urls/recent/",
            FeedFormat::UrlhausJson,
            Duration::from_secs(300),
        ),
        FeedDescriptor::new(
            "openphish",
            "https://openphish.com/feed.txt",
            FeedFormat::OpenphishText,
            HOUR,
        ),
        FeedDescriptor::new(
            "phishtank",
            "https://data.phishtank.com/data/online-valid.json",
            FeedFormat::PhishtankJson,
            HOUR,
        )
        .disabled(),
        FeedDescriptor::new(
            "easylist",
            "https://easylist.to/easylist/easylist.txt",
            FeedFormat::AdblockFilter,
            DAY,
        ),
        FeedDescriptor::new(
            "easyprivacy",
            "https://easylist.to/easylist/easyprivacy.txt",
            FeedFormat::AdblockFilter,
            DAY,
        ),
        FeedDescriptor::new(
            "adguard-base",
            "https://raw.githubusercontent.com/AdguardTeam/AdguardFilters/master/BaseFilter/sections/adservers.txt",
            FeedFormat::AdblockFilter,
            DAY,
        ),
        FeedDescriptor::new(
            "stevenblack-hosts",
            "https://raw.githubusercontent.com/StevenBlack/hosts/master/hosts",
            FeedFormat::Hosts,
            DAY,
        ),
        FeedDescriptor::new(
            "peter-lowe",
            "https://pgl.yoyo.org/adservers/serverlist.php?hostformat=hosts&showintro=0&mimetype=plaintext",
            FeedFormat::Hosts,
            DAY,
        ),
        FeedDescriptor::new(
            "dan-pollock",
            "https://someonewhocares.org/hosts/hosts",
            FeedFormat::Hosts,
            DAY,
        ),
    ]
}
