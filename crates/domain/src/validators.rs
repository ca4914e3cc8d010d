//! Hostname validation and normalization.
//!
//! A valid domain is a dot-separated sequence of labels where each label is
//! 1-63 characters of `[a-zA-Z0-9-]`, does not start or end with a hyphen,
//! and the whole name is 1-255 bytes.

pub const MAX_DOMAIN_LENGTH: usize = 255;
const MAX_LABEL_LENGTH: usize = 63;

/// Lowercase a queried or feed-supplied name and strip a single trailing dot.
pub fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.strip_suffix('.').unwrap_or(raw);
    trimmed.to_ascii_lowercase()
}

/// Whether `domain` is a syntactically valid host name.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LENGTH {
        return false;
    }
    domain.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
        return false;
    }
    let bytes = label.as_bytes();
    if bytes[0] == b'-' || bytes[bytes.len() - 1] == b'-' {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'-')
}

/// Suffixes of `domain` obtained by dropping one leading label at a time.
///
/// `"ads.cdn.example.com"` yields `"cdn.example.com"`, `"example.com"`,
/// `"com"`. The full name itself is not yielded.
pub fn parent_suffixes(domain: &str) -> impl Iterator<Item = &str> {
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .map(|(i, _)| &domain[i + 1..])
        .filter(|s| !s.is_empty())
}
