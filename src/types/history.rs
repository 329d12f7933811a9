use serde::{Deserialize, Serialize};

/// A browsing-history entry as seen by callers of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Identifier of the backing leaf; empty for records not yet stored.
    pub id: String,
    pub url: String,
    pub title: String,
    /// Hostname parsed from `url`, empty when unparsable.
    pub domain: String,
    pub visit_count: u32,
    /// Epoch milliseconds.
    pub last_visit_time: i64,
}

impl HistoryRecord {
    /// Builds an unsaved record for ingestion.
    pub fn new(url: &str, title: &str, last_visit_time: i64, visit_count: u32) -> Self {
        Self {
            id: String::new(),
            url: url.to_string(),
            title: title.to_string(),
            domain: domain_of(url),
            visit_count,
            last_visit_time,
        }
    }
}

/// Returns the lower-cased hostname of `url`, or an empty string.
pub fn domain_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

/// Visit metadata embedded in a leaf title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitMetadata {
    /// Schema version.
    pub v: u32,
    /// Last visit time, epoch milliseconds.
    pub t: i64,
    /// Visit count.
    pub vc: u32,
}

/// Result of decoding a stored leaf title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTitle {
    pub clean_title: String,
    pub metadata: Option<VisitMetadata>,
}
