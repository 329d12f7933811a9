use serde::{Deserialize, Serialize};

/// A search query split into its filters.
///
/// All filters are lower-cased. `text_terms` are sorted longest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub text_terms: Vec<String>,
    pub site_terms: Vec<String>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.text_terms.is_empty() && self.site_terms.is_empty()
    }
}

/// A search the user chose to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: String,
    pub query: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}
