//! Filter results.

use serde::{Deserialize, Serialize};

/// Names matching a filter query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterResults {
    /// The query as typed.
    pub query: String,
    /// Matching names, sorted.
    pub matches: Vec<String>,
}

impl FilterResults {
    /// Create new results.
    pub fn new(query: impl Into<String>, matches: Vec<String>) -> Self {
        Self {
            query: query.into(),
            matches,
        }
    }

    /// The suggestion to highlight: the first match.
    pub fn highlight(&self) -> Option<&str> {
        self.matches.first().map(String::as_str)
    }

    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }
}
