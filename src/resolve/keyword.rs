//! Keyword listing of kernel API functions, grouped by header.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::resolve::include::include_directive;
use crate::storage::ApiDatabase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMatches {
    pub include: String,
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatches {
    pub keyword: String,
    pub headers: Vec<HeaderMatches>,
}

impl KeywordMatches {
    pub fn total_signatures(&self) -> usize {
        self.headers.iter().map(|h| h.signatures.len()).sum()
    }
}

/// Callable entries under `base_path` whose name contains `keyword`
/// (case-insensitive). Headers with more matches come first; equal counts
/// keep first-seen order.
pub fn query_keyword(db: &ApiDatabase, base_path: &str, keyword: &str) -> KeywordMatches {
    let needle = keyword.to_lowercase();
    let mut by_header: IndexMap<&str, Vec<String>> = IndexMap::new();

    for entry in db.apis.values() {
        if !entry.kind.is_callable() || !entry.header.starts_with(base_path) {
            continue;
        }
        if entry.name.to_lowercase().contains(&needle) {
            by_header
                .entry(entry.header.as_str())
                .or_default()
                .push(entry.signature.clone());
        }
    }

    let mut groups: Vec<(&str, Vec<String>)> = by_header.into_iter().collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let prefixes = [base_path.to_string()];
    let headers = groups
        .into_iter()
        .map(|(header, signatures)| HeaderMatches {
            include: include_directive(header, &prefixes),
            signatures,
        })
        .collect();

    KeywordMatches {
        keyword: keyword.to_string(),
        headers,
    }
}
