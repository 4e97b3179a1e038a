//! Approximate symbol lookup for typo correction.

use serde::{Deserialize, Serialize};

use crate::config::ResolverConfig;
use crate::resolve::include::include_directive;
use crate::resolve::similarity::{round_score, similarity};
use crate::storage::{ApiDatabase, SymbolEntry};
use crate::types::SymbolKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    pub signature: String,
    pub include: String,
    pub similarity: f64,
}

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Header prefixes a candidate must start with
    pub search_paths: Vec<String>,
    /// Scores at or below this are dropped
    pub threshold: f64,
    pub max_results: usize,
}

impl From<&ResolverConfig> for ResolverOptions {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            search_paths: config.search_paths.clone(),
            threshold: config.threshold,
            max_results: config.max_results,
        }
    }
}

impl ResolverOptions {
    pub fn with_search_paths(mut self, search_paths: Vec<String>) -> Self {
        if !search_paths.is_empty() {
            self.search_paths = search_paths;
        }
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

fn in_search_paths(header: &str, search_paths: &[String]) -> bool {
    search_paths.iter().any(|path| header.starts_with(path.as_str()))
}

/// Every candidate under `search_paths` with its raw score, best first.
/// Ties keep key order.
pub fn rank<'db>(db: &'db ApiDatabase, query: &str, search_paths: &[String]) -> Vec<(f64, &'db SymbolEntry)> {
    let mut scored: Vec<(f64, &SymbolEntry)> = db
        .apis
        .values()
        .filter(|entry| !entry.name.is_empty() && in_search_paths(&entry.header, search_paths))
        .map(|entry| (similarity(query, &entry.name), entry))
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
}

/// Candidates scoring above the threshold, best first, at most `max_results`.
pub fn find_similar(db: &ApiDatabase, query: &str, options: &ResolverOptions) -> Vec<SimilarSymbol> {
    let ranked = rank(db, query, &options.search_paths);
    let checked = ranked.len();

    let results: Vec<SimilarSymbol> = ranked
        .into_iter()
        .filter(|(score, _)| *score > options.threshold)
        .take(options.max_results)
        .map(|(score, entry)| SimilarSymbol {
            name: entry.name.clone(),
            kind: entry.kind,
            signature: entry.signature.clone(),
            include: include_directive(&entry.header, &options.search_paths),
            similarity: round_score(score),
        })
        .collect();

    crate::debug_event!(
        "resolve",
        "similar",
        "'{query}': {} of {checked} candidates kept",
        results.len()
    );
    results
}
