//! Read-only lookups over a loaded snapshot: fuzzy name correction and
//! keyword listing.

pub mod fuzzy;
pub mod include;
pub mod keyword;
pub mod similarity;

pub use fuzzy::{ResolverOptions, SimilarSymbol, find_similar, rank};
pub use include::include_directive;
pub use keyword::{HeaderMatches, KeywordMatches, query_keyword};
pub use similarity::similarity;
