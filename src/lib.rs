pub mod cli;
pub mod config;
pub mod decompose;
pub mod error;
pub mod indexing;
pub mod logging;
pub mod mcp;
pub mod parsing;
pub mod resolve;
pub mod storage;
pub mod tools;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use decompose::{Decomposer, Decomposition};
pub use error::{IndexError, IndexResult};
pub use indexing::{BuildReport, build_database};
pub use parsing::{CppAdapter, SyntaxAdapter};
pub use resolve::{SimilarSymbol, find_similar, query_keyword};
pub use storage::{ApiDatabase, DatabaseBuilder, StorageError, SymbolEntry};
pub use types::SymbolKind;
