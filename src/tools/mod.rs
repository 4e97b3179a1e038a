//! Boundary operations shared by the CLI and the MCP server.
//!
//! Each operation returns a [`ToolOutcome`]: the success shape, or a failure
//! shape with an `error` field and the echoed inputs. Nothing propagates
//! past this layer.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::decompose::{Decomposer, FormatOptions, render};
use crate::resolve::{HeaderMatches, KeywordMatches, ResolverOptions, SimilarSymbol, find_similar, query_keyword};
use crate::storage::{ApiDatabase, StorageError};

/// Result-or-error shape of every tool.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolOutcome<T, F> {
    Success(T),
    Failure(F),
}

impl<T: Serialize, F: Serialize> ToolOutcome<T, F> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&F> {
        match self {
            Self::Success(_) => None,
            Self::Failure(value) => Some(value),
        }
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

/// A snapshot, or why it could not be loaded.
pub type DatabaseRef<'a> = Result<&'a ApiDatabase, &'a StorageError>;

#[derive(Debug, Clone, Serialize)]
pub struct DecomposeSuccess {
    pub function: String,
    pub file: String,
    pub total_functions: usize,
    pub missing_functions: Vec<String>,
    pub decomposed_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecomposeFailure {
    pub error: String,
    pub function: String,
    pub file: String,
}

#[derive(Debug, Clone, Default)]
pub struct DecomposeOptions {
    pub format: FormatOptions,
    /// Also write the decomposed code here
    pub output: Option<PathBuf>,
}

pub type DecomposeOutcome = ToolOutcome<DecomposeSuccess, DecomposeFailure>;

pub fn decompose_function(
    db: DatabaseRef<'_>,
    file: &Path,
    function: &str,
    options: &DecomposeOptions,
) -> DecomposeOutcome {
    let failure = |error: String| {
        crate::debug_event!("decompose", "failed", "{function}: {error}");
        ToolOutcome::Failure(DecomposeFailure {
            error,
            function: function.to_string(),
            file: file.display().to_string(),
        })
    };

    let db = match db {
        Ok(db) => db,
        Err(e) => return failure(e.to_string()),
    };

    let mut decomposer = match Decomposer::new(db) {
        Ok(decomposer) => decomposer,
        Err(e) => return failure(e.to_string()),
    };

    let decomposition = match decomposer.decompose_file(file, function) {
        Ok(decomposition) => decomposition,
        Err(e) => return failure(e.to_string()),
    };

    let code = render(&decomposition, options.format);

    if let Some(output) = &options.output {
        if let Err(e) = std::fs::write(output, &code) {
            return failure(format!("Failed to write {}: {e}", output.display()));
        }
    }

    crate::log_event!(
        "decompose",
        "done",
        "{function}: {} functions, {} missing",
        decomposition.total_functions(),
        decomposition.missing.len()
    );

    ToolOutcome::Success(DecomposeSuccess {
        function: function.to_string(),
        file: file.display().to_string(),
        total_functions: decomposition.total_functions(),
        missing_functions: decomposition.missing.into_iter().collect(),
        decomposed_code: code,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordFailure {
    pub error: String,
    pub keyword: String,
    pub headers: Vec<HeaderMatches>,
}

pub type KeywordOutcome = ToolOutcome<KeywordMatches, KeywordFailure>;

pub fn query_keyword_functions(db: DatabaseRef<'_>, base_path: &str, keyword: &str) -> KeywordOutcome {
    match db {
        Ok(db) => ToolOutcome::Success(query_keyword(db, base_path, keyword)),
        Err(e) => ToolOutcome::Failure(KeywordFailure {
            error: e.to_string(),
            keyword: keyword.to_string(),
            headers: Vec::new(),
        }),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarSuccess {
    pub query: String,
    pub results: Vec<SimilarSymbol>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarFailure {
    pub error: String,
    pub query: String,
    pub results: Vec<SimilarSymbol>,
}

pub type SimilarOutcome = ToolOutcome<SimilarSuccess, SimilarFailure>;

pub fn find_similar_symbols(db: DatabaseRef<'_>, symbol: &str, options: &ResolverOptions) -> SimilarOutcome {
    match db {
        Ok(db) => ToolOutcome::Success(SimilarSuccess {
            query: symbol.to_string(),
            results: find_similar(db, symbol, options),
        }),
        Err(e) => ToolOutcome::Failure(SimilarFailure {
            error: e.to_string(),
            query: symbol.to_string(),
            results: Vec::new(),
        }),
    }
}
