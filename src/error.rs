//! Error types for building and querying the symbol database.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Source root not found: {}", path.display())]
    SourceRootNotFound { path: PathBuf },

    #[error("Source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to create thread pool: {reason}")]
    ThreadPool { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Per-file failures are counted by the build instead of aborting it.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::Parse { .. })
    }

    /// Hints shown by the CLI next to the error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Storage(e) if e.is_not_found() => {
                vec!["Run 'cxx-atlas build' to create the database"]
            }
            Self::Storage(StorageError::Serialization { .. }) => vec![
                "The database file is corrupted",
                "Rebuild it with 'cxx-atlas build'",
            ],
            Self::SourceRootNotFound { .. } => vec![
                "Check 'source.root' in .atlas/settings.toml",
                "Or pass --root to 'cxx-atlas build'",
            ],
            Self::ThreadPool { .. } => vec!["Lower 'source.parallel_threads'"],
            _ => Vec::new(),
        }
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
