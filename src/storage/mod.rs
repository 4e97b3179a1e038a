pub mod builder;
pub mod entry;
pub mod error;
pub mod snapshot;

pub use builder::{
    BuildCounts, COMMON_METHODS_HEADER, DatabaseBuilder, GLOBAL_NAMESPACE, STANDARD_LIBRARY_HEADER,
    signature_hash,
};
pub use entry::{ImplementationRecord, SymbolEntry};
pub use error::{StorageError, StorageResult};
pub use snapshot::{ApiDatabase, DbMetadata};
