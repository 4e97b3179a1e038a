pub mod pipeline;
pub mod walker;

pub use pipeline::{BuildReport, build_database, discover_files, extract_file};
pub use walker::FileWalker;
