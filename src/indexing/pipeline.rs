//! Whole-tree build.
//!
//! ```text
//! WALK → READ + PARSE (rayon, one CppAdapter per worker) → INSERT (sorted) → FINISH
//! ```
//!
//! Extraction runs in parallel; insertion walks the results in sorted path
//! order so the store never depends on scheduling.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::error::{IndexError, IndexResult};
use crate::indexing::walker::FileWalker;
use crate::parsing::{CppAdapter, FileExtraction, ParseResult, classify_source};
use crate::storage::{ApiDatabase, BuildCounts, DatabaseBuilder};

/// Outcome of one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub files_scanned: usize,
    pub files_failed: usize,
    /// Files skipped with the reason
    pub failures: Vec<(PathBuf, String)>,
    pub symbols: usize,
    pub implementations: usize,
    /// Qualified usages and calls seen, never persisted
    pub references: usize,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn files_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.files_scanned as f64 / secs
        } else {
            0.0
        }
    }
}

/// Files a build of `settings` would scan.
pub fn discover_files(settings: &Settings) -> IndexResult<(FileWalker, Vec<PathBuf>)> {
    let root = settings.source_root();
    if !root.is_dir() {
        return Err(IndexError::SourceRootNotFound { path: root });
    }

    let walker = FileWalker::new(root, &settings.source);
    let files = walker.walk();
    Ok((walker, files))
}

/// Scan the configured tree and produce the finished database.
pub fn build_database(settings: &Settings) -> IndexResult<(ApiDatabase, BuildReport)> {
    let start = Instant::now();
    let (walker, files) = discover_files(settings)?;
    crate::log_event!("build", "discovered", "{} files under {}", files.len(), walker.root().display());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.source.parallel_threads.max(1))
        .build()
        .map_err(|e| IndexError::ThreadPool {
            reason: e.to_string(),
        })?;

    let extracted: Vec<IndexResult<FileExtraction>> = pool.install(|| {
        files
            .par_iter()
            .map_init(CppAdapter::new, |adapter: &mut ParseResult<CppAdapter>, path| match adapter {
                Ok(adapter) => extract_file(adapter, path),
                Err(e) => Err(IndexError::parse(path, e.to_string())),
            })
            .collect()
    });

    let mut builder = DatabaseBuilder::new(&settings.storage)
        .with_source_root(walker.root().display().to_string());
    let mut report = BuildReport::default();

    for (path, result) in files.iter().zip(extracted) {
        report.files_scanned += 1;
        match result {
            Ok(extraction) => {
                report.references += extraction.references.len();
                let header = walker.include_path(path);
                builder.insert_extraction(&header, &extraction);
            }
            Err(e) => {
                tracing::warn!("[build] skipped {}: {e}", path.display());
                report.files_failed += 1;
                report.failures.push((path.clone(), e.to_string()));
            }
        }
    }

    let database = builder.finish(BuildCounts {
        files_scanned: report.files_scanned,
        files_failed: report.files_failed,
    });

    report.symbols = database.apis.len();
    report.implementations = database.implementations.len();
    report.elapsed = start.elapsed();

    crate::log_event!(
        "build",
        "finished",
        "{} symbols, {} implementations from {} files ({} failed) in {:.2?}",
        report.symbols,
        report.implementations,
        report.files_scanned,
        report.files_failed,
        report.elapsed
    );

    Ok((database, report))
}

/// Read and classify one file. Invalid UTF-8 is replaced, not rejected.
pub fn extract_file(adapter: &mut CppAdapter, path: &Path) -> IndexResult<FileExtraction> {
    let bytes = std::fs::read(path).map_err(|e| IndexError::file_read(path, e))?;
    let source = String::from_utf8_lossy(&bytes);
    classify_source(adapter, &source).map_err(|e| IndexError::parse(path, e))
}
