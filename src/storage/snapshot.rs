//! Persisted knowledge base.
//!
//! The snapshot is written once at the end of a build and only read after
//! that. All maps are ordered, so an unchanged source tree serializes to
//! the same bytes apart from timestamps.

use crate::storage::entry::{ImplementationRecord, SymbolEntry};
use crate::storage::error::{StorageError, StorageResult};
use crate::types::SymbolKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Build provenance and counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbMetadata {
    pub created: String,
    pub source_root: String,
    pub description: String,
    pub total_apis: usize,
    pub total_headers: usize,
    pub total_implementations: usize,
    #[serde(default)]
    pub files_scanned: usize,
    #[serde(default)]
    pub files_failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDatabase {
    pub metadata: DbMetadata,
    pub apis: BTreeMap<String, SymbolEntry>,
    pub headers: BTreeMap<String, Vec<String>>,
    pub namespaces: BTreeMap<String, Vec<String>>,
    pub implementations: BTreeMap<String, ImplementationRecord>,
}

impl ApiDatabase {
    /// Load a snapshot written by [`ApiDatabase::save`].
    #[must_use = "Load errors should be handled appropriately"]
    pub fn load(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            return Err(StorageError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = fs::File::open(path).map_err(|e| StorageError::io(path, e))?;
        let db: ApiDatabase = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StorageError::serialization(path, e))?;

        let dangling = db.dangling_keys();
        if !dangling.is_empty() {
            tracing::warn!(
                "[storage] {} index entries reference missing keys: {}",
                dangling.len(),
                dangling.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
            );
        }

        crate::debug_event!(
            "storage",
            "loaded",
            "{} apis from {}",
            db.apis.len(),
            path.display()
        );
        Ok(db)
    }

    /// Write the snapshot as pretty JSON, replacing `path` atomically.
    #[must_use = "Save errors should be handled to ensure data is persisted"]
    pub fn save(&self, path: &Path) -> StorageResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| StorageError::serialization(path, e))?;
            writer.flush().map_err(|e| StorageError::io(path, e))?;
        }

        tmp.persist(path).map_err(|e| StorageError::Persist {
            path: path.to_path_buf(),
            reason: e.error.to_string(),
        })?;
        Ok(())
    }

    /// Index entries (header or namespace) whose key is not in `apis`.
    pub fn dangling_keys(&self) -> Vec<String> {
        let mut dangling = BTreeSet::new();
        for key in self.headers.values().chain(self.namespaces.values()).flatten() {
            if !self.apis.contains_key(key) {
                dangling.insert(key.clone());
            }
        }
        dangling.into_iter().collect()
    }

    pub fn implementation_for(&self, entry: &SymbolEntry) -> Option<&ImplementationRecord> {
        entry
            .implementation_ref()
            .and_then(|key| self.implementations.get(key))
    }

    /// Entry count and implemented count per kind.
    pub fn counts_by_kind(&self) -> BTreeMap<SymbolKind, (usize, usize)> {
        let mut counts: BTreeMap<SymbolKind, (usize, usize)> = BTreeMap::new();
        for entry in self.apis.values() {
            let slot = counts.entry(entry.kind).or_default();
            slot.0 += 1;
            if entry.has_implementation {
                slot.1 += 1;
            }
        }
        counts
    }

    /// Human readable overview written next to the snapshot.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "API Signatures and Implementations Database Summary");
        let _ = writeln!(out, "{}\n", "=".repeat(80));
        let _ = writeln!(out, "Created: {}", self.metadata.created);
        let _ = writeln!(out, "Source root: {}", self.metadata.source_root);
        let _ = writeln!(out, "Total APIs: {}", self.apis.len());
        let _ = writeln!(out, "Total Headers: {}", self.headers.len());
        let _ = writeln!(out, "Total Implementations: {}\n", self.implementations.len());

        let _ = writeln!(out, "APIs by Type:");
        for (kind, (count, implemented)) in self.counts_by_kind() {
            let _ = writeln!(out, "  {kind}: {count} (with implementations: {implemented})");
        }

        let _ = writeln!(out, "\nExample APIs with Implementations:");
        let _ = writeln!(out, "{}", "-".repeat(40));
        for entry in self.apis.values().filter(|e| e.has_implementation).take(5) {
            let _ = writeln!(out, "\nAPI: {}", entry.name);
            let _ = writeln!(out, "Type: {}", entry.kind);
            let _ = writeln!(out, "Signature: {}", entry.signature);
            let _ = writeln!(out, "Header: {}", entry.header);

            if let Some(record) = self.implementation_for(entry) {
                let _ = writeln!(out, "Implementation location: {}", record.location);
                let _ = writeln!(out, "Implementation preview:");
                let lines: Vec<&str> = record.code.lines().collect();
                for line in lines.iter().take(5) {
                    let _ = writeln!(out, "  {line}");
                }
                if lines.len() > 5 {
                    let _ = writeln!(out, "  ...");
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ApiDatabase {
        let mut db = ApiDatabase::default();
        let mut entry = SymbolEntry::new(
            "function::add#12345678",
            "add",
            SymbolKind::Function,
            "int add(int a, int b)",
            "math/add.h",
        );
        entry.has_implementation = true;
        db.apis.insert(entry.key.clone(), entry);
        db.implementations.insert(
            "function::add#12345678".to_string(),
            ImplementationRecord {
                code: "int add(int a, int b) {\n  return a + b;\n}".to_string(),
                location: "math/add.h".to_string(),
                extracted_at: "2024-01-01 00:00:00".to_string(),
            },
        );
        db.headers.insert(
            "math/add.h".to_string(),
            vec!["function::add#12345678".to_string()],
        );
        db.namespaces.insert(
            "global".to_string(),
            vec!["function::add#12345678".to_string()],
        );
        db
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("api_db.json");

        let db = sample();
        db.save(&path).unwrap();
        let loaded = ApiDatabase::load(&path).unwrap();

        assert_eq!(loaded, db);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let err = ApiDatabase::load(&missing).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("Database not found at: "));

        let broken = temp_dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            ApiDatabase::load(&broken),
            Err(StorageError::Serialization { .. })
        ));
    }

    #[test]
    fn test_dangling_keys() {
        let mut db = sample();
        assert!(db.dangling_keys().is_empty());

        db.namespaces
            .entry("ckernel".to_string())
            .or_default()
            .push("function::ghost#00000000".to_string());
        assert_eq!(db.dangling_keys(), vec!["function::ghost#00000000"]);
    }

    #[test]
    fn test_summary_lists_kinds_and_examples() {
        let summary = sample().summary();
        assert!(summary.contains("Total APIs: 1"));
        assert!(summary.contains("function: 1 (with implementations: 1)"));
        assert!(summary.contains("API: add"));
        assert!(summary.contains("  return a + b;"));
    }
}
