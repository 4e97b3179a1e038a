//! File system walker for discovering C/C++ sources to scan
//!
//! This module provides directory traversal with support for:
//! - .gitignore rules
//! - Custom ignore patterns from configuration
//! - Extension filtering
//! - Test/example/build path exclusion
//! - Include path mapping

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::config::SourceConfig;

/// Walks the configured directories under a source root.
#[derive(Debug, Clone)]
pub struct FileWalker {
    root: PathBuf,
    config: SourceConfig,
}

impl FileWalker {
    pub fn new(root: impl Into<PathBuf>, config: &SourceConfig) -> Self {
        Self {
            root: root.into(),
            config: config.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All files to scan, sorted. Missing directories are skipped with a warning.
    pub fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for directory in &self.config.directories {
            let dir_path = self.root.join(directory);
            if !dir_path.is_dir() {
                tracing::warn!("[build] directory not found: {}", dir_path.display());
                continue;
            }

            let before = files.len();
            files.extend(self.walk_dir(&dir_path));
            crate::debug_event!("build", "scanned", "{directory}: {} files", files.len() - before);
        }

        files.sort();
        files.dedup();
        files
    }

    fn walk_dir(&self, dir: &Path) -> impl Iterator<Item = PathBuf> + '_ {
        let mut builder = WalkBuilder::new(dir);

        builder
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .max_depth(None)
            .require_git(false);

        let mut override_builder = ignore::overrides::OverrideBuilder::new(&self.root);
        for pattern in &self.config.ignore_patterns {
            if let Err(e) = override_builder.add(&format!("!{pattern}")) {
                tracing::warn!("[build] invalid ignore pattern '{pattern}': {e}");
            }
        }

        if let Ok(overrides) = override_builder.build() {
            builder.overrides(overrides);
        }

        builder
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(move |entry| {
                let path = entry.path();

                // Skip hidden files (files starting with .)
                if path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'))
                {
                    return None;
                }

                if !self.has_source_extension(path) || self.is_skipped(path) {
                    return None;
                }

                Some(path.to_path_buf())
            })
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.extensions.iter().any(|e| e == ext))
    }

    /// True if the root-relative path, with a leading `/`, contains a skip pattern.
    pub fn is_skipped(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let text = format!("/{}", slash_path(relative));
        self.config
            .skip_patterns
            .iter()
            .any(|pattern| text.contains(pattern.as_str()))
    }

    /// Header path used in the store and in include directives.
    ///
    /// Relative to the first include root containing the file. A leading
    /// `ttnn/ttnn/` collapses to `ttnn/`.
    pub fn include_path(&self, path: &Path) -> String {
        for base in &self.config.include_roots {
            let base_path = if base.is_empty() {
                self.root.clone()
            } else {
                self.root.join(base)
            };

            if let Ok(relative) = path.strip_prefix(&base_path) {
                let include = slash_path(relative);
                return match include.strip_prefix("ttnn/ttnn/") {
                    Some(rest) => format!("ttnn/{rest}"),
                    None => include,
                };
            }
        }

        path.strip_prefix(&self.root)
            .map(slash_path)
            .unwrap_or_else(|_| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
