//! Layered configuration.
//!
//! Sources, later ones winning:
//! - Default values
//! - TOML file at `.atlas/settings.toml` (searched upward from the current directory)
//! - Environment variables
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `ATLAS_` and use double
//! underscores to separate nested levels:
//! - `ATLAS_SOURCE__PARALLEL_THREADS=8` sets `source.parallel_threads`
//! - `ATLAS_RESOLVER__THRESHOLD=0.4` sets `resolver.threshold`
//! - `ATLAS_DATABASE_PATH=/tmp/db.json` sets `database_path`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory holding the workspace configuration and default database.
pub const CONFIG_DIR: &str = ".atlas";
const SETTINGS_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "ATLAS_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Snapshot location, relative to the workspace root unless absolute
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Workspace root directory (where .atlas is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub decompose: DecomposeConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub mcp: McpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to scan when building the database.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    /// Root of the C/C++ tree; include paths are computed against it
    #[serde(default = "default_source_root")]
    pub root: PathBuf,

    /// Directories under `root` to scan
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,

    /// File extensions to index, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Substrings of `/`-prefixed relative paths that exclude a file
    #[serde(default = "default_skip_patterns")]
    pub skip_patterns: Vec<String>,

    /// Additional gitignore-style globs to exclude
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Bases that include paths are made relative to, first match wins
    #[serde(default = "default_include_roots")]
    pub include_roots: Vec<String>,

    /// Number of parallel threads for extraction
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Header path roots used as namespaces for unqualified names
    #[serde(default = "default_header_namespaces")]
    pub header_namespaces: Vec<String>,

    /// Add the fixed standard-library entries
    #[serde(default = "default_true")]
    pub seed_standard_library: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DecomposeConfig {
    /// Annotate decomposed output with dependency comments
    #[serde(default = "default_false")]
    pub annotate: bool,

    /// Missing names listed in the annotated summary
    #[serde(default = "default_missing_preview")]
    pub missing_preview: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResolverConfig {
    /// Header prefixes searched by the fuzzy resolver
    #[serde(default = "default_search_paths")]
    pub search_paths: Vec<String>,

    /// Header prefix for keyword queries
    #[serde(default = "default_keyword_path")]
    pub keyword_path: String,

    /// Scores at or below this are discarded
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct McpConfig {
    /// Tools removed from the server
    #[serde(default)]
    pub disabled_tools: Vec<String>,
}

/// Logging configuration.
///
/// ```toml
/// [logging]
/// default = "warn"
///
/// [logging.modules]
/// "cxx_atlas::decompose" = "debug"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_database_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("api_db.json")
}
fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_directories() -> Vec<String> {
    vec!["ttnn".to_string(), "tt_metal".to_string()]
}
fn default_extensions() -> Vec<String> {
    ["hpp", "h", "cpp", "cc"].iter().map(|s| s.to_string()).collect()
}
fn default_skip_patterns() -> Vec<String> {
    [
        "/tests/",
        "/test/",
        "/testing/",
        "/examples/",
        "/programming_examples/",
        "/tracy/",
        "/build/",
        "_test.",
        "test_",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_include_roots() -> Vec<String> {
    ["ttnn/cpp", "tt_metal/include", "tt_metal", ""]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_header_namespaces() -> Vec<String> {
    vec!["ttnn".to_string(), "tt_metal".to_string()]
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_missing_preview() -> usize {
    5
}
fn default_search_paths() -> Vec<String> {
    vec![
        "hw/ckernels/wormhole_b0/metal/llk_api".to_string(),
        "hostdevcommon".to_string(),
    ]
}
fn default_keyword_path() -> String {
    "hw/ckernels/wormhole_b0/metal/llk_api".to_string()
}
fn default_threshold() -> f64 {
    0.3
}
fn default_max_results() -> usize {
    10
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            database_path: default_database_path(),
            workspace_root: None,
            source: SourceConfig::default(),
            storage: StorageConfig::default(),
            decompose: DecomposeConfig::default(),
            resolver: ResolverConfig::default(),
            mcp: McpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: default_source_root(),
            directories: default_directories(),
            extensions: default_extensions(),
            skip_patterns: default_skip_patterns(),
            ignore_patterns: Vec::new(),
            include_roots: default_include_roots(),
            parallel_threads: default_parallel_threads(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            header_namespaces: default_header_namespaces(),
            seed_standard_library: default_true(),
        }
    }
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            annotate: default_false(),
            missing_preview: default_missing_preview(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search_paths: default_search_paths(),
            keyword_path: default_keyword_path(),
            threshold: default_threshold(),
            max_results: default_max_results(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

/// `ATLAS_` variables, with `__` separating nested keys.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().replace("__", ".").into())
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE));

        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(env_provider())
            .extract()
            .map_err(Box::new)
    }

    /// Find `.atlas/settings.toml` in the current directory or an ancestor
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join(SETTINGS_FILE))
    }

    /// Get the workspace root directory (where .atlas is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!(
                        "Configuration file is corrupted: {e}\nRun 'cxx-atlas init --force' to regenerate."
                    ));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join(SETTINGS_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        let mut settings = Settings::default();
        if let Ok(current_dir) = std::env::current_dir() {
            settings.workspace_root = Some(current_dir);
        }

        settings.save(&config_path)?;
        Ok(config_path)
    }

    /// Resolve a configured path against the workspace root.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.workspace_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn database_file(&self) -> PathBuf {
        self.resolve_path(&self.database_path)
    }

    pub fn source_root(&self) -> PathBuf {
        self.resolve_path(&self.source.root)
    }
}
