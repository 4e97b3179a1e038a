//! MCP (Model Context Protocol) server over stdio.
//!
//! Exposes the three knowledge-base tools to AI assistants:
//!
//! - `decompose_function`: a kernel function with every function it calls,
//!   dependencies first
//! - `query_llk_functions`: kernel API signatures whose name contains a keyword
//! - `find_similar_symbols`: typo correction against the kernel API headers
//!
//! The snapshot is loaded on first use and shared by all later calls. A
//! missing snapshot is reported in the tool result, never as a protocol error.

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Settings;
use crate::decompose::FormatOptions;
use crate::resolve::ResolverOptions;
use crate::storage::{ApiDatabase, StorageResult};
use crate::tools::{self, DecomposeOptions};

/// Names of the tools this server registers.
pub const TOOL_NAMES: &[&str] = &["decompose_function", "query_llk_functions", "find_similar_symbols"];

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct DecomposeFunctionRequest {
    /// Path to the C++ source file containing the function
    pub file_path: String,
    /// Name of the function to decompose
    pub function_name: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct QueryLlkFunctionsRequest {
    /// Keyword to search for in function names (e.g., "exp", "sqrt")
    pub keyword: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema)]
pub struct FindSimilarSymbolsRequest {
    /// Symbol that may be misspelled or not exist
    pub symbol: String,
    /// Maximum number of results (default: 10)
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Header path prefixes to search instead of the configured ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_paths: Option<Vec<String>>,
}

fn default_max_results() -> usize {
    10
}

#[derive(Clone)]
pub struct AtlasServer {
    settings: Arc<Settings>,
    database: Arc<RwLock<Option<Arc<ApiDatabase>>>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl AtlasServer {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            database: Arc::new(RwLock::new(None)),
            tool_router: Self::tool_router(),
        }
    }

    /// Server sharing an already loaded snapshot.
    pub fn with_database(settings: Arc<Settings>, database: ApiDatabase) -> Self {
        Self {
            settings,
            database: Arc::new(RwLock::new(Some(Arc::new(database)))),
            tool_router: Self::tool_router(),
        }
    }

    /// Remove tools by name. Unknown names are reported and ignored.
    pub fn without_tools<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            if TOOL_NAMES.contains(&name) {
                self.tool_router.remove_route(name);
                crate::log_event!("mcp", "tool disabled", "{name}");
            } else {
                tracing::warn!("[mcp] unknown tool '{name}' cannot be disabled");
            }
        }
        self
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    fn database_path(&self) -> PathBuf {
        self.settings.database_file()
    }

    /// Cached snapshot, loading it on first use. Failed loads are retried
    /// on the next call.
    async fn database(&self) -> StorageResult<Arc<ApiDatabase>> {
        if let Some(db) = self.database.read().await.as_ref() {
            return Ok(db.clone());
        }

        let mut guard = self.database.write().await;
        if let Some(db) = guard.as_ref() {
            return Ok(db.clone());
        }

        let path = self.database_path();
        let loaded = tokio::task::spawn_blocking(move || ApiDatabase::load(&path))
            .await
            .map_err(|e| crate::storage::StorageError::Persist {
                path: self.database_path(),
                reason: e.to_string(),
            })??;

        let db = Arc::new(loaded);
        *guard = Some(db.clone());
        crate::log_event!("mcp", "database loaded", "{} symbols", db.apis.len());
        Ok(db)
    }

    #[tool(
        description = "Decompose a C++ function into itself plus every function it transitively calls, ordered so dependencies come first"
    )]
    pub async fn decompose_function(
        &self,
        Parameters(DecomposeFunctionRequest {
            file_path,
            function_name,
        }): Parameters<DecomposeFunctionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.database().await;
        let options = DecomposeOptions {
            format: FormatOptions {
                annotate: false,
                missing_preview: self.settings.decompose.missing_preview,
            },
            output: None,
        };

        // File reads and one parse per expanded function
        let text = tokio::task::spawn_blocking(move || {
            tools::decompose_function(
                db.as_deref(),
                &PathBuf::from(&file_path),
                &function_name,
                &options,
            )
            .to_json_pretty()
        })
        .await
        .map_err(|e| {
            McpError::new(
                ErrorCode::INTERNAL_ERROR,
                format!("decompose_function task failed: {e}"),
                None,
            )
        })?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        description = "List kernel API (llk_api) function signatures whose name contains a keyword, grouped by header include"
    )]
    pub async fn query_llk_functions(
        &self,
        Parameters(QueryLlkFunctionsRequest { keyword }): Parameters<QueryLlkFunctionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.database().await;
        let outcome = tools::query_keyword_functions(db.as_deref(), &self.settings.resolver.keyword_path, &keyword);

        Ok(CallToolResult::success(vec![Content::text(outcome.to_json_pretty())]))
    }

    #[tool(
        description = "Find symbols with names similar to a possibly misspelled one, with signature and include directive"
    )]
    pub async fn find_similar_symbols(
        &self,
        Parameters(FindSimilarSymbolsRequest {
            symbol,
            max_results,
            search_paths,
        }): Parameters<FindSimilarSymbolsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let db = self.database().await;
        let options = ResolverOptions::from(&self.settings.resolver)
            .with_search_paths(search_paths.unwrap_or_default())
            .with_max_results(max_results);
        let outcome = tools::find_similar_symbols(db.as_deref(), &symbol, &options);

        Ok(CallToolResult::success(vec![Content::text(outcome.to_json_pretty())]))
    }
}

#[tool_handler]
impl ServerHandler for AtlasServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "This server answers questions about a C/C++ kernel API. \
                Use 'find_similar_symbols' when a name may be wrong, 'query_llk_functions' to \
                list kernel API signatures by keyword, and 'decompose_function' to read a \
                function together with everything it calls."
                    .to_string(),
            )
    }
}

/// Serve on stdin/stdout until the client disconnects.
pub async fn serve_stdio(server: AtlasServer) -> anyhow::Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    crate::log_event!("mcp", "started", "tools: {}", server.tool_names().join(", "));
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
