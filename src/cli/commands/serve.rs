//! Serve command - MCP server on stdio.

use std::sync::Arc;

use crate::config::Settings;
use crate::mcp::{AtlasServer, serve_stdio};

/// Run the serve command. `disable` adds to `[mcp] disabled_tools`.
pub async fn run(settings: Settings, disable: Vec<String>) {
    let database = settings.database_file();
    if !database.exists() {
        tracing::warn!(
            "[mcp] no database at {}; tools will report it until 'cxx-atlas build' runs",
            database.display()
        );
    }

    let mut disabled = settings.mcp.disabled_tools.clone();
    disabled.extend(disable);

    let server = AtlasServer::new(Arc::new(settings)).without_tools(disabled.iter().map(String::as_str));

    if let Err(e) = serve_stdio(server).await {
        eprintln!("MCP server error: {e}");
        std::process::exit(1);
    }
}
