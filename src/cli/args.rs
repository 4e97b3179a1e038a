//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

#[derive(Parser)]
#[command(
    name = "cxx-atlas",
    version = env!("CARGO_PKG_VERSION"),
    about = "C/C++ API knowledge base",
    long_about = "Catalog C/C++ declarations and implementations, decompose kernel functions into their dependencies, and look up misspelled symbols.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the database snapshot (overrides config)
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .atlas directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .atlas/settings.toml")]
    Config,

    /// Scan a source tree and write the snapshot
    #[command(
        about = "Build the API database from a source tree",
        after_help = "Examples:\n  cxx-atlas build\n  cxx-atlas build --root ~/tt-metal --dir ttnn --dir tt_metal\n  cxx-atlas build --dry-run"
    )]
    Build {
        /// Source root (overrides config)
        #[arg(long, value_name = "PATH")]
        root: Option<PathBuf>,

        /// Directory under the root to scan, repeatable (overrides config)
        #[arg(long = "dir", value_name = "DIR")]
        dirs: Vec<String>,

        /// Where to write the snapshot (overrides --database and config)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of threads to use (overrides config)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Print the database summary after building
        #[arg(long)]
        summary: bool,

        /// Dry run - list the files that would be scanned
        #[arg(long)]
        dry_run: bool,
    },

    /// Decompose a function into its dependencies
    #[command(
        about = "Print a function with every function it calls, dependencies first",
        after_help = "Examples:\n  cxx-atlas decompose kernels/exp.cpp MAIN\n  cxx-atlas decompose kernels/exp.cpp MAIN --comments -o out.cpp"
    )]
    Decompose {
        /// Source file containing the function
        file: PathBuf,

        /// Function to decompose
        function: String,

        /// Also write the decomposed code to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Annotate each function with depth and callees
        #[arg(long)]
        comments: bool,

        /// Print the tool result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List kernel API functions matching a keyword
    #[command(about = "List kernel API signatures whose name contains a keyword")]
    Keyword {
        /// Keyword to search for (case-insensitive)
        keyword: String,

        /// Print the tool result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find symbols similar to a possibly misspelled name
    #[command(
        about = "Suggest existing symbols for a misspelled name",
        after_help = "Examples:\n  cxx-atlas similar llk_mth_exp\n  cxx-atlas similar noc_read --search-path tt_metal/hw/inc --max 3"
    )]
    Similar {
        /// Symbol to look up
        symbol: String,

        /// Maximum number of results (overrides config)
        #[arg(short, long)]
        max: Option<usize>,

        /// Header prefix to search, repeatable (overrides config)
        #[arg(long = "search-path", value_name = "PREFIX")]
        search_paths: Vec<String>,

        /// Print the tool result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show database statistics
    #[command(about = "Summarize the stored snapshot")]
    Stats,

    /// Start MCP server
    #[command(
        about = "Start MCP server on stdio",
        after_help = "Examples:\n  cxx-atlas serve\n  cxx-atlas serve --disable decompose_function"
    )]
    Serve {
        /// Tool to leave out, repeatable (adds to config)
        #[arg(long = "disable", value_name = "TOOL")]
        disable: Vec<String>,
    },
}
