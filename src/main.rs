use clap::Parser;
use cxx_atlas::Settings;
use cxx_atlas::cli::commands::{build, init, query, serve};
use cxx_atlas::cli::{Cli, Commands};
use cxx_atlas::resolve::ResolverOptions;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Init { .. }) && cli.config.is_none() {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        Settings::default()
    });

    cxx_atlas::logging::init_with_config(&config.logging);

    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }

    match cli.command {
        Commands::Init { force } => init::run_init(force),

        Commands::Config => init::run_config(&config),

        Commands::Build {
            root,
            dirs,
            output,
            threads,
            summary,
            dry_run,
        } => {
            if let Some(root) = root {
                config.source.root = root;
            }
            if !dirs.is_empty() {
                config.source.directories = dirs;
            }
            if let Some(threads) = threads {
                config.source.parallel_threads = threads;
            }
            let output = output.unwrap_or_else(|| config.database_file());
            build::run(build::BuildArgs { summary, dry_run }, &config, &output);
        }

        Commands::Decompose {
            file,
            function,
            output,
            comments,
            json,
        } => {
            let args = query::DecomposeArgs {
                file,
                function,
                output,
                comments: comments || config.decompose.annotate,
                json,
            };
            query::run_decompose(args, &config.database_file(), config.decompose.missing_preview);
        }

        Commands::Keyword { keyword, json } => {
            query::run_keyword(&keyword, json, &config.database_file(), &config.resolver.keyword_path);
        }

        Commands::Similar {
            symbol,
            max,
            search_paths,
            json,
        } => {
            let mut options = ResolverOptions::from(&config.resolver).with_search_paths(search_paths);
            if let Some(max) = max {
                options = options.with_max_results(max);
            }
            query::run_similar(&symbol, json, &config.database_file(), &options);
        }

        Commands::Stats => query::run_stats(&config.database_file()),

        Commands::Serve { disable } => serve::run(config, disable).await,
    }
}
