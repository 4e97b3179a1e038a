//! Query commands: decompose, keyword, similar, stats.
//!
//! Each prints the human form by default and the tool JSON with `--json`.

use std::path::{Path, PathBuf};

use crate::decompose::FormatOptions;
use crate::resolve::ResolverOptions;
use crate::storage::ApiDatabase;
use crate::tools::{self, DecomposeOptions, ToolOutcome};

/// Arguments for the decompose command.
pub struct DecomposeArgs {
    pub file: PathBuf,
    pub function: String,
    pub output: Option<PathBuf>,
    pub comments: bool,
    pub json: bool,
}

pub fn run_decompose(args: DecomposeArgs, database: &Path, missing_preview: usize) {
    let db = ApiDatabase::load(database);
    let options = DecomposeOptions {
        format: FormatOptions {
            annotate: args.comments,
            missing_preview,
        },
        output: args.output.clone(),
    };

    let outcome = tools::decompose_function(db.as_ref(), &args.file, &args.function, &options);
    if args.json {
        println!("{}", outcome.to_json_pretty());
        exit_on_failure(&outcome);
        return;
    }

    match &outcome {
        ToolOutcome::Success(success) => {
            println!("{}", success.decomposed_code);
            eprintln!("Total functions: {}", success.total_functions);
            if !success.missing_functions.is_empty() {
                eprintln!(
                    "Missing implementations ({}): {}",
                    success.missing_functions.len(),
                    success.missing_functions.join(", ")
                );
            }
            if let Some(output) = &args.output {
                eprintln!("Written to: {}", output.display());
            }
        }
        ToolOutcome::Failure(failure) => {
            eprintln!("Error: {}", failure.error);
            std::process::exit(1);
        }
    }
}

pub fn run_keyword(keyword: &str, json: bool, database: &Path, base_path: &str) {
    let db = ApiDatabase::load(database);
    let outcome = tools::query_keyword_functions(db.as_ref(), base_path, keyword);
    if json {
        println!("{}", outcome.to_json_pretty());
        exit_on_failure(&outcome);
        return;
    }

    match &outcome {
        ToolOutcome::Success(matches) if matches.headers.is_empty() => {
            println!("No functions found containing '{keyword}'");
        }
        ToolOutcome::Success(matches) => {
            println!(
                "Found {} functions in {} headers:",
                matches.total_signatures(),
                matches.headers.len()
            );
            for header in &matches.headers {
                println!("\n{}", header.include);
                for signature in &header.signatures {
                    println!("  {signature}");
                }
            }
        }
        ToolOutcome::Failure(failure) => {
            eprintln!("Error: {}", failure.error);
            std::process::exit(1);
        }
    }
}

pub fn run_similar(symbol: &str, json: bool, database: &Path, options: &ResolverOptions) {
    let db = ApiDatabase::load(database);
    let outcome = tools::find_similar_symbols(db.as_ref(), symbol, options);
    if json {
        println!("{}", outcome.to_json_pretty());
        exit_on_failure(&outcome);
        return;
    }

    match &outcome {
        ToolOutcome::Success(found) if found.results.is_empty() => {
            println!("No symbols similar to '{symbol}'");
        }
        ToolOutcome::Success(found) => {
            for (i, result) in found.results.iter().enumerate() {
                println!(
                    "{}. {} ({}, similarity {:.3})",
                    i + 1,
                    result.name,
                    result.kind,
                    result.similarity
                );
                println!("   {}", result.signature);
                println!("   {}", result.include);
            }
        }
        ToolOutcome::Failure(failure) => {
            eprintln!("Error: {}", failure.error);
            std::process::exit(1);
        }
    }
}

pub fn run_stats(database: &Path) {
    match ApiDatabase::load(database) {
        Ok(db) => {
            print!("{}", db.summary());
            let dangling = db.dangling_keys();
            if !dangling.is_empty() {
                eprintln!("Warning: {} entries reference missing implementations", dangling.len());
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Run 'cxx-atlas build' first.");
            std::process::exit(1);
        }
    }
}

fn exit_on_failure<T: serde::Serialize, F: serde::Serialize>(outcome: &ToolOutcome<T, F>) {
    if !outcome.is_success() {
        std::process::exit(1);
    }
}
