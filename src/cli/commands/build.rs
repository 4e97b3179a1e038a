//! Build command - scan the source tree and write the snapshot.

use std::path::Path;

use crate::config::Settings;
use crate::indexing::{build_database, discover_files};

/// Arguments for the build command.
pub struct BuildArgs {
    pub summary: bool,
    pub dry_run: bool,
}

/// Run the build command. `settings` already carries CLI overrides.
pub fn run(args: BuildArgs, settings: &Settings, output: &Path) {
    if args.dry_run {
        match discover_files(settings) {
            Ok((walker, files)) => {
                for file in &files {
                    println!("{}", walker.include_path(file));
                }
                eprintln!(
                    "DRY RUN: would scan {} files under {}",
                    files.len(),
                    walker.root().display()
                );
            }
            Err(e) => exit_with(&e),
        }
        return;
    }

    let (database, report) = match build_database(settings) {
        Ok(built) => built,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = database.save(output) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    println!("Build complete:");
    println!("  Files scanned: {}", report.files_scanned);
    println!("  Files failed: {}", report.files_failed);
    println!("  Symbols: {}", report.symbols);
    println!("  Implementations: {}", report.implementations);
    println!("  References seen: {}", report.references);
    println!(
        "  Time: {:.2?} ({:.0} files/s)",
        report.elapsed,
        report.files_per_second()
    );
    println!("Saved to: {}", output.display());

    for (path, reason) in report.failures.iter().take(10) {
        eprintln!("  skipped {}: {reason}", path.display());
    }
    if report.failures.len() > 10 {
        eprintln!("  ... and {} more", report.failures.len() - 10);
    }

    if args.summary {
        let summary_path = output.with_extension("txt");
        if let Err(e) = std::fs::write(&summary_path, database.summary()) {
            eprintln!("Error: failed to write {}: {e}", summary_path.display());
            std::process::exit(1);
        }
        println!("Summary saved to: {}", summary_path.display());
    }
}

fn exit_with(error: &crate::error::IndexError) -> ! {
    eprintln!("Error: {error}");
    for suggestion in error.recovery_suggestions() {
        eprintln!("  - {suggestion}");
    }
    std::process::exit(1);
}
