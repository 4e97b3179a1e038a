//! The binary end to end: init, build, then the query commands.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn atlas(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cxx-atlas"))
        .current_dir(dir)
        .env("RUST_LOG", "error")
        .args(args)
        .output()
        .expect("Failed to run cxx-atlas")
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let output = atlas(temp_path, &["init"]);
    assert!(output.status.success());

    let config_path = temp_path.join(".atlas/settings.toml");
    assert!(config_path.exists());

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[source]"));
    assert!(content.contains("[resolver]"));

    let again = atlas(temp_path, &["init"]);
    assert!(!again.status.success());
    assert!(atlas(temp_path, &["init", "--force"]).status.success());
}

#[test]
fn test_build_then_query() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    assert!(atlas(root, &["init"]).status.success());

    write(
        root,
        "tt_metal/hw/ckernels/wormhole_b0/metal/llk_api/llk_math_unary_sfpu_api.h",
        "inline void llk_math_exp_init() {}\ninline void llk_math_exp(uint dst) { llk_math_exp_init(); }\n",
    );
    write(root, "kernels/exp.cpp", "void MAIN() { llk_math_exp(0); }\n");

    let build = atlas(root, &["build", "--dir", "tt_metal", "--threads", "1"]);
    assert!(build.status.success(), "{}", String::from_utf8_lossy(&build.stderr));
    assert!(stdout(&build).contains("Build complete:"));
    assert!(root.join(".atlas/api_db.json").exists());

    let similar = atlas(root, &["similar", "llk_math_exp", "--json"]);
    assert!(similar.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&similar)).unwrap();
    assert_eq!(json["results"][0]["name"], "llk_math_exp");

    let keyword = atlas(root, &["keyword", "exp", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&keyword)).unwrap();
    assert_eq!(json["headers"][0]["signatures"].as_array().unwrap().len(), 2);

    let decompose = atlas(root, &["decompose", "kernels/exp.cpp", "MAIN", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&decompose)).unwrap();
    assert_eq!(json["total_functions"], 3);

    let stats = atlas(root, &["stats"]);
    assert!(stdout(&stats).contains("Total APIs:"));
}

#[test]
fn test_build_summary_written_next_to_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    assert!(atlas(root, &["init"]).status.success());
    write(root, "tt_metal/include/tile.h", "void tile_regs_acquire() {}\n");

    let output = root.join("out/kernels.json");
    let build = atlas(
        root,
        &["build", "--dir", "tt_metal", "--output", output.to_str().unwrap(), "--summary"],
    );
    assert!(build.status.success(), "{}", String::from_utf8_lossy(&build.stderr));

    let summary_path = root.join("out/kernels.txt");
    assert!(stdout(&build).contains("Summary saved to:"));
    let summary = std::fs::read_to_string(summary_path).unwrap();
    assert!(summary.contains("Total APIs:"));
}

#[test]
fn test_query_without_database_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = atlas(temp_dir.path(), &["similar", "llk_math", "--json"]);

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Database not found at:")
    );
}
