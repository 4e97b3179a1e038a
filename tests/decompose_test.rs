//! Decomposition against databases built from real trees.

use std::fs;
use std::path::{Path, PathBuf};

use cxx_atlas::decompose::{FormatOptions, render};
use cxx_atlas::tools::{DecomposeOptions, decompose_function};
use cxx_atlas::{ApiDatabase, Decomposer, Settings, build_database};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn build(root: &Path) -> ApiDatabase {
    let mut settings = Settings::default();
    settings.source.root = root.to_path_buf();
    settings.source.directories = vec!["tt_metal".to_string()];
    settings.source.parallel_threads = 1;
    build_database(&settings).unwrap().0
}

#[test]
fn test_compute_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let kernel = write(
        root,
        "kernels/compute.cpp",
        "int add(int a,int b){return a+b;} int compute(int x){return add(x,x);}",
    );
    write(root, "tt_metal/include/math.h", "int add(int a,int b){return a+b;}\n");

    let db = build(root);
    let mut decomposer = Decomposer::new(&db).unwrap();
    let result = decomposer.decompose_file(&kernel, "compute").unwrap();

    assert_eq!(result.names(), vec!["add", "compute"]);
    assert!(result.missing.is_empty());

    let code = render(&result, FormatOptions::default());
    let add_at = code.find("return a+b").unwrap();
    let compute_at = code.find("return add(x,x)").unwrap();
    assert!(add_at < compute_at);
}

#[test]
fn test_chain_orders_dependencies_first() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "tt_metal/include/chain.h",
        "void c() {}\nvoid b() { c(); }\n",
    );
    let kernel = write(root, "kernels/chain.cpp", "void a() { b(); }\n");

    let db = build(root);
    let mut decomposer = Decomposer::new(&db).unwrap();
    let result = decomposer.decompose_file(&kernel, "a").unwrap();

    assert_eq!(result.names(), vec!["c", "b", "a"]);
    assert_eq!(result.max_depth(), 2);
}

#[test]
fn test_recursion_terminates_with_unique_names() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "tt_metal/include/recursive.h",
        "void ping(int n);\nvoid pong(int n) { if (n) ping(n - 1); }\nvoid ping(int n) { if (n) pong(n - 1); }\nint fact(int n) { return n ? n * fact(n - 1) : 1; }\n",
    );
    let kernel = write(root, "kernels/main.cpp", "void MAIN() { ping(3); fact(4); }\n");

    let db = build(root);
    let mut decomposer = Decomposer::new(&db).unwrap();
    let result = decomposer.decompose_file(&kernel, "MAIN").unwrap();

    let mut names = result.names();
    assert_eq!(names.last(), Some(&"MAIN"));
    names.sort();
    assert_eq!(names, vec!["MAIN", "fact", "ping", "pong"]);
    assert!(result.missing.is_empty());
}

#[test]
fn test_missing_calls_do_not_block_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "tt_metal/include/tile.h", "void tile_regs_acquire() {}\n");
    let kernel = write(
        root,
        "kernels/main.cpp",
        "void MAIN() { cb_wait_front(0, 1); tile_regs_acquire(); }\n",
    );

    let db = build(root);
    let mut decomposer = Decomposer::new(&db).unwrap();
    let result = decomposer.decompose_file(&kernel, "MAIN").unwrap();

    assert_eq!(result.names(), vec!["tile_regs_acquire", "MAIN"]);
    assert!(result.missing.contains("cb_wait_front"));
}

#[test]
fn test_name_variants_bridge_scoped_and_flattened() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "tt_metal/include/ckernel.h",
        "void ckernel::pack_tile(int i) { (void)i; }\nvoid llk_unpack_A(int i) { (void)i; }\n",
    );
    let kernel = write(
        root,
        "kernels/main.cpp",
        "void MAIN() { ckernel_pack_tile(0); llk::unpack_A(1); }\n",
    );

    let db = build(root);
    let mut decomposer = Decomposer::new(&db).unwrap();
    let result = decomposer.decompose_file(&kernel, "MAIN").unwrap();

    assert!(result.missing.is_empty(), "missing: {:?}", result.missing);
    assert_eq!(result.total_functions(), 3);
    let code = render(&result, FormatOptions::default());
    assert!(code.contains("void ckernel::pack_tile(int i)"));
    assert!(code.contains("void llk_unpack_A(int i)"));
}

#[test]
fn test_annotated_output_summary() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "tt_metal/include/leaf.h", "void leaf() {}\n");
    let kernel = write(root, "kernels/main.cpp", "void MAIN() { leaf(); absent(); }\n");

    let db = build(root);
    let options = DecomposeOptions {
        format: FormatOptions {
            annotate: true,
            missing_preview: 5,
        },
        output: None,
    };
    let outcome = decompose_function(Ok(&db), &kernel, "MAIN", &options);

    let success = outcome.success().unwrap();
    assert_eq!(success.total_functions, 2);
    assert_eq!(success.missing_functions, vec!["absent"]);
    assert!(success.decomposed_code.contains("// Original function"));
    assert!(success.decomposed_code.contains("Dependency Analysis Summary:"));
    assert!(success.decomposed_code.contains("Total functions: 2"));
}

#[test]
fn test_decompose_tool_json_shape() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "tt_metal/include/leaf.h", "void leaf() {}\n");
    let kernel = write(root, "kernels/main.cpp", "void MAIN() { leaf(); }\n");

    let db = build(root);
    let outcome = decompose_function(Ok(&db), &kernel, "MAIN", &DecomposeOptions::default());

    let json: serde_json::Value = serde_json::from_str(&outcome.to_json_pretty()).unwrap();
    assert_eq!(json["function"], "MAIN");
    assert_eq!(json["total_functions"], 2);
    assert_eq!(json["missing_functions"], serde_json::json!([]));
    assert!(json["decomposed_code"].as_str().unwrap().contains("MAIN() { leaf(); }"));
    assert!(json.get("error").is_none());
}
