//! Whole-tree builds over real C++ fixtures.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use cxx_atlas::parsing::heuristics::has_function_body;
use cxx_atlas::storage::STANDARD_LIBRARY_HEADER;
use cxx_atlas::{ApiDatabase, Settings, SymbolKind, build_database};
use tempfile::TempDir;

const LLK_DIR: &str = "tt_metal/hw/ckernels/wormhole_b0/metal/llk_api";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn settings_for(root: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.source.root = root.to_path_buf();
    settings.source.parallel_threads = 2;
    settings
}

fn fixture_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        &format!("{LLK_DIR}/llk_math_unary_sfpu_api.h"),
        r#"#pragma once
#define SFPU_ITERATIONS 8

namespace ckernel {
enum class SfpuType { exponential, sqrt, reciprocal };
}

template <bool APPROXIMATE>
inline void llk_math_eltwise_unary_sfpu_exp(uint dst_index) {
    llk_math_eltwise_unary_sfpu_params(dst_index);
}

inline void llk_math_eltwise_unary_sfpu_sqrt_init() {
    llk_math_eltwise_unary_sfpu_init();
}
"#,
    );

    write(
        root,
        "ttnn/cpp/ttnn/operations/logger.hpp",
        r#"#pragma once
namespace ttnn {
void log(int level) { (void)level; }
void log(const char* message) { (void)message; }
struct Widget {
    int size() const { return 3; }
};
using Shape = int;
typedef unsigned int uint32_t_alias;
}
"#,
    );

    write(root, "ttnn/cpp/ttnn/tests/ignored.hpp", "void ignored_fn() {}\n");
    temp_dir
}

fn keys_and_signatures(db: &ApiDatabase) -> BTreeSet<(String, String)> {
    db.apis
        .values()
        .map(|entry| (entry.key.clone(), entry.signature.clone()))
        .collect()
}

#[test]
fn test_rebuild_is_idempotent() {
    let temp_dir = fixture_tree();
    let settings = settings_for(temp_dir.path());

    let (first, _) = build_database(&settings).unwrap();
    let (second, _) = build_database(&settings).unwrap();

    assert!(!first.apis.is_empty());
    assert_eq!(keys_and_signatures(&first), keys_and_signatures(&second));
    assert_eq!(first.headers, second.headers);
    assert_eq!(first.namespaces, second.namespaces);
}

#[test]
fn test_overloads_get_distinct_keys_under_one_base() {
    let temp_dir = fixture_tree();
    let (db, _) = build_database(&settings_for(temp_dir.path())).unwrap();

    let overloads: Vec<_> = db
        .apis
        .values()
        .filter(|entry| entry.base_key.as_deref() == Some("function::log"))
        .collect();

    assert_eq!(overloads.len(), 2);
    assert_ne!(overloads[0].key, overloads[1].key);
    for entry in overloads {
        assert!(entry.key.starts_with("function::log#"));
        let record = db.implementation_for(entry).unwrap();
        assert!(record.code.contains("(void)"));
    }
}

#[test]
fn test_body_and_initializer_boundary() {
    assert!(has_function_body("void f() const { return; }"));
    assert!(!has_function_body("void f(int x = Color{1,2,3})"));

    let temp_dir = fixture_tree();
    let (db, _) = build_database(&settings_for(temp_dir.path())).unwrap();

    let size = db
        .apis
        .values()
        .find(|entry| entry.name == "size" && entry.header.ends_with("logger.hpp"))
        .unwrap();
    assert!(size.has_implementation);
    assert_eq!(size.class.as_deref(), Some("Widget"));
}

#[test]
fn test_headers_follow_include_roots() {
    let temp_dir = fixture_tree();
    let (db, report) = build_database(&settings_for(temp_dir.path())).unwrap();

    assert_eq!(report.files_scanned, 2);
    assert!(
        db.headers
            .contains_key("hw/ckernels/wormhole_b0/metal/llk_api/llk_math_unary_sfpu_api.h")
    );
    assert!(db.headers.contains_key("ttnn/operations/logger.hpp"));
    assert!(db.apis.values().all(|entry| entry.name != "ignored_fn"));
}

#[test]
fn test_kinds_and_standard_seeds() {
    let temp_dir = fixture_tree();
    let (db, _) = build_database(&settings_for(temp_dir.path())).unwrap();

    assert!(db.apis.contains_key("macro::SFPU_ITERATIONS"));
    assert!(db.apis.contains_key("struct::Widget"));
    assert!(
        db.apis
            .values()
            .any(|e| e.kind == SymbolKind::TemplateFunction && e.name == "llk_math_eltwise_unary_sfpu_exp")
    );
    assert!(
        db.apis
            .values()
            .any(|e| e.kind == SymbolKind::EnumValue && e.name == "reciprocal")
    );

    let seeded: Vec<_> = db
        .apis
        .values()
        .filter(|e| e.header == STANDARD_LIBRARY_HEADER)
        .collect();
    assert!(seeded.iter().any(|e| e.name == "std::move"));
    assert!(seeded.iter().all(|e| !e.has_implementation));
}

#[test]
fn test_snapshot_roundtrip() {
    let temp_dir = fixture_tree();
    let (db, _) = build_database(&settings_for(temp_dir.path())).unwrap();

    let path = temp_dir.path().join(".atlas/api_db.json");
    db.save(&path).unwrap();
    let loaded = ApiDatabase::load(&path).unwrap();

    assert_eq!(keys_and_signatures(&db), keys_and_signatures(&loaded));
    assert_eq!(loaded.metadata.total_apis, loaded.apis.len());
    assert_eq!(loaded.metadata.files_scanned, 2);
    assert!(loaded.dangling_keys().is_empty());
}

#[test]
fn test_load_missing_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let err = ApiDatabase::load(&temp_dir.path().join("absent.json")).unwrap_err();
    assert!(err.is_not_found());
}
