//! Fuzzy lookup and keyword listing over a built kernel API tree.

use std::fs;
use std::path::Path;

use cxx_atlas::config::ResolverConfig;
use cxx_atlas::resolve::{ResolverOptions, rank};
use cxx_atlas::tools::{find_similar_symbols, query_keyword_functions};
use cxx_atlas::{ApiDatabase, Settings, build_database, find_similar, query_keyword};
use tempfile::TempDir;

const LLK_DIR: &str = "tt_metal/hw/ckernels/wormhole_b0/metal/llk_api";
const LLK_PATH: &str = "hw/ckernels/wormhole_b0/metal/llk_api";

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn kernel_api_db() -> ApiDatabase {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        &format!("{LLK_DIR}/llk_math_unary_sfpu_api.h"),
        r#"#pragma once
inline void llk_math_exp_init() {}
inline void llk_math_eltwise_unary_sfpu_sqrt(uint dst_index) {}
inline void llk_math_eltwise_unary_sfpu_sqrt_init() {}
"#,
    );
    write(
        root,
        &format!("{LLK_DIR}/llk_pack_api.h"),
        "inline void llk_packer_init() {}\ninline void llk_pack_sqrt_hint(uint tile) {}\n",
    );
    write(
        root,
        "ttnn/cpp/ttnn/operations/eltwise/unary.hpp",
        "namespace ttnn {\nTensor sqrt(const Tensor& input);\n}\n",
    );

    let mut settings = Settings::default();
    settings.source.root = root.to_path_buf();
    settings.source.parallel_threads = 2;
    build_database(&settings).unwrap().0
}

fn options() -> ResolverOptions {
    ResolverOptions::from(&ResolverConfig::default())
}

#[test]
fn test_exact_name_ranks_first_with_full_score() {
    let db = kernel_api_db();
    let results = find_similar(&db, "llk_packer_init", &options());

    assert_eq!(results[0].name, "llk_packer_init");
    assert_eq!(results[0].similarity, 1.0);
    assert_eq!(results[0].include, "#include <llk_api/llk_pack_api.h>");
    assert!(results.iter().all(|r| r.similarity > 0.3));
}

#[test]
fn test_typo_ranks_intended_symbol_above_unrelated() {
    let db = kernel_api_db();

    let ranked = rank(&db, "mth_exp", &options().search_paths);
    let position = |name: &str| ranked.iter().position(|(_, entry)| entry.name == name).unwrap();
    assert!(position("llk_math_exp_init") < position("llk_packer_init"));

    let results = find_similar(&db, "llk_mth_exp_init", &options());
    assert_eq!(results[0].name, "llk_math_exp_init");
    assert!(results[0].similarity >= 0.3);
}

#[test]
fn test_keyword_excludes_names_outside_kernel_path() {
    let db = kernel_api_db();
    let matches = query_keyword(&db, LLK_PATH, "sqrt");

    assert_eq!(matches.total_signatures(), 3);
    assert_eq!(matches.headers[0].include, "#include <llk_api/llk_math_unary_sfpu_api.h>");
    assert_eq!(matches.headers[0].signatures.len(), 2);
    assert!(
        matches
            .headers
            .iter()
            .flat_map(|h| &h.signatures)
            .all(|signature| !signature.contains("Tensor"))
    );
}

#[test]
fn test_tool_outcomes_serialize_like_the_wire_format() {
    let db = kernel_api_db();

    let similar = find_similar_symbols(Ok(&db), "llk_packer_init", &options().with_max_results(1));
    let json: serde_json::Value = serde_json::from_str(&similar.to_json_pretty()).unwrap();
    assert_eq!(json["query"], "llk_packer_init");
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
    assert_eq!(json["results"][0]["type"], "function");
    assert!(
        json["results"][0]["signature"]
            .as_str()
            .unwrap()
            .ends_with("void llk_packer_init()")
    );

    let keyword = query_keyword_functions(Ok(&db), LLK_PATH, "SQRT");
    let json: serde_json::Value = serde_json::from_str(&keyword.to_json_pretty()).unwrap();
    assert_eq!(json["keyword"], "SQRT");
    assert_eq!(json["headers"].as_array().unwrap().len(), 2);
}

#[test]
fn test_custom_search_path_reaches_other_trees() {
    let db = kernel_api_db();
    let opts = options().with_search_paths(vec!["ttnn".to_string()]);

    let results = find_similar(&db, "sqrt", &opts);
    assert_eq!(results[0].name, "sqrt");
    assert_eq!(results[0].include, "#include <ttnn/operations/eltwise/unary.hpp>");
}
