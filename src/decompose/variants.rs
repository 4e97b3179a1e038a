//! Equivalent spellings of a function name.
//!
//! Kernel code mixes scoped (`ckernel::math_exp`) and flattened
//! (`ckernel_math_exp`) names for the same function.

use indexmap::IndexSet;

/// Candidate names for `name`, original first, without duplicates.
///
/// - `a::b::c` adds `a_b_c`, `c`
/// - `a_b_c` adds `a::b_c`, `a_b::c`
pub fn name_variants(name: &str) -> Vec<String> {
    let mut variants = IndexSet::new();
    variants.insert(name.to_string());

    if name.contains("::") {
        let parts: Vec<&str> = name.split("::").collect();
        variants.insert(name.replace("::", "_"));
        if let Some(last) = parts.last() {
            variants.insert((*last).to_string());
        }
        variants.insert(parts.join("_"));
    } else if name.contains('_') {
        let parts: Vec<&str> = name.split('_').collect();
        for split in 1..parts.len() {
            variants.insert(format!("{}::{}", parts[..split].join("_"), parts[split..].join("_")));
        }
    }

    variants.into_iter().collect()
}
