//! Call discovery inside one function body.

use crate::parsing::heuristics::{call_name, is_excluded_call};
use crate::parsing::{NodePattern, ParseResult, SyntaxAdapter};

/// Callee names in source order. Repeated calls are kept.
pub fn find_calls<A: SyntaxAdapter>(adapter: &mut A, body: &str) -> ParseResult<Vec<String>> {
    let nodes = adapter.collect(body, NodePattern::Calls)?;

    Ok(nodes
        .iter()
        .filter_map(|node| call_name(&node.text))
        .filter(|name| !is_excluded_call(name))
        .collect())
}
