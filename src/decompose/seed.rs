//! Locating the seed function's source text.

use regex::Regex;

use crate::parsing::heuristics::{function_name, signature_of};
use crate::parsing::{NodePattern, ParseResult, SyntaxAdapter};

/// Definition of `name` found by the kernel-style header pattern
/// `[inline] void|int|auto|ALWI name(...) {`, extended to its closing brace.
pub fn find_by_pattern(source: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r"(?:inline\s+)?(?:void|int|auto|ALWI)\s+{}\s*\([^)]*\)\s*\{{",
        regex::escape(name)
    );
    let re = Regex::new(&pattern).ok()?;
    let found = re.find(source)?;

    let start = found.start();
    let open = start + source[start..].find('{')?;
    let end = matching_brace(source, open).unwrap_or(source.len());
    Some(source[start..end].to_string())
}

/// Byte offset just past the brace closing the one at `open`.
fn matching_brace(source: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in source[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Any function definition named `name` or `...::name`.
pub fn find_by_definition<A: SyntaxAdapter>(
    adapter: &mut A,
    source: &str,
    name: &str,
) -> ParseResult<Option<String>> {
    let definitions = adapter.collect(source, NodePattern::FunctionDefinitions)?;
    let suffix = format!("::{name}");

    Ok(definitions
        .into_iter()
        .find(|node| {
            let defined = function_name(&signature_of(&node.text));
            defined == name || defined.ends_with(&suffix)
        })
        .map(|node| node.text))
}

/// Pattern first, then the parse tree.
pub fn find_seed<A: SyntaxAdapter>(
    adapter: &mut A,
    source: &str,
    name: &str,
) -> ParseResult<Option<String>> {
    if let Some(body) = find_by_pattern(source, name) {
        return Ok(Some(body));
    }
    find_by_definition(adapter, source, name)
}
