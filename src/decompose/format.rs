//! Text rendering of a decomposition.

use crate::decompose::decomposer::Decomposition;

#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Per-function comments and a trailing summary block
    pub annotate: bool,
    /// Missing names listed in the summary
    pub missing_preview: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            annotate: false,
            missing_preview: 5,
        }
    }
}

/// Dependencies in order, each followed by a blank line, then the seed.
pub fn render(decomposition: &Decomposition, options: FormatOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    for function in &decomposition.functions {
        if function.name == decomposition.seed {
            continue;
        }
        if options.annotate {
            lines.push(if function.dependencies.is_empty() {
                format!("// {}: depth {}, leaf", function.name, function.depth)
            } else {
                let callees: Vec<&str> = function.dependencies.iter().map(String::as_str).collect();
                format!(
                    "// {}: depth {}, calls {}",
                    function.name,
                    function.depth,
                    callees.join(", ")
                )
            });
        }
        lines.push(function.body.clone());
        lines.push(String::new());
    }

    if let Some(seed) = decomposition.seed_function() {
        if options.annotate {
            lines.push("// Original function".to_string());
        }
        lines.push(seed.body.clone());
    }

    if options.annotate {
        lines.push("\n/*".to_string());
        lines.push("Dependency Analysis Summary:".to_string());
        lines.push(format!("  Total functions: {}", decomposition.total_functions()));
        lines.push(format!("  Maximum depth: {}", decomposition.max_depth()));
        if !decomposition.missing.is_empty() {
            lines.push(format!(
                "  Missing implementations: {}",
                decomposition.missing.len()
            ));
            for name in decomposition.missing.iter().take(options.missing_preview) {
                lines.push(format!("    - {name}"));
            }
        }
        lines.push("*/".to_string());
    }

    lines.join("\n")
}
