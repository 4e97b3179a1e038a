//! Lexical context tracking.
//!
//! Nodes are visited in `(start, Reverse(end))` order. Before a node is
//! classified, every context that ended at or before its start is popped, so
//! the stack always holds exactly the namespaces and types enclosing it.

use crate::parsing::adapter::{NodeDescriptor, NodeKind};
use crate::types::{ByteRange, ContextKind};

/// Name given to namespaces and types without one.
pub const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalContext {
    pub kind: ContextKind,
    pub name: String,
    pub range: ByteRange,
}

impl LexicalContext {
    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS
    }
}

#[derive(Debug, Default)]
pub struct ContextTracker {
    stack: Vec<LexicalContext>,
}

impl ContextTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop every context that ends at or before `start`.
    pub fn advance(&mut self, start: usize) {
        while self
            .stack
            .last()
            .is_some_and(|ctx| ctx.range.end <= start)
        {
            self.stack.pop();
        }
    }

    pub fn enter(&mut self, context: LexicalContext) {
        self.stack.push(context);
    }

    pub fn stack(&self) -> &[LexicalContext] {
        &self.stack
    }

    /// Innermost named class or struct, if any.
    pub fn innermost_type(&self) -> Option<&LexicalContext> {
        self.stack
            .iter()
            .rev()
            .find(|ctx| ctx.kind.is_type())
            .filter(|ctx| !ctx.is_anonymous())
    }

    pub fn in_type(&self) -> bool {
        self.stack.iter().any(|ctx| ctx.kind.is_type())
    }
}

pub fn context_kind(kind: NodeKind) -> Option<ContextKind> {
    match kind {
        NodeKind::NamespaceDefinition => Some(ContextKind::Namespace),
        NodeKind::ClassSpecifier => Some(ContextKind::Class),
        NodeKind::StructSpecifier => Some(ContextKind::Struct),
        _ => None,
    }
}

/// Name of the context opened by `nodes[index]`: the first type or namespace
/// identifier in its header (before the body's `{`).
pub fn context_name(nodes: &[NodeDescriptor], index: usize) -> String {
    let Some(node) = nodes.get(index) else {
        return ANONYMOUS.to_string();
    };
    let header_end = node.range.start + node.text.find('{').unwrap_or(node.text.len());

    nodes[index + 1..]
        .iter()
        .take_while(|other| other.range.start < node.range.end)
        .find(|other| {
            other.kind.names_context()
                && other.range.start < header_end
                && node.range.encloses(&other.range)
        })
        .map(|other| other.text.clone())
        .unwrap_or_else(|| ANONYMOUS.to_string())
}
