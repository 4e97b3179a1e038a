use crate::parsing::adapter::{
    NodeDescriptor, NodeKind, NodePattern, ParseError, ParseResult, SyntaxAdapter,
};
use tree_sitter::Parser;

/// tree-sitter backed adapter for C and C++ sources.
pub struct CppAdapter {
    parser: Parser,
}

impl std::fmt::Debug for CppAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CppAdapter")
            .field("language", &"C++")
            .finish()
    }
}

impl CppAdapter {
    pub fn new() -> ParseResult<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .map_err(|e| ParseError::LanguageSetup {
                reason: e.to_string(),
            })?;

        Ok(Self { parser })
    }
}

impl SyntaxAdapter for CppAdapter {
    fn collect(&mut self, source: &str, pattern: NodePattern) -> ParseResult<Vec<NodeDescriptor>> {
        let tree = self.parser.parse(source, None).ok_or_else(ParseError::failed)?;

        let mut nodes = Vec::new();
        let mut cursor = tree.walk();

        // Iterative pre-order walk
        'walk: loop {
            let node = cursor.node();
            if let Some(kind) = NodeKind::from_grammar(node.kind()) {
                if pattern.accepts(kind) {
                    if let Some(text) = source.get(node.start_byte()..node.end_byte()) {
                        nodes.push(NodeDescriptor::new(
                            kind,
                            node.start_byte(),
                            node.end_byte(),
                            text,
                        ));
                    }
                }
            }

            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    continue 'walk;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        Ok(nodes)
    }
}
