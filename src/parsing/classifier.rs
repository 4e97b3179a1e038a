//! Node classification.
//!
//! Turns the flat node list of one file into a [`FileExtraction`]. Nodes are
//! ordered by `(start, Reverse(end))` so every node is seen after the nodes
//! enclosing it, which is what the context tracker relies on.

use crate::parsing::adapter::{NodeDescriptor, NodeKind, NodePattern, ParseResult, SyntaxAdapter};
use crate::parsing::context::{ContextTracker, LexicalContext, context_kind, context_name};
use crate::parsing::extraction::{FileExtraction, FunctionRecord, NamedDecl, Reference, ReferenceKind};
use crate::parsing::heuristics::{self, QualifiedUsage};
use crate::types::ByteRange;
use std::cmp::Reverse;

/// Parse and classify one source file.
pub fn classify_source<A: SyntaxAdapter>(adapter: &mut A, source: &str) -> ParseResult<FileExtraction> {
    let nodes = adapter.collect(source, NodePattern::Declarations)?;
    Ok(classify_nodes(nodes))
}

/// Classify an already collected node list.
pub fn classify_nodes(mut nodes: Vec<NodeDescriptor>) -> FileExtraction {
    nodes.sort_by_key(|node| (node.range.start, Reverse(node.range.end)));

    let mut classifier = Classifier::default();
    for index in 0..nodes.len() {
        classifier.visit(&nodes, index);
    }

    let mut extraction = classifier.extraction;
    extraction.finalize();
    extraction
}

#[derive(Default)]
struct Classifier {
    tracker: ContextTracker,
    extraction: FileExtraction,
    /// Ranges of function definitions seen so far that may still enclose nodes.
    bodies: Vec<ByteRange>,
    /// Ranges of function template declarations.
    templates: Vec<ByteRange>,
    last_qualified: Option<ByteRange>,
}

impl Classifier {
    fn visit(&mut self, nodes: &[NodeDescriptor], index: usize) {
        let node = &nodes[index];
        let start = node.range.start;

        self.tracker.advance(start);
        self.bodies.retain(|range| range.end > start);
        self.templates.retain(|range| range.end > start);

        if let Some(kind) = context_kind(node.kind) {
            self.tracker.enter(LexicalContext {
                kind,
                name: context_name(nodes, index),
                range: node.range,
            });
        }

        if node.text.trim().is_empty() {
            return;
        }

        match node.kind {
            NodeKind::FunctionDefinition => self.function_definition(node),
            NodeKind::TemplateDeclaration => self.template_declaration(node),
            NodeKind::Declaration => self.declaration(node),
            NodeKind::FieldDeclaration => self.field_declaration(node),
            NodeKind::ClassSpecifier => {
                if !self.in_body(node) {
                    if let Some(name) = heuristics::class_name(&node.text) {
                        self.extraction.classes.push(name);
                    }
                }
            }
            NodeKind::StructSpecifier => {
                if !self.in_body(node) {
                    if let Some(name) = heuristics::struct_name(&node.text) {
                        self.extraction.structs.push(name);
                    }
                }
            }
            NodeKind::EnumSpecifier => self.enumeration(node),
            NodeKind::TypeDefinition => {
                let name = heuristics::typedef_name(&node.text);
                if !name.is_empty() {
                    self.extraction
                        .typedefs
                        .push(NamedDecl::new(name, declaration_text(&node.text)));
                }
            }
            NodeKind::UsingDeclaration | NodeKind::AliasDeclaration => self.using(node),
            NodeKind::PreprocDef | NodeKind::PreprocFunctionDef => {
                let function_like = node.kind == NodeKind::PreprocFunctionDef;
                if let Some((name, signature)) = heuristics::macro_signature(&node.text, function_like) {
                    self.extraction.macros.push(NamedDecl::new(name, signature));
                }
            }
            NodeKind::QualifiedIdentifier => self.qualified_identifier(node),
            NodeKind::CallExpression => {
                if let Some(name) = heuristics::call_name(&node.text) {
                    if !heuristics::is_control_keyword(&name) {
                        self.extraction.references.push(Reference {
                            name,
                            kind: ReferenceKind::Call,
                        });
                    }
                }
            }
            NodeKind::NamespaceDefinition | NodeKind::TypeIdentifier | NodeKind::NamespaceIdentifier => {}
        }
    }

    /// Strictly inside a function body seen earlier.
    fn in_body(&self, node: &NodeDescriptor) -> bool {
        self.bodies
            .iter()
            .any(|range| *range != node.range && range.encloses(&node.range))
    }

    /// The declared entity of an enclosing function template.
    fn in_template_function(&self, node: &NodeDescriptor) -> bool {
        self.templates
            .iter()
            .any(|range| range.end == node.range.end && range.encloses(&node.range))
    }

    fn function_definition(&mut self, node: &NodeDescriptor) {
        if self.in_template_function(node) || self.in_body(node) {
            return;
        }
        self.bodies.push(node.range);

        let Some(record) = FunctionRecord::from_definition(&node.text) else {
            return;
        };

        if record.is_qualified() {
            let mut parts = record.name.rsplit("::");
            let last = parts.next().unwrap_or_default();
            let owner = parts.next().unwrap_or_default();
            if last == owner {
                self.extraction.constructors.push(owner.to_string());
            } else {
                self.extraction.functions.push(record);
            }
            return;
        }

        if let Some(class) = self.tracker.innermost_type() {
            let class = class.name.clone();
            if record.name == class {
                self.extraction.constructors.push(class);
            } else {
                self.extraction
                    .member_functions_mut(&class)
                    .push(record.with_class(class.as_str()));
            }
        } else if self.tracker.in_type() {
            self.extraction.methods.push(record);
        } else {
            self.extraction.functions.push(record);
        }
    }

    fn template_declaration(&mut self, node: &NodeDescriptor) {
        if heuristics::is_template_type(&node.text) || self.in_body(node) {
            return;
        }
        if !node.text.contains('(') || !node.text.contains(')') {
            return;
        }

        self.templates.push(node.range);
        if heuristics::has_function_body(&node.text) {
            self.bodies.push(node.range);
        }

        if let Some(record) = FunctionRecord::from_definition(&node.text) {
            self.extraction.template_functions.push(record);
        }
    }

    fn declaration(&mut self, node: &NodeDescriptor) {
        if self.in_body(node) || self.in_template_function(node) {
            return;
        }

        let text = node.text.trim();
        if text == ";" || heuristics::is_initialization(text) {
            return;
        }

        if text.contains('(') && text.contains(')') {
            if heuristics::is_function_declaration(text) {
                if let Some(record) = FunctionRecord::from_prototype(text) {
                    self.extraction.functions.push(record);
                }
            }
            return;
        }

        if !self.tracker.in_type() && heuristics::is_constant_declaration(text) {
            let name = heuristics::constant_name(text);
            if !name.is_empty() {
                self.extraction
                    .constants
                    .push(NamedDecl::new(name, declaration_text(text)));
            }
        }
    }

    fn field_declaration(&mut self, node: &NodeDescriptor) {
        let text = node.text.trim();
        if self.in_body(node) || !text.contains('(') || !text.contains(')') {
            return;
        }
        if text.contains("(*") || heuristics::is_initialization(text) {
            return;
        }

        let Some(record) = FunctionRecord::from_prototype(text) else {
            return;
        };

        match self.tracker.innermost_type() {
            Some(class) => {
                let class = class.name.clone();
                self.extraction
                    .member_functions_mut(&class)
                    .push(record.with_class(class.as_str()));
            }
            None => self.extraction.methods.push(record),
        }
    }

    fn enumeration(&mut self, node: &NodeDescriptor) {
        if self.in_body(node) {
            return;
        }
        let Some(parts) = heuristics::enum_parts(&node.text) else {
            return;
        };

        for value in &parts.values {
            self.extraction
                .enum_values
                .push(format!("{}::{value}", parts.name));
        }
        self.extraction.enums.push(parts.name);
    }

    fn using(&mut self, node: &NodeDescriptor) {
        let text = node.text.trim();
        if text.starts_with("using namespace") {
            return;
        }
        let name = heuristics::using_name(text);
        if !name.is_empty() {
            self.extraction
                .usings
                .push(NamedDecl::new(name, declaration_text(text)));
        }
    }

    fn qualified_identifier(&mut self, node: &NodeDescriptor) {
        // Nested qualified identifiers repeat the tail of the outer one.
        if self
            .last_qualified
            .is_some_and(|outer| outer.encloses(&node.range))
        {
            return;
        }
        self.last_qualified = Some(node.range);

        let name = heuristics::collapse_whitespace(&node.text);
        match heuristics::qualified_usage(&name) {
            Some(QualifiedUsage::EnumValue) => {
                self.extraction.enum_values.push(name.clone());
                self.extraction.references.push(Reference {
                    name,
                    kind: ReferenceKind::EnumValue,
                });
            }
            Some(QualifiedUsage::Function) => {
                self.extraction.references.push(Reference {
                    name,
                    kind: ReferenceKind::Function,
                });
            }
            None => {}
        }
    }
}

fn declaration_text(text: &str) -> String {
    heuristics::collapse_whitespace(text)
        .trim_end_matches(';')
        .trim_end()
        .to_string()
}
