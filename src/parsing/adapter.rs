//! Syntax adapter seam.
//!
//! The classifier and decomposer never touch tree-sitter directly. They ask
//! an adapter for the nodes matching a [`NodePattern`] and receive plain
//! [`NodeDescriptor`] values: a kind, a byte range and the exact source text.

use crate::types::ByteRange;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to set up C++ grammar: {reason}")]
    LanguageSetup { reason: String },

    #[error("Parser produced no syntax tree{context}")]
    ParseFailed { context: String },
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    pub fn failed() -> Self {
        Self::ParseFailed {
            context: String::new(),
        }
    }
}

/// Grammar node kinds the knowledge base cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Declaration,
    FunctionDefinition,
    TemplateDeclaration,
    NamespaceDefinition,
    ClassSpecifier,
    StructSpecifier,
    EnumSpecifier,
    TypeDefinition,
    UsingDeclaration,
    AliasDeclaration,
    FieldDeclaration,
    PreprocDef,
    PreprocFunctionDef,
    TypeIdentifier,
    NamespaceIdentifier,
    QualifiedIdentifier,
    CallExpression,
}

impl NodeKind {
    pub fn from_grammar(kind: &str) -> Option<Self> {
        let kind = match kind {
            "declaration" => NodeKind::Declaration,
            "function_definition" => NodeKind::FunctionDefinition,
            "template_declaration" => NodeKind::TemplateDeclaration,
            "namespace_definition" => NodeKind::NamespaceDefinition,
            "class_specifier" => NodeKind::ClassSpecifier,
            "struct_specifier" => NodeKind::StructSpecifier,
            "enum_specifier" => NodeKind::EnumSpecifier,
            "type_definition" => NodeKind::TypeDefinition,
            "using_declaration" => NodeKind::UsingDeclaration,
            "alias_declaration" => NodeKind::AliasDeclaration,
            "field_declaration" => NodeKind::FieldDeclaration,
            "preproc_def" => NodeKind::PreprocDef,
            "preproc_function_def" => NodeKind::PreprocFunctionDef,
            "type_identifier" => NodeKind::TypeIdentifier,
            "namespace_identifier" => NodeKind::NamespaceIdentifier,
            "qualified_identifier" => NodeKind::QualifiedIdentifier,
            "call_expression" => NodeKind::CallExpression,
            _ => return None,
        };
        Some(kind)
    }

    /// True for nodes that open a lexical context.
    pub fn opens_context(&self) -> bool {
        matches!(
            self,
            NodeKind::NamespaceDefinition | NodeKind::ClassSpecifier | NodeKind::StructSpecifier
        )
    }

    /// True for identifier nodes that can name a context.
    pub fn names_context(&self) -> bool {
        matches!(self, NodeKind::TypeIdentifier | NodeKind::NamespaceIdentifier)
    }
}

/// Which node kinds a collection pass should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePattern {
    /// Everything the classifier dispatches on.
    Declarations,
    Calls,
    FunctionDefinitions,
}

impl NodePattern {
    pub fn accepts(&self, kind: NodeKind) -> bool {
        match self {
            NodePattern::Declarations => true,
            NodePattern::Calls => kind == NodeKind::CallExpression,
            NodePattern::FunctionDefinitions => kind == NodeKind::FunctionDefinition,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub kind: NodeKind,
    pub range: ByteRange,
    pub text: String,
}

impl NodeDescriptor {
    pub fn new(kind: NodeKind, start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            range: ByteRange::new(start, end),
            text: text.into(),
        }
    }
}

/// Source of syntax nodes for one language.
///
/// Implementations hold a parser and are used from one thread at a time.
pub trait SyntaxAdapter {
    /// Parse `source` and return every node accepted by `pattern`, in
    /// pre-order (enclosing nodes before the nodes they contain).
    fn collect(&mut self, source: &str, pattern: NodePattern) -> ParseResult<Vec<NodeDescriptor>>;
}
