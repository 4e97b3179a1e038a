pub mod adapter;
pub mod classifier;
pub mod context;
pub mod cpp;
pub mod extraction;
pub mod heuristics;

pub use adapter::{NodeDescriptor, NodeKind, NodePattern, ParseError, ParseResult, SyntaxAdapter};
pub use classifier::{classify_nodes, classify_source};
pub use context::{ContextTracker, LexicalContext};
pub use cpp::CppAdapter;
pub use extraction::{FileExtraction, FunctionRecord, NamedDecl, Reference, ReferenceKind};
