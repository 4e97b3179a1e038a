//! Dependency decomposition: a seed function plus everything it
//! transitively calls, ordered dependencies first.

pub mod calls;
pub mod decomposer;
pub mod format;
pub mod graph;
pub mod index;
pub mod seed;
pub mod variants;

pub use decomposer::{DecomposedFunction, Decomposer, Decomposition};
pub use format::{FormatOptions, render};
pub use graph::CallGraph;
pub use index::FunctionIndex;
pub use variants::name_variants;
