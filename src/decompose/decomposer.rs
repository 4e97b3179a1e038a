//! Transitive call closure of a seed function.
//!
//! Expansion is depth-first with an explicit frame stack. A name is marked
//! visited when first met, so each name is expanded at most once and direct
//! or mutual recursion terminates. Names no variant resolves go to the
//! missing set; expansion carries on with the remaining calls.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use crate::decompose::calls::find_calls;
use crate::decompose::graph::CallGraph;
use crate::decompose::index::FunctionIndex;
use crate::decompose::seed::find_seed;
use crate::error::{IndexError, IndexResult};
use crate::parsing::{CppAdapter, ParseResult, SyntaxAdapter};
use crate::storage::ApiDatabase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedFunction {
    pub name: String,
    pub body: String,
    /// Every callee named in the body, resolved or not
    pub dependencies: BTreeSet<String>,
    /// Distance from the seed at first discovery
    pub depth: usize,
}

/// Functions in dependency order, seed included when it was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    pub seed: String,
    pub functions: Vec<DecomposedFunction>,
    pub missing: BTreeSet<String>,
}

impl Decomposition {
    pub fn total_functions(&self) -> usize {
        self.functions.len()
    }

    pub fn max_depth(&self) -> usize {
        self.functions.iter().map(|f| f.depth).max().unwrap_or(0)
    }

    pub fn seed_function(&self) -> Option<&DecomposedFunction> {
        self.functions.iter().find(|f| f.name == self.seed)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.iter().map(|f| f.name.as_str()).collect()
    }
}

struct Frame {
    name: String,
    body: String,
    depth: usize,
    calls: Vec<String>,
    next: usize,
    dependencies: BTreeSet<String>,
}

impl Frame {
    fn open<A: SyntaxAdapter>(adapter: &mut A, name: String, body: String, depth: usize) -> ParseResult<Self> {
        let calls = find_calls(adapter, &body)?;
        Ok(Self {
            name,
            body,
            depth,
            calls,
            next: 0,
            dependencies: BTreeSet::new(),
        })
    }

    fn next_call(&mut self) -> Option<String> {
        let call = self.calls.get(self.next)?.clone();
        self.next += 1;
        self.dependencies.insert(call.clone());
        Some(call)
    }

    fn finish(self) -> DecomposedFunction {
        DecomposedFunction {
            name: self.name,
            body: self.body,
            dependencies: self.dependencies,
            depth: self.depth,
        }
    }
}

pub struct Decomposer<'db, A: SyntaxAdapter = CppAdapter> {
    db: &'db ApiDatabase,
    index: FunctionIndex,
    adapter: A,
}

impl<'db> Decomposer<'db, CppAdapter> {
    pub fn new(db: &'db ApiDatabase) -> ParseResult<Self> {
        Ok(Self::with_adapter(db, CppAdapter::new()?))
    }
}

impl<'db, A: SyntaxAdapter> Decomposer<'db, A> {
    pub fn with_adapter(db: &'db ApiDatabase, adapter: A) -> Self {
        Self {
            db,
            index: FunctionIndex::build(db),
            adapter,
        }
    }

    pub fn index(&self) -> &FunctionIndex {
        &self.index
    }

    /// Decompose `function` starting from its definition in `path`.
    pub fn decompose_file(&mut self, path: &Path, function: &str) -> IndexResult<Decomposition> {
        if !path.is_file() {
            return Err(IndexError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path).map_err(|e| IndexError::file_read(path, e))?;
        let source = String::from_utf8_lossy(&bytes);
        self.decompose_source(&source, function)
            .map_err(|e| IndexError::parse(path, e))
    }

    /// Seed from `source`, falling back to the database. An unknown seed
    /// yields an empty decomposition with the seed reported missing.
    pub fn decompose_source(&mut self, source: &str, function: &str) -> ParseResult<Decomposition> {
        let seed_body = match find_seed(&mut self.adapter, source, function)? {
            Some(body) => Some(body),
            None => self.index.resolve(self.db, function).map(str::to_string),
        };

        let Some(seed_body) = seed_body else {
            crate::debug_event!("decompose", "seed not found", "{function}");
            return Ok(Decomposition {
                seed: function.to_string(),
                functions: Vec::new(),
                missing: BTreeSet::from([function.to_string()]),
            });
        };

        self.expand(function, seed_body)
    }

    fn expand(&mut self, seed: &str, seed_body: String) -> ParseResult<Decomposition> {
        let mut visited: HashSet<String> = HashSet::from([seed.to_string()]);
        let mut missing = BTreeSet::new();
        let mut completed = Vec::new();
        let mut stack = vec![Frame::open(&mut self.adapter, seed.to_string(), seed_body, 0)?];

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.next_call().map(|call| (call, frame.depth)),
                None => break,
            };

            let Some((call, depth)) = next else {
                if let Some(frame) = stack.pop() {
                    completed.push(frame.finish());
                }
                continue;
            };

            if !visited.insert(call.clone()) {
                continue;
            }

            match self.index.resolve(self.db, &call) {
                Some(code) => {
                    let frame = Frame::open(&mut self.adapter, call, code.to_string(), depth + 1)?;
                    stack.push(frame);
                }
                None => {
                    crate::debug_event!("decompose", "missing", "{call}");
                    missing.insert(call);
                }
            }
        }

        let order = CallGraph::from_functions(&completed).dependency_order();
        let mut by_name: HashMap<String, DecomposedFunction> = completed
            .into_iter()
            .map(|function| (function.name.clone(), function))
            .collect();
        let functions = order
            .iter()
            .filter_map(|name| by_name.remove(name))
            .collect();

        Ok(Decomposition {
            seed: seed.to_string(),
            functions,
            missing,
        })
    }
}
