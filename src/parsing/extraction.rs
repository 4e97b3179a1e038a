//! Typed per-file extraction result.

use crate::parsing::heuristics;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A function-like declaration or definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub signature: String,
    pub implementation: Option<String>,
    pub parameters: String,
    pub param_types: Vec<String>,
    pub return_type: String,
    pub class: Option<String>,
}

impl FunctionRecord {
    /// Build a record from a definition's full text. The implementation is
    /// kept only when the text carries a genuine body.
    pub fn from_definition(text: &str) -> Option<Self> {
        let implementation = heuristics::has_function_body(text).then(|| text.trim().to_string());
        Self::build(text, implementation)
    }

    /// Build a record from a prototype.
    pub fn from_prototype(text: &str) -> Option<Self> {
        Self::build(text, None)
    }

    fn build(text: &str, implementation: Option<String>) -> Option<Self> {
        let signature = heuristics::normalize_signature(&heuristics::signature_of(text));
        let name = heuristics::function_name(&signature);
        if name.is_empty() {
            return None;
        }

        let parameters = heuristics::parameters(&signature);
        let param_types = heuristics::parameter_types(&parameters);
        let return_type = heuristics::return_type(&signature);

        Some(Self {
            name,
            signature,
            implementation,
            parameters,
            param_types,
            return_type,
            class: None,
        })
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn has_implementation(&self) -> bool {
        self.implementation.is_some()
    }

    /// Qualified names that do not start at the global scope.
    pub fn is_qualified(&self) -> bool {
        self.name.contains("::") && !self.name.starts_with("::")
    }
}

/// A named declaration kept as normalized text: typedefs, usings, macros
/// and constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedDecl {
    pub name: String,
    pub signature: String,
}

impl NamedDecl {
    pub fn new(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: signature.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    EnumValue,
    Function,
    Call,
}

/// A usage seen in the file. Only enum-value usages reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    pub functions: Vec<FunctionRecord>,
    pub template_functions: Vec<FunctionRecord>,
    pub methods: Vec<FunctionRecord>,
    pub member_functions: BTreeMap<String, Vec<FunctionRecord>>,
    pub classes: Vec<String>,
    pub structs: Vec<String>,
    pub enums: Vec<String>,
    pub enum_values: Vec<String>,
    pub typedefs: Vec<NamedDecl>,
    pub usings: Vec<NamedDecl>,
    pub macros: Vec<NamedDecl>,
    pub constants: Vec<NamedDecl>,
    pub constructors: Vec<String>,
    pub references: Vec<Reference>,
}

impl FileExtraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Member function list for `class`, created on first use.
    pub fn member_functions_mut(&mut self, class: &str) -> &mut Vec<FunctionRecord> {
        self.member_functions.entry(class.to_string()).or_default()
    }

    /// Number of symbols the store will see from this file.
    pub fn symbol_count(&self) -> usize {
        self.functions.len()
            + self.template_functions.len()
            + self.methods.len()
            + self.member_functions.values().map(Vec::len).sum::<usize>()
            + self.classes.len()
            + self.structs.len()
            + self.enums.len()
            + self.enum_values.len()
            + self.typedefs.len()
            + self.usings.len()
            + self.macros.len()
            + self.constants.len()
    }

    pub fn implementation_count(&self) -> usize {
        self.functions
            .iter()
            .chain(&self.template_functions)
            .chain(&self.methods)
            .chain(self.member_functions.values().flatten())
            .filter(|f| f.has_implementation())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_count() == 0
    }

    /// Clean-up run once per file after classification.
    ///
    /// 1. De-duplicate every category (functions by signature).
    /// 2. Move qualified methods to the free-function list.
    /// 3. Fold constructor class names into the class list.
    /// 4. Drop exact duplicates left in the function list.
    pub fn finalize(&mut self) {
        dedupe_functions(&mut self.functions);
        dedupe_functions(&mut self.template_functions);
        dedupe_functions(&mut self.methods);
        for records in self.member_functions.values_mut() {
            dedupe_functions(records);
        }
        self.member_functions.retain(|_, records| !records.is_empty());

        dedupe(&mut self.classes);
        dedupe(&mut self.structs);
        dedupe(&mut self.enums);
        dedupe(&mut self.enum_values);
        dedupe(&mut self.typedefs);
        dedupe(&mut self.usings);
        dedupe(&mut self.macros);
        dedupe(&mut self.constants);
        dedupe(&mut self.constructors);
        dedupe(&mut self.references);

        let (qualified, plain): (Vec<_>, Vec<_>) = std::mem::take(&mut self.methods)
            .into_iter()
            .partition(FunctionRecord::is_qualified);
        self.methods = plain;
        self.functions.extend(qualified);

        for constructor in &self.constructors {
            if !self.classes.contains(constructor) {
                self.classes.push(constructor.clone());
            }
        }

        dedupe_functions(&mut self.functions);
    }
}

fn dedupe<T: Clone + Eq + std::hash::Hash>(items: &mut Vec<T>) {
    let unique: IndexSet<T> = items.drain(..).collect();
    items.extend(unique);
}

/// Keep the first record per signature; a later record with a body fills in
/// a missing implementation.
fn dedupe_functions(records: &mut Vec<FunctionRecord>) {
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();
    let mut unique: Vec<FunctionRecord> = Vec::with_capacity(records.len());

    for record in records.drain(..) {
        if record.signature.is_empty() {
            continue;
        }
        match positions.get(&record.signature) {
            Some(&idx) => {
                let existing = &mut unique[idx];
                if existing.implementation.is_none() && record.implementation.is_some() {
                    existing.implementation = record.implementation;
                }
            }
            None => {
                positions.insert(record.signature.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    *records = unique;
}
