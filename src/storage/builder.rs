//! Database builder.
//!
//! Collects per-file extractions under stable keys, then finishes the store:
//! standard-library seeds, declaration linking and the namespace index.
//!
//! Keys for overloadable kinds carry the first 8 hex characters of the
//! SHA-256 of the normalized signature, so identical re-declarations collapse
//! onto one key and distinct overloads never collide.

use crate::config::StorageConfig;
use crate::parsing::extraction::{FileExtraction, FunctionRecord, NamedDecl};
use crate::parsing::heuristics;
use crate::storage::entry::{ImplementationRecord, SymbolEntry};
use crate::storage::snapshot::{ApiDatabase, DbMetadata};
use crate::types::SymbolKind;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const STANDARD_LIBRARY_HEADER: &str = "<standard_library>";
pub const COMMON_METHODS_HEADER: &str = "<common>";
pub const GLOBAL_NAMESPACE: &str = "global";

const STANDARD_FUNCTIONS: &[(&str, &str)] = &[
    ("std::move", "template<typename T> T&& move(T&& t)"),
    ("std::forward", "template<typename T> T&& forward(T&& t)"),
    ("std::max", "template<typename T> const T& max(const T& a, const T& b)"),
    ("std::min", "template<typename T> const T& min(const T& a, const T& b)"),
];

const STANDARD_CLASSES: &[(&str, &str)] = &[
    ("std::vector", "template<typename T> class vector"),
    ("std::optional", "template<typename T> class optional"),
    ("std::unique_ptr", "template<typename T> class unique_ptr"),
];

/// `(class, signature)` of methods kernels commonly call on containers and buffers.
const COMMON_METHODS: &[(&str, &str)] = &[
    ("vector", "void push_back(const T& value)"),
    ("container", "size_t size() const"),
    ("container", "bool empty() const"),
    ("Buffer", "BufferType buffer_type() const"),
];

/// First 8 hex characters of the SHA-256 of a normalized signature.
pub fn signature_hash(signature: &str) -> String {
    let digest = Sha256::digest(heuristics::normalize_signature(signature).as_bytes());
    digest.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

/// Base key of a function-like entry.
pub fn function_base_key(kind: SymbolKind, name: &str, class: Option<&str>) -> String {
    match (kind, class) {
        (SymbolKind::MemberFunction, Some(class)) => format!("{kind}::{class}::{name}"),
        _ => format!("{kind}::{name}"),
    }
}

/// File counts recorded in the snapshot metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildCounts {
    pub files_scanned: usize,
    pub files_failed: usize,
}

#[derive(Debug)]
pub struct DatabaseBuilder {
    apis: BTreeMap<String, SymbolEntry>,
    headers: BTreeMap<String, Vec<String>>,
    implementations: BTreeMap<String, ImplementationRecord>,
    extracted_at: String,
    source_root: String,
    header_namespaces: Vec<String>,
    seed_standard_library: bool,
}

impl DatabaseBuilder {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            apis: BTreeMap::new(),
            headers: BTreeMap::new(),
            implementations: BTreeMap::new(),
            extracted_at: crate::utils::local_timestamp(),
            source_root: String::new(),
            header_namespaces: config.header_namespaces.clone(),
            seed_standard_library: config.seed_standard_library,
        }
    }

    pub fn with_source_root(mut self, root: impl Into<String>) -> Self {
        self.source_root = root.into();
        self
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Store everything extracted from one file. Returns the number of keys
    /// stored for the first time.
    pub fn insert_extraction(&mut self, header: &str, extraction: &FileExtraction) -> usize {
        let mut stored = 0;

        for record in &extraction.functions {
            stored += usize::from(self.insert_function(SymbolKind::Function, record, header));
        }
        for record in &extraction.template_functions {
            stored += usize::from(self.insert_function(SymbolKind::TemplateFunction, record, header));
        }
        for records in extraction.member_functions.values() {
            for record in records {
                stored += usize::from(self.insert_function(SymbolKind::MemberFunction, record, header));
            }
        }
        for record in &extraction.methods {
            stored += usize::from(self.insert_function(SymbolKind::Function, record, header));
        }

        for name in &extraction.classes {
            stored += usize::from(self.insert_type(SymbolKind::Class, name, header));
        }
        for name in &extraction.structs {
            stored += usize::from(self.insert_type(SymbolKind::Struct, name, header));
        }
        for name in &extraction.enums {
            stored += usize::from(self.insert_type(SymbolKind::Enum, name, header));
        }
        for qualified in &extraction.enum_values {
            stored += usize::from(self.insert_enum_value(qualified, header));
        }

        for decl in &extraction.typedefs {
            stored += usize::from(self.insert_named(SymbolKind::Typedef, decl, header));
        }
        for decl in &extraction.usings {
            stored += usize::from(self.insert_named(SymbolKind::UsingAlias, decl, header));
        }
        for decl in &extraction.macros {
            stored += usize::from(self.insert_named(SymbolKind::Macro, decl, header));
        }
        for decl in &extraction.constants {
            stored += usize::from(self.insert_named(SymbolKind::Constant, decl, header));
        }

        stored
    }

    pub fn insert_function(&mut self, kind: SymbolKind, record: &FunctionRecord, header: &str) -> bool {
        if record.name.is_empty() {
            return false;
        }

        let class = match kind {
            SymbolKind::MemberFunction => record.class.as_deref(),
            _ => None,
        };
        let base_key = function_base_key(kind, &record.name, class);
        let key = format!("{base_key}#{}", signature_hash(&record.signature));

        let mut entry = SymbolEntry::new(key, &record.name, kind, &record.signature, header);
        entry.base_key = Some(base_key);
        entry.parameters = record.parameters.clone();
        entry.param_types = record.param_types.clone();
        entry.return_type = record.return_type.clone();
        entry.class = class.map(str::to_string);

        self.store(entry, record.implementation.as_deref())
    }

    pub fn insert_type(&mut self, kind: SymbolKind, name: &str, header: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let entry = SymbolEntry::new(format!("{kind}::{name}"), name, kind, format!("{kind} {name}"), header);
        self.store(entry, None)
    }

    pub fn insert_enum_value(&mut self, qualified: &str, header: &str) -> bool {
        let qualified = qualified.trim();
        let name = qualified.rsplit("::").next().unwrap_or_default();
        if name.is_empty() {
            return false;
        }
        let entry = SymbolEntry::new(
            format!("{}::{qualified}", SymbolKind::EnumValue),
            name,
            SymbolKind::EnumValue,
            qualified,
            header,
        );
        self.store(entry, None)
    }

    pub fn insert_named(&mut self, kind: SymbolKind, decl: &NamedDecl, header: &str) -> bool {
        if decl.name.is_empty() {
            return false;
        }
        let entry = SymbolEntry::new(format!("{kind}::{}", decl.name), &decl.name, kind, &decl.signature, header);
        self.store(entry, None)
    }

    /// First record per key wins; a later record with a body upgrades an
    /// entry that has none. Returns true only for newly stored keys.
    fn store(&mut self, mut entry: SymbolEntry, implementation: Option<&str>) -> bool {
        if let Some(existing) = self.apis.get_mut(&entry.key) {
            if let (false, Some(code)) = (existing.has_implementation, implementation) {
                existing.has_implementation = true;
                self.implementations.insert(
                    existing.key.clone(),
                    ImplementationRecord {
                        code: code.to_string(),
                        location: entry.header,
                        extracted_at: self.extracted_at.clone(),
                    },
                );
            }
            return false;
        }

        if let Some(code) = implementation {
            entry.has_implementation = true;
            self.implementations.insert(
                entry.key.clone(),
                ImplementationRecord {
                    code: code.to_string(),
                    location: entry.header.clone(),
                    extracted_at: self.extracted_at.clone(),
                },
            );
        }

        self.headers
            .entry(entry.header.clone())
            .or_default()
            .push(entry.key.clone());
        self.apis.insert(entry.key.clone(), entry);
        true
    }

    /// Seed, link and index. The builder is consumed; the result is frozen.
    pub fn finish(mut self, counts: BuildCounts) -> ApiDatabase {
        if self.seed_standard_library {
            self.seed_standard_entries();
        }
        let linked = self.link_declarations();
        let namespaces = self.namespace_index();

        crate::debug_event!("build", "linked", "{linked} declarations");

        let metadata = DbMetadata {
            created: self.extracted_at.clone(),
            source_root: self.source_root.clone(),
            description: "C/C++ API signatures and implementations".to_string(),
            total_apis: self.apis.len(),
            total_headers: self.headers.len(),
            total_implementations: self.implementations.len(),
            files_scanned: counts.files_scanned,
            files_failed: counts.files_failed,
        };

        ApiDatabase {
            metadata,
            apis: self.apis,
            headers: self.headers,
            namespaces,
            implementations: self.implementations,
        }
    }

    fn seed_standard_entries(&mut self) {
        for (name, signature) in STANDARD_FUNCTIONS {
            if let Some(mut record) = FunctionRecord::from_prototype(signature) {
                record.name = (*name).to_string();
                self.insert_function(SymbolKind::TemplateFunction, &record, STANDARD_LIBRARY_HEADER);
            }
        }
        for (name, signature) in STANDARD_CLASSES {
            let entry = SymbolEntry::new(
                format!("{}::{name}", SymbolKind::Class),
                *name,
                SymbolKind::Class,
                *signature,
                STANDARD_LIBRARY_HEADER,
            );
            self.store(entry, None);
        }
        for (class, signature) in COMMON_METHODS {
            if let Some(mut record) = FunctionRecord::from_prototype(signature) {
                record.class = Some((*class).to_string());
                self.insert_function(SymbolKind::MemberFunction, &record, COMMON_METHODS_HEADER);
            }
        }
    }

    /// Best-effort: a callable entry without a body is linked to the first
    /// implementation key (in key order) containing its name.
    fn link_declarations(&mut self) -> usize {
        let implementation_keys: Vec<&String> = self.implementations.keys().collect();
        let mut linked = 0;

        for entry in self.apis.values_mut() {
            if !entry.kind.is_callable()
                || entry.has_implementation
                || entry.header == STANDARD_LIBRARY_HEADER
                || entry.header == COMMON_METHODS_HEADER
            {
                continue;
            }
            if let Some(key) = implementation_keys
                .iter()
                .find(|key| key.contains(entry.name.as_str()))
            {
                entry.has_implementation = true;
                entry.implementation_key = Some((*key).clone());
                linked += 1;
            }
        }

        linked
    }

    fn namespace_index(&self) -> BTreeMap<String, Vec<String>> {
        let mut namespaces: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (key, entry) in &self.apis {
            let namespace = match entry.qualified_namespace() {
                Some(prefix) => prefix.to_string(),
                None => self
                    .header_namespaces
                    .iter()
                    .find(|root| entry.header.starts_with(&format!("{root}/")))
                    .cloned()
                    .unwrap_or_else(|| GLOBAL_NAMESPACE.to_string()),
            };
            namespaces.entry(namespace).or_default().push(key.clone());
        }

        namespaces
    }
}
