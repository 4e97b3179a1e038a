//! Name → implementation lookup over a loaded snapshot.

use std::collections::HashMap;

use crate::decompose::variants::name_variants;
use crate::parsing::heuristics::template_base_name;
use crate::storage::ApiDatabase;
use crate::types::SymbolKind;

/// Maps every spelling of an implemented function to its implementation key.
#[derive(Debug, Default)]
pub struct FunctionIndex {
    by_name: HashMap<String, String>,
}

impl FunctionIndex {
    pub fn build(db: &ApiDatabase) -> Self {
        let implemented: Vec<(String, &str)> = db
            .apis
            .values()
            .filter(|entry| entry.kind.is_callable())
            .filter_map(|entry| {
                let implementation = entry.implementation_ref()?;
                if !db.implementations.contains_key(implementation) {
                    return None;
                }
                let name = match (&entry.class, entry.kind) {
                    (Some(class), SymbolKind::MemberFunction) => format!("{class}::{}", entry.name),
                    _ => entry.name.clone(),
                };
                Some((name, implementation))
            })
            .collect();

        let mut by_name = HashMap::new();

        for (name, implementation) in &implemented {
            by_name
                .entry(name.clone())
                .or_insert_with(|| (*implementation).to_string());
        }

        for (name, implementation) in &implemented {
            let base = template_base_name(name);
            let spellings = name_variants(name)
                .into_iter()
                .chain((base != name.as_str()).then(|| name_variants(base)).into_iter().flatten());
            for variant in spellings {
                by_name
                    .entry(variant)
                    .or_insert_with(|| (*implementation).to_string());
            }
        }

        crate::debug_event!("decompose", "index", "{} spellings", by_name.len());
        Self { by_name }
    }

    /// Implementation key of the first variant of `name` that is indexed.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        name_variants(name)
            .iter()
            .find_map(|variant| self.by_name.get(variant))
            .map(String::as_str)
    }

    /// Source text of the implementation `name` resolves to.
    pub fn resolve<'db>(&self, db: &'db ApiDatabase, name: &str) -> Option<&'db str> {
        let key = self.lookup(name)?;
        db.implementations.get(key).map(|record| record.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ImplementationRecord, SymbolEntry};

    fn implemented(db: &mut ApiDatabase, key: &str, name: &str, code: &str) {
        let mut entry = SymbolEntry::new(key, name, SymbolKind::Function, format!("void {name}()"), "h.hpp");
        entry.has_implementation = true;
        db.apis.insert(key.to_string(), entry);
        db.implementations.insert(
            key.to_string(),
            ImplementationRecord {
                code: code.to_string(),
                location: "h.hpp".to_string(),
                extracted_at: String::new(),
            },
        );
    }

    #[test]
    fn test_flattened_call_reaches_scoped_entry() {
        let mut db = ApiDatabase::default();
        implemented(&mut db, "function::namespace::foo#1", "namespace::foo", "void foo() {}");

        let index = FunctionIndex::build(&db);
        assert_eq!(index.resolve(&db, "namespace_foo"), Some("void foo() {}"));
        assert_eq!(index.resolve(&db, "foo"), Some("void foo() {}"));
    }

    #[test]
    fn test_scoped_call_reaches_flattened_entry() {
        let mut db = ApiDatabase::default();
        implemented(&mut db, "function::namespace_foo#1", "namespace_foo", "void namespace_foo() {}");

        let index = FunctionIndex::build(&db);
        assert_eq!(index.resolve(&db, "namespace::foo"), Some("void namespace_foo() {}"));
    }

    #[test]
    fn test_exact_names_win_over_variants() {
        let mut db = ApiDatabase::default();
        implemented(&mut db, "function::a::run#1", "a::run", "a");
        implemented(&mut db, "function::run#2", "run", "plain");

        let index = FunctionIndex::build(&db);
        assert_eq!(index.resolve(&db, "run"), Some("plain"));
    }

    #[test]
    fn test_linked_and_unimplemented_entries() {
        let mut db = ApiDatabase::default();
        implemented(&mut db, "function::helper#1", "helper", "void helper() {}");

        let mut linked = SymbolEntry::new("function::help#2", "help", SymbolKind::Function, "void help()", "h.hpp");
        linked.has_implementation = true;
        linked.implementation_key = Some("function::helper#1".to_string());
        db.apis.insert(linked.key.clone(), linked);

        let bare = SymbolEntry::new("function::decl#3", "decl", SymbolKind::Function, "void decl()", "h.hpp");
        db.apis.insert(bare.key.clone(), bare);

        let index = FunctionIndex::build(&db);
        assert_eq!(index.lookup("help"), Some("function::helper#1"));
        assert_eq!(index.lookup("decl"), None);
    }

    #[test]
    fn test_member_and_template_names() {
        let mut db = ApiDatabase::default();
        let mut member = SymbolEntry::new(
            "member_function::Tile::load#1",
            "load",
            SymbolKind::MemberFunction,
            "void load()",
            "h.hpp",
        );
        member.class = Some("Tile".to_string());
        member.has_implementation = true;
        db.apis.insert(member.key.clone(), member);
        db.implementations.insert(
            "member_function::Tile::load#1".to_string(),
            ImplementationRecord {
                code: "void load() {}".to_string(),
                location: "h.hpp".to_string(),
                extracted_at: String::new(),
            },
        );
        implemented(&mut db, "template_function::pack<T>#2", "pack<T>", "pack");

        let index = FunctionIndex::build(&db);
        assert_eq!(index.lookup("Tile::load"), Some("member_function::Tile::load#1"));
        assert_eq!(index.lookup("load"), Some("member_function::Tile::load#1"));
        assert_eq!(index.lookup("pack"), Some("template_function::pack<T>#2"));
    }
}
