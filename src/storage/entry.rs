use crate::types::SymbolKind;
use serde::{Deserialize, Serialize};

/// One symbol in the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_key: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    pub signature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameters: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub param_types: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub return_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub header: String,
    #[serde(default)]
    pub has_implementation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_key: Option<String>,
}

impl SymbolEntry {
    /// Entry with only the fields every kind carries.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        kind: SymbolKind,
        signature: impl Into<String>,
        header: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            base_key: None,
            name: name.into(),
            kind,
            signature: signature.into(),
            parameters: String::new(),
            param_types: Vec::new(),
            return_type: String::new(),
            class: None,
            header: header.into(),
            has_implementation: false,
            implementation_key: None,
        }
    }

    /// Key of the implementation record backing this entry, if any.
    pub fn implementation_ref(&self) -> Option<&str> {
        match &self.implementation_key {
            Some(key) => Some(key.as_str()),
            None if self.has_implementation => Some(self.key.as_str()),
            None => None,
        }
    }

    /// Namespace derived from a qualified name, if the name has one.
    pub fn qualified_namespace(&self) -> Option<&str> {
        self.name.rsplit_once("::").map(|(prefix, _)| prefix)
    }
}

/// Captured source text of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationRecord {
    pub code: String,
    pub location: String,
    pub extracted_at: String,
}
