use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte span of a syntax node inside its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    TemplateFunction,
    MemberFunction,
    Class,
    Struct,
    Enum,
    EnumValue,
    Typedef,
    #[serde(rename = "using")]
    UsingAlias,
    Macro,
    Constant,
}

/// Scope kinds tracked while walking a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Namespace,
    Class,
    Struct,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when `other` lies entirely within this range.
    pub fn encloses(&self, other: &ByteRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolKind {
    /// Key prefix and serialized tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::TemplateFunction => "template_function",
            SymbolKind::MemberFunction => "member_function",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumValue => "enum_value",
            SymbolKind::Typedef => "typedef",
            SymbolKind::UsingAlias => "using",
            SymbolKind::Macro => "macro",
            SymbolKind::Constant => "constant",
        }
    }

    /// Kinds whose keys carry a signature hash to keep overloads apart.
    pub fn is_overloadable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Function | SymbolKind::TemplateFunction | SymbolKind::MemberFunction
        )
    }

    pub fn is_callable(&self) -> bool {
        self.is_overloadable()
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ContextKind {
    pub fn is_type(&self) -> bool {
        matches!(self, ContextKind::Class | ContextKind::Struct)
    }
}
