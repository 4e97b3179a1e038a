//! Text heuristics over raw declaration spans.
//!
//! Every function here is pure: it takes the text of one syntax node and
//! returns the piece of structured data the classifier needs. Keeping them
//! free of parser state lets each rule be tested (and swapped) on its own.

use regex::Regex;
use std::sync::OnceLock;

/// Words allowed between a parameter list's `)` and a function body's `{`.
const TRAILING_QUALIFIERS: &[&str] = &[
    "const", "override", "final", "noexcept", "volatile", "mutable",
];

/// Keywords screened out of call-expression references during classification.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "while", "for", "switch", "return", "sizeof", "delete", "new",
];

/// Callee names the decomposer never treats as calls.
const CALL_EXCLUSIONS: &[&str] = &[
    "if",
    "while",
    "for",
    "switch",
    "return",
    "sizeof",
    "static_cast",
    "dynamic_cast",
    "reinterpret_cast",
    "const_cast",
];

static OPERATOR_RE: OnceLock<Option<Regex>> = OnceLock::new();
static CALL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static ENUM_RE: OnceLock<Option<Regex>> = OnceLock::new();
static CLASS_RE: OnceLock<Option<Regex>> = OnceLock::new();
static STRUCT_RE: OnceLock<Option<Regex>> = OnceLock::new();
static MACRO_FN_RE: OnceLock<Option<Regex>> = OnceLock::new();
static MACRO_OBJ_RE: OnceLock<Option<Regex>> = OnceLock::new();
static TYPEDEF_FN_PTR_RE: OnceLock<Option<Regex>> = OnceLock::new();
static TYPEDEF_TAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static USING_ALIAS_RE: OnceLock<Option<Regex>> = OnceLock::new();
static USING_DECL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static NON_FUNCTION_RES: OnceLock<Vec<Regex>> = OnceLock::new();

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn non_function_patterns() -> &'static [Regex] {
    NON_FUNCTION_RES.get_or_init(|| {
        [r"=\s*\w+\(", r"^\s*\(", r"\)\s*\["]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// How a qualified identifier usage reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifiedUsage {
    EnumValue,
    Function,
}

/// Name, underlying type and enumerators recovered from an enum definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParts {
    pub name: String,
    pub underlying: Option<String>,
    pub values: Vec<String>,
}

/// Collapse every run of whitespace into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decide whether the first `{` in `text` opens a function body rather than
/// a brace initializer such as a default argument.
pub fn has_function_body(text: &str) -> bool {
    let Some(brace) = text.find('{') else {
        return false;
    };

    let before = text[..brace].trim_end();
    let Some(paren) = before.rfind(')') else {
        return false;
    };

    let between = before[paren + 1..].trim();
    if between.contains('=') {
        return false;
    }

    between
        .split_whitespace()
        .all(|word| TRAILING_QUALIFIERS.contains(&word))
}

/// Signature text: everything before a genuine body, else the whole span.
pub fn signature_of(text: &str) -> String {
    match text.find('{') {
        Some(brace) if has_function_body(text) => text[..brace].trim().to_string(),
        _ => text.trim().to_string(),
    }
}

/// Normalized form used for de-duplication and hashing.
pub fn normalize_signature(text: &str) -> String {
    let mut normalized = collapse_whitespace(text);
    if let Some(brace) = normalized.find('{') {
        if has_function_body(&normalized) {
            normalized.truncate(brace);
        }
    }
    normalized.trim().trim_end_matches(';').trim_end().to_string()
}

/// Drop a leading `template<...>` parameter list, honouring nested brackets.
pub fn strip_template_prefix(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(rest) = trimmed.strip_prefix("template") else {
        return trimmed;
    };
    let rest = rest.trim_start();
    if !rest.starts_with('<') {
        return trimmed;
    }

    let mut depth = 0usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return rest[idx + 1..].trim_start();
                }
            }
            _ => {}
        }
    }
    trimmed
}

/// True when the text after the template parameter list declares a type.
pub fn is_template_type(text: &str) -> bool {
    let body = strip_template_prefix(text);
    ["class ", "struct ", "union "]
        .iter()
        .any(|keyword| body.starts_with(keyword))
}

/// Function name from a signature. Qualified names keep their scope;
/// destructors keep their `~`.
pub fn function_name(signature: &str) -> String {
    let sig = strip_template_prefix(signature);

    if let Some(re) = cached(&OPERATOR_RE, r"\boperator\b\s*(?:\(\)|[^\s(]+)") {
        if let Some(found) = re.find(sig) {
            return found.as_str().to_string();
        }
    }

    let Some(paren) = sig.find('(') else {
        return String::new();
    };
    let Some(last) = sig[..paren].split_whitespace().last() else {
        return String::new();
    };

    let name = last.trim_start_matches(['*', '&']);
    match name.rfind('~') {
        Some(tilde) => name[tilde..].to_string(),
        None => name.to_string(),
    }
}

/// Parameter list text, from the first `(` to the last `)`.
pub fn parameters(signature: &str) -> String {
    match (signature.find('('), signature.rfind(')')) {
        (Some(start), Some(end)) if end >= start => signature[start..=end].to_string(),
        _ => "()".to_string(),
    }
}

/// Return type: the tokens before the function name, defaulting to `void`.
pub fn return_type(text: &str) -> String {
    let body = strip_template_prefix(text);
    let Some(paren) = body.find('(') else {
        return "void".to_string();
    };

    let parts: Vec<&str> = body[..paren].split_whitespace().collect();
    if parts.len() > 1 {
        parts[..parts.len() - 1].join(" ")
    } else {
        "void".to_string()
    }
}

/// Slice of `text` holding the first balanced `( ... )` group, parens included.
fn first_paren_group(text: &str) -> Option<&str> {
    let start = text.find('(')?;
    let mut depth = 0usize;
    for (idx, ch) in text[start..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + idx + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `sep` only where no bracket of any kind is open.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut brace_depth: i32 = 0;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            '{' => brace_depth += 1,
            '}' => brace_depth -= 1,
            c if c == sep && depth <= 0 && brace_depth <= 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Types of every parameter in a parameter list.
pub fn parameter_types(params: &str) -> Vec<String> {
    let group = first_paren_group(params).unwrap_or(params);
    let inner = group
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(group)
        .trim();

    if inner.is_empty() || inner == "void" {
        return Vec::new();
    }
    if inner == "..." {
        return vec!["...".to_string()];
    }

    split_top_level(inner, ',')
        .into_iter()
        .map(parameter_type)
        .filter(|ty| !ty.is_empty())
        .collect()
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Type portion of a single parameter declaration.
pub fn parameter_type(param: &str) -> String {
    let mut param = param.trim();
    if param.is_empty() || param == "void" {
        return String::new();
    }
    if param == "..." {
        return param.to_string();
    }
    if let Some(eq) = param.find('=') {
        param = param[..eq].trim();
    }
    if param.contains("(*") {
        return param.to_string();
    }

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;
    for ch in param.chars() {
        match ch {
            '<' | '(' | '[' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ')' | ']' => {
                depth -= 1;
                current.push(ch);
            }
            ' ' | '\t' | '\n' if depth <= 0 => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    if words.is_empty() {
        return param.to_string();
    }

    let mut type_words: Vec<&str> = Vec::new();
    let mut name_found = false;
    for word in words.iter().rev() {
        let word = word.as_str();
        if matches!(word, "&" | "*" | "&&") {
            type_words.insert(0, word);
            continue;
        }
        if !name_found {
            let first = word.chars().next().unwrap_or(' ');
            if (first.is_lowercase() || first == '_') && is_identifier(word) {
                name_found = true;
                continue;
            }
            if word.contains('[') {
                type_words.insert(0, word);
                continue;
            }
            if first.is_uppercase() {
                type_words.insert(0, word);
                name_found = true;
                continue;
            }
        }
        type_words.insert(0, word);
    }

    let ty = collapse_whitespace(&type_words.join(" "));
    if !ty.is_empty() {
        ty
    } else if words.len() == 1 {
        words[0].clone()
    } else {
        words[..words.len() - 1].join(" ")
    }
}

/// Remove `//` and `/* */` comments.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("//") {
            rest = match after.find('\n') {
                Some(nl) => &after[nl..],
                None => "",
            };
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = match after.find("*/") {
                Some(end) => &after[end + 2..],
                None => "",
            };
            out.push(' ');
        } else {
            let ch = rest.chars().next().unwrap_or(' ');
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

/// Name, underlying type and enumerator names of an enum definition.
pub fn enum_parts(text: &str) -> Option<EnumParts> {
    let re = cached(
        &ENUM_RE,
        r"enum\s+(?:class\s+|struct\s+)?(\w+)(?:\s*:\s*([\w:]+(?:\s+[\w:]+)*))?\s*\{",
    )?;
    let caps = re.captures(text)?;
    let name = caps.get(1)?.as_str().to_string();
    let underlying = caps.get(2).map(|m| m.as_str().to_string());

    let mut values = Vec::new();
    if let (Some(open), Some(close)) = (text.find('{'), text.rfind('}')) {
        if close > open {
            let body = strip_comments(&text[open + 1..close]);
            for segment in split_top_level(&body, ',') {
                let value = segment.split('=').next().unwrap_or("").trim();
                if is_identifier(value) && value != "enum" && value != "class" {
                    values.push(value.to_string());
                }
            }
        }
    }

    Some(EnumParts {
        name,
        underlying,
        values,
    })
}

pub fn class_name(text: &str) -> Option<String> {
    let re = cached(&CLASS_RE, r"\bclass\s+([A-Za-z_]\w*)")?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn struct_name(text: &str) -> Option<String> {
    let re = cached(&STRUCT_RE, r"\bstruct\s+([A-Za-z_]\w*)")?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Macro `(name, signature)`. Function-like macros keep their parameter list.
pub fn macro_signature(text: &str, function_like: bool) -> Option<(String, String)> {
    let text = text.trim();
    if function_like {
        let re = cached(&MACRO_FN_RE, r"^#\s*define\s+(\w+)(\([^)]*\))")?;
        let caps = re.captures(text)?;
        let name = caps.get(1)?.as_str();
        let params = caps.get(2)?.as_str();
        Some((name.to_string(), format!("{name}{params}")))
    } else {
        let re = cached(&MACRO_OBJ_RE, r"^#\s*define\s+(\w+)")?;
        let name = re.captures(text)?.get(1)?.as_str().to_string();
        Some((name.clone(), name))
    }
}

pub fn typedef_name(text: &str) -> String {
    let body = text.trim();
    let body = body.strip_prefix("typedef").unwrap_or(body).trim();
    // Members of an inline struct body never name the typedef
    let declarator = body.rfind('}').map_or(body, |end| &body[end + 1..]);

    if let Some(re) = cached(&TYPEDEF_FN_PTR_RE, r"\(\s*\*\s*(\w+)\s*\)") {
        if let Some(name) = re.captures(declarator).and_then(|c| c.get(1)) {
            return name.as_str().to_string();
        }
    }

    cached(&TYPEDEF_TAIL_RE, r"(\w+)\s*;?\s*$")
        .and_then(|re| re.captures(declarator))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

pub fn using_name(text: &str) -> String {
    if text.contains('=') {
        return cached(&USING_ALIAS_RE, r"using\s+(\w+)\s*=")
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
    }

    cached(&USING_DECL_RE, r"using\s+(?:namespace\s+)?((?:\w+::)*\w+)")
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().rsplit("::").next().unwrap_or("").to_string())
        .unwrap_or_default()
}

/// True for non-function declarations carrying `const` or `constexpr`.
pub fn is_constant_declaration(text: &str) -> bool {
    let head = text.split('=').next().unwrap_or("");
    !head.contains('(')
        && head
            .split_whitespace()
            .any(|word| word == "const" || word == "constexpr")
}

pub fn constant_name(text: &str) -> String {
    let head = text.split(['=', ';', '{']).next().unwrap_or("").trim();
    let last = head.split_whitespace().last().unwrap_or("");
    let last = last.trim_start_matches(['*', '&']);
    let last = last.split('[').next().unwrap_or("");

    if is_identifier(last) && !matches!(last, "const" | "constexpr" | "static") {
        last.to_string()
    } else {
        String::new()
    }
}

/// Heuristic check that a declaration with parentheses declares a function.
pub fn is_function_declaration(text: &str) -> bool {
    if !text.contains('(') || !text.contains(')') {
        return false;
    }
    !non_function_patterns().iter().any(|re| re.is_match(text))
}

/// True when `=` appears before the first `(`: a variable initialization.
pub fn is_initialization(text: &str) -> bool {
    match (text.find('='), text.find('(')) {
        (Some(eq), Some(paren)) => eq < paren,
        _ => false,
    }
}

/// Classify a qualified identifier usage by its last component.
pub fn qualified_usage(text: &str) -> Option<QualifiedUsage> {
    if !text.contains("::") {
        return None;
    }
    let last = text.rsplit("::").next()?;
    let first = last.chars().next()?;

    let has_cased = last.chars().any(|c| c.is_alphabetic());
    let all_upper = has_cased && !last.chars().any(|c| c.is_lowercase());

    if all_upper || (first.is_uppercase() && last.contains('_')) {
        Some(QualifiedUsage::EnumValue)
    } else if first.is_lowercase() {
        Some(QualifiedUsage::Function)
    } else {
        None
    }
}

/// Leading callee of a call expression, template arguments stripped.
pub fn call_name(text: &str) -> Option<String> {
    let re = cached(&CALL_RE, r"^((?:\w+::)*\w+)(?:<[^>]+>)?\s*\(")?;
    re.captures(text.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn is_control_keyword(name: &str) -> bool {
    CONTROL_KEYWORDS.contains(&name)
}

pub fn is_excluded_call(name: &str) -> bool {
    CALL_EXCLUSIONS.contains(&name)
}

/// Name with any template argument list removed.
pub fn template_base_name(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_after_trailing_qualifier() {
        assert!(has_function_body("void f() const { return; }"));
        assert!(has_function_body("int g(int a) noexcept override {}"));
        assert!(has_function_body("Foo::Foo() : x(1) { }"));
    }

    #[test]
    fn test_brace_initializer_is_not_a_body() {
        assert!(!has_function_body("void f(int x = Color{1,2,3})"));
        assert!(!has_function_body("int table[] = {1, 2, 3};"));
        assert!(!has_function_body("auto v = make() = {1};"));
        assert!(!has_function_body("void f()"));
    }

    #[test]
    fn test_signature_of() {
        assert_eq!(
            signature_of("inline void foo(int x) {\n  bar(x);\n}"),
            "inline void foo(int x)"
        );
        assert_eq!(
            signature_of("void f(int x = Color{1,2,3});"),
            "void f(int x = Color{1,2,3});"
        );
    }

    #[test]
    fn test_normalize_signature() {
        assert_eq!(
            normalize_signature("void   foo(int a,\n    int b) const { return; }"),
            "void foo(int a, int b) const"
        );
        assert_eq!(normalize_signature("void bar(int);"), "void bar(int)");
        assert_eq!(
            normalize_signature("void f(int x = Color{1,2,3});"),
            "void f(int x = Color{1,2,3})"
        );
    }

    #[test]
    fn test_strip_template_prefix() {
        assert_eq!(
            strip_template_prefix("template <typename T> T id(T x)"),
            "T id(T x)"
        );
        assert_eq!(
            strip_template_prefix("template<typename T = std::vector<int>> void f(T)"),
            "void f(T)"
        );
        assert_eq!(strip_template_prefix("templated_call(1)"), "templated_call(1)");
    }

    #[test]
    fn test_template_type_detection() {
        assert!(is_template_type("template <typename T> class Box { void f(int); };"));
        assert!(is_template_type("template<int N> struct Arr { int v[N]; };"));
        assert!(!is_template_type("template <typename T> T id(T x) { return x; }"));
    }

    #[test]
    fn test_function_name() {
        assert_eq!(function_name("int add(int a, int b)"), "add");
        assert_eq!(function_name("void ckernel::exp_tile_init()"), "ckernel::exp_tile_init");
        assert_eq!(function_name("template <typename T> T id(T x)"), "id");
        assert_eq!(function_name("Foo::~Foo()"), "~Foo");
        assert_eq!(function_name("bool operator==(const Foo& other) const"), "operator==");
        assert_eq!(function_name("char *dup(const char *s)"), "dup");
        assert_eq!(function_name("void set_operator_mode(int m)"), "set_operator_mode");
        assert_eq!(function_name("no parens here"), "");
    }

    #[test]
    fn test_parameters_and_return_type() {
        assert_eq!(parameters("int add(int a, int b)"), "(int a, int b)");
        assert_eq!(parameters("MACRO"), "()");
        assert_eq!(return_type("static inline uint32_t get(int x) {}"), "static inline uint32_t");
        assert_eq!(return_type("main()"), "void");
        assert_eq!(return_type("template <typename T> T id(T x)"), "T");
    }

    #[test]
    fn test_parameter_types() {
        assert_eq!(
            parameter_types("(int a, const char* s, std::vector<int, Alloc> v)"),
            vec!["int", "const char*", "std::vector<int, Alloc>"]
        );
        assert_eq!(parameter_types("(void)"), Vec::<String>::new());
        assert_eq!(parameter_types("()"), Vec::<String>::new());
        assert_eq!(parameter_types("(...)"), vec!["..."]);
        assert_eq!(parameter_types("(uint32_t)"), vec!["uint32_t"]);
        assert_eq!(parameter_types("(int x = 5, Foo f)"), vec!["int", "Foo f"]);
        assert_eq!(parameter_types("(void (*cb)(int))"), vec!["void (*cb)(int)"]);
    }

    #[test]
    fn test_enum_parts() {
        let parts = enum_parts("enum class Color : uint8_t { RED = 1, GREEN, BLUE }").unwrap();
        assert_eq!(parts.name, "Color");
        assert_eq!(parts.underlying.as_deref(), Some("uint8_t"));
        assert_eq!(parts.values, vec!["RED", "GREEN", "BLUE"]);

        let parts = enum_parts("enum Mode {\n  A = 0x1, // first\n  B = (1 << 2),\n  C,\n};").unwrap();
        assert_eq!(parts.values, vec!["A", "B", "C"]);
        assert!(parts.underlying.is_none());

        assert!(enum_parts("enum class Fwd : int;").is_none());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(class_name("class Buffer : public Base { };").as_deref(), Some("Buffer"));
        assert_eq!(struct_name("struct TileInfo { int x; }").as_deref(), Some("TileInfo"));
        assert!(class_name("struct Nope {}").is_none());
    }

    #[test]
    fn test_macro_signature() {
        assert_eq!(
            macro_signature("#define MAX(a, b) ((a) > (b) ? (a) : (b))", true),
            Some(("MAX".to_string(), "MAX(a, b)".to_string()))
        );
        assert_eq!(
            macro_signature("#define ALWI inline __attribute__((always_inline))", false),
            Some(("ALWI".to_string(), "ALWI".to_string()))
        );
        assert_eq!(macro_signature("int x;", false), None);
    }

    #[test]
    fn test_alias_names() {
        assert_eq!(typedef_name("typedef unsigned int uint;"), "uint");
        assert_eq!(typedef_name("typedef void (*handler_t)(int);"), "handler_t");
        assert_eq!(
            typedef_name("typedef struct { int id; void (*handler)(int); } Callbacks;"),
            "Callbacks"
        );
        assert_eq!(typedef_name("typedef struct tile { int (*op)(int); } tile_t;"), "tile_t");
        assert_eq!(using_name("using Shape = std::array<uint32_t, 4>;"), "Shape");
        assert_eq!(using_name("using std::vector;"), "vector");
        assert_eq!(using_name("using namespace ckernel;"), "ckernel");
    }

    #[test]
    fn test_constants() {
        assert!(is_constant_declaration("constexpr uint32_t TILE_HEIGHT = 32;"));
        assert!(is_constant_declaration("static const int kLimit = 4;"));
        assert!(!is_constant_declaration("int counter = 0;"));
        assert!(!is_constant_declaration("void f(const int x);"));
        assert_eq!(constant_name("constexpr uint32_t TILE_HEIGHT = 32;"), "TILE_HEIGHT");
        assert_eq!(constant_name("static const std::size_t N = 4;"), "N");
        assert_eq!(constant_name("const char *names[3] = {};"), "names");
    }

    #[test]
    fn test_function_declaration_screening() {
        assert!(is_function_declaration("void tile_init(uint32_t cb);"));
        assert!(!is_function_declaration("auto x = make_thing(1);"));
        assert!(!is_function_declaration("(void)x;"));
        assert!(!is_function_declaration("int (arr)[4];"));
        assert!(is_initialization("auto x = make_thing(1);"));
        assert!(!is_initialization("void f(int x = 1);"));
    }

    #[test]
    fn test_qualified_usage() {
        assert_eq!(qualified_usage("DataFormat::Float16_b"), Some(QualifiedUsage::EnumValue));
        assert_eq!(qualified_usage("MathFidelity::HiFi4"), None);
        assert_eq!(qualified_usage("Color::RED"), Some(QualifiedUsage::EnumValue));
        assert_eq!(qualified_usage("ckernel::exp_tile_init"), Some(QualifiedUsage::Function));
        assert_eq!(qualified_usage("plain_name"), None);
    }

    #[test]
    fn test_call_name() {
        assert_eq!(call_name("add(x, x)").as_deref(), Some("add"));
        assert_eq!(
            call_name("ckernel::exp_tile_init<true>(dst)").as_deref(),
            Some("ckernel::exp_tile_init")
        );
        assert_eq!(call_name("obj.method()"), None);
        assert!(is_excluded_call("static_cast"));
        assert!(!is_excluded_call("add"));
        assert!(is_control_keyword("sizeof"));
    }

    #[test]
    fn test_strip_comments_and_split() {
        assert_eq!(strip_comments("a /* b */ c // d\ne").trim(), "a   c \ne");
        assert_eq!(split_top_level("a, f(b, c), d", ','), vec!["a", " f(b, c)", " d"]);
        assert_eq!(template_base_name("foo<int>"), "foo");
    }
}
