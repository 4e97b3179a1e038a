/// `#include` line for a stored header path.
///
/// A header under prefix `a/b/llk_api` becomes `#include <llk_api/rest>`;
/// a header equal to the prefix keeps only its file name. Headers under no
/// prefix are included as stored.
pub fn include_directive(header: &str, prefixes: &[String]) -> String {
    let header = header.trim_start_matches('/');

    for prefix in prefixes {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() || !header.starts_with(prefix) {
            continue;
        }

        let family = prefix.rsplit('/').next().unwrap_or(prefix);
        let rest = header[prefix.len()..].trim_start_matches('/');
        return if rest.is_empty() {
            let file_name = header.rsplit('/').next().unwrap_or(header);
            format!("#include <{family}/{file_name}>")
        } else {
            format!("#include <{family}/{rest}>")
        };
    }

    format!("#include <{header}>")
}
