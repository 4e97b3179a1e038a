/// Case-insensitive name similarity in `[0, 1]`.
///
/// | relation | score |
/// |---|---|
/// | equal | `1.0` |
/// | query inside target | `0.8 + q/t * 0.2` |
/// | target inside query | `0.7 + t/q * 0.2` |
/// | otherwise | `(query chars present in target) / max(q, t) * 0.5` |
///
/// Lengths count Unicode scalar values.
pub fn similarity(query: &str, target: &str) -> f64 {
    let query = query.to_lowercase();
    let target = target.to_lowercase();

    if query == target {
        return 1.0;
    }

    let query_len = query.chars().count() as f64;
    let target_len = target.chars().count() as f64;

    if target.contains(query.as_str()) {
        return 0.8 + (query_len / target_len) * 0.2;
    }
    if query.contains(target.as_str()) {
        return 0.7 + (target_len / query_len) * 0.2;
    }

    let matching = query.chars().filter(|c| target.contains(*c)).count() as f64;
    matching / query_len.max(target_len) * 0.5
}

/// Score rounded to three decimals for reporting.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
