//! Small string helpers shared by the schema parser, the condition
//! evaluator and the record format.

/// Splits `input` on `delimiter` and trims each piece.
///
/// An empty (or all-whitespace) input yields no pieces at all, so that an
/// omitted column list is distinguishable from a list with one empty name.
pub fn split_list(input: &str, delimiter: char) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input
        .split(delimiter)
        .map(|piece| piece.trim().to_string())
        .collect()
}

/// Strips one matching pair of surrounding single quotes.
///
/// `'Bob'` becomes `Bob`; `Bob`, `'Bob` and a lone `'` are returned as-is.
pub fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
