//! Casing transforms used to derive generated identifiers.
//!
//! Arbitrary user-chosen names must normalize identically no matter how
//! they were spelled: "get-widget", "get_widget", and "GetWidget" all
//! describe the same entity. Both transforms therefore split on explicit
//! separators and on lower-to-upper case transitions before reassembling.

/// Split a free-form name into words.
///
/// Separators are `-`, `_`, `.`, `/` and whitespace; a lowercase-to-uppercase
/// transition also starts a new word, so "GetWidget" splits the same way as
/// "get_widget".
fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in s.chars() {
        if c == '-' || c == '_' || c == '.' || c == '/' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        } else if c.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
            current.push(c);
            prev_lower = false;
        } else {
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert a free-form name to PascalCase (e.g., "get-widget" -> "GetWidget").
pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => c.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a free-form name to snake_case (e.g., "GetWidget" -> "get_widget").
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
