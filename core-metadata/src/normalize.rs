//! Provider-specific query forms.
//!
//! Each provider owns its recipe; these are small pure functions rather than
//! one shared algorithm. Blank input normalizes to an empty string, which
//! adapters treat as "cannot query".

/// Escapes the five XML-significant characters.
pub fn escape_markup(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Drops every character that is not alphanumeric, optionally keeping whitespace.
///
/// Alphanumeric is Unicode-aware, so accented letters survive.
pub fn strip_non_alphanumeric(input: &str, keep_whitespace: bool) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || (keep_whitespace && c.is_whitespace()))
        .collect()
}

/// Search-string form: `&` becomes `and`. Casing and whitespace are kept.
pub fn search_terms(input: &str) -> String {
    input.replace('&', "and")
}

/// AZLyrics path segment: markup-escaped, then alphanumerics only, lower-cased.
///
/// `"Simon & Garfunkel"` becomes `"simonampgarfunkel"`.
pub fn azlyrics_slug(input: &str) -> String {
    strip_non_alphanumeric(&escape_markup(input), false).to_lowercase()
}

/// Genius page slug: words joined by `-`, first letter upper-cased.
///
/// `&` reads as `and` and hyphens count as spaces, so applying the function to
/// its own output is a no-op.
pub fn genius_slug(input: &str) -> String {
    let words = input.replace('&', " and ").replace('-', " ");
    let words = strip_non_alphanumeric(&words, true).to_lowercase();
    let slug = words.split_whitespace().collect::<Vec<_>>().join("-");

    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}
