//! URL slugs for city, club and tag names.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Map a display name to a URL-safe slug segment.
///
/// German umlauts and `ß` are transliterated, other diacritics are stripped
/// via NFD decomposition, and every run of characters outside `[a-z0-9]`
/// collapses into a single hyphen. The result never starts or ends with a
/// hyphen and may be empty.
///
/// ```
/// use runclubs_core::sanitize_name;
///
/// assert_eq!(sanitize_name("Frankfurt am Main"), "frankfurt-am-main");
/// assert_eq!(sanitize_name("Köln"), "koeln");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let lower = name.to_lowercase();

    let mut replaced = String::with_capacity(lower.len());
    for c in lower.chars() {
        match c {
            'ä' => replaced.push_str("ae"),
            'ö' => replaced.push_str("oe"),
            'ü' => replaced.push_str("ue"),
            'ß' => replaced.push_str("ss"),
            ' ' | '.' | '\'' | '"' | '(' | ')' => replaced.push('-'),
            _ => replaced.push(c),
        }
    }

    let mut slug = String::with_capacity(replaced.len());
    let mut need_sep = false;
    for c in replaced.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if need_sep && !slug.is_empty() {
                slug.push('-');
            }
            need_sep = false;
            slug.push(c);
        } else {
            need_sep = true;
        }
    }
    slug
}
