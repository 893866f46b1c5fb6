//! Canonical endpoint and suite keys.

/// Characters the status service folds to `-` when deriving a key.
const SEPARATORS: [char; 7] = ['/', '_', ',', '.', '#', '+', '&'];

/// Derive the canonical `{group}_{name}` key for a monitored resource.
///
/// Every separator-like character (`/ _ , . # + &`) in `group` and `name` is
/// replaced with `-`; everything else, including hyphens, whitespace and
/// non-ASCII text, is kept. An empty group yields `_{name}`.
///
/// ```
/// use gatus_client::normalize_key;
///
/// assert_eq!(normalize_key("core", "blog-home"), "core_blog-home");
/// assert_eq!(normalize_key("api/v1", "health_check.test"), "api-v1_health-check-test");
/// assert_eq!(normalize_key("", "standalone"), "_standalone");
/// ```
pub fn normalize_key(group: &str, name: &str) -> String {
    let mut key = String::with_capacity(group.len() + name.len() + 1);
    key.extend(group.chars().map(fold));
    key.push('_');
    key.extend(name.chars().map(fold));
    key
}

fn fold(c: char) -> char {
    if SEPARATORS.contains(&c) {
        '-'
    } else {
        c
    }
}
