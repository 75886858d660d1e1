//! String utilities shared by the source heuristic and the comment-tag stripper

/// Removes `prefix` and `suffix` from `s` when both are present without overlapping.
///
/// Returns `None` when `s` is not wrapped.
///
/// # Examples
/// ```
/// use template_cache::core::utils::strip_wrapper;
///
/// assert_eq!(strip_wrapper("<!-- x -->", "<!--", "-->"), Some(" x "));
/// assert_eq!(strip_wrapper("x", "<!--", "-->"), None);
/// ```
pub fn strip_wrapper<'a>(s: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    if s.len() < prefix.len() + suffix.len() {
        return None;
    }
    s.strip_prefix(prefix)?.strip_suffix(suffix)
}
