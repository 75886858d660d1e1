//! Template identifier normalization.
//!
//! Callers may refer to a template by a selector fragment (`#template-my-tpl`), a bare
//! host element id (`template-my-tpl`) or a bare logical name (`my-tpl`). All three
//! forms normalize to the same [`CanonicalKey`], which is what the caches are keyed by.
//! The reverse direction produces the element id used to query the host document.

use std::borrow::Borrow;
use std::fmt;

use crate::core::config::PrefixMatch;

/// Prefix of host element ids that hold template code
pub const ELEM_ID_PREFIX: &str = "template-";

/// Marker characters stripped from the start of an identifier
const ID_MARKERS: [char; 2] = ['#', '!'];

/// Converts any identifier form to its canonical cache key.
///
/// Trims whitespace, strips a leading run of `#`/`!`, trims again and removes the first
/// occurrence of [`ELEM_ID_PREFIX`] wherever it appears. Empty input yields `""`.
///
/// # Examples
/// ```
/// use template_cache::core::templates::to_canonical_key;
///
/// assert_eq!(to_canonical_key("#template-my-tpl-001"), "my-tpl-001");
/// assert_eq!(to_canonical_key(" template-my-tpl-001 "), "my-tpl-001");
/// assert_eq!(to_canonical_key("my-tpl-001"), "my-tpl-001");
/// ```
pub fn to_canonical_key(id: &str) -> String {
    to_canonical_key_with(id, PrefixMatch::FirstOccurrence)
}

/// Converts an identifier to its canonical key with an explicit prefix stripping mode
pub fn to_canonical_key_with(id: &str, prefix_match: PrefixMatch) -> String {
    let id = id.trim().trim_start_matches(ID_MARKERS).trim();
    match prefix_match {
        PrefixMatch::FirstOccurrence => id.replacen(ELEM_ID_PREFIX, "", 1),
        PrefixMatch::Leading => id.strip_prefix(ELEM_ID_PREFIX).unwrap_or(id).to_string(),
    }
}

/// Converts an identifier to the host element id, prepending [`ELEM_ID_PREFIX`] when missing.
///
/// # Examples
/// ```
/// use template_cache::core::templates::to_element_identifier;
///
/// assert_eq!(to_element_identifier("template-my-tpl-001"), "template-my-tpl-001");
/// assert_eq!(to_element_identifier("my-tpl-001"), "template-my-tpl-001");
/// assert_eq!(to_element_identifier(""), "template-");
/// ```
pub fn to_element_identifier(id: &str) -> String {
    let id = id.trim();
    if id.starts_with(ELEM_ID_PREFIX) {
        id.to_string()
    } else {
        format!("{ELEM_ID_PREFIX}{id}")
    }
}

/// Non-empty normalized template key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host element id addressing this template
    pub fn element_id(&self) -> String {
        to_element_identifier(&self.0)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A caller-supplied identifier after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Normalizes to a usable key
    Valid(CanonicalKey),
    /// Normalizes to the empty key
    Invalid,
}

impl Identifier {
    /// Parse a raw identifier using first-occurrence prefix stripping
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, PrefixMatch::FirstOccurrence)
    }

    pub fn parse_with(raw: &str, prefix_match: PrefixMatch) -> Self {
        let key = to_canonical_key_with(raw, prefix_match);
        if key.is_empty() {
            Identifier::Invalid
        } else {
            Identifier::Valid(CanonicalKey(key))
        }
    }

    pub fn key(&self) -> Option<&CanonicalKey> {
        match self {
            Identifier::Valid(key) => Some(key),
            Identifier::Invalid => None,
        }
    }

    pub fn into_key(self) -> Option<CanonicalKey> {
        match self {
            Identifier::Valid(key) => Some(key),
            Identifier::Invalid => None,
        }
    }
}
