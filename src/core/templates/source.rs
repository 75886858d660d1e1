//! Template source discovery and screening.
//!
//! Sources that were never registered with `add` are looked up in the host document:
//! the key is turned into an element id, the element's text is fetched from an
//! [`ElementStore`], optionally unwrapped from an HTML comment, and accepted only if it
//! passes [`looks_like_template_source`].
//!
//! The heuristic is a substring check, not a parser. Tag-like text inside a string
//! literal counts as a tag.

use thiserror::Error;
use tracing::debug;

use super::{CanonicalKey, ElementStore};
use crate::core::config::TemplateSettings;
use crate::core::utils::strip_wrapper;

/// Opening delimiter of an HTML comment
pub const COMMENT_OPEN: &str = "<!--";
/// Closing delimiter of an HTML comment
pub const COMMENT_CLOSE: &str = "-->";

/// Whether `candidate` plausibly is template source.
///
/// True when some configured tag kind has both its open and close marker in the
/// candidate and, if a variable name is configured, the variable name occurs too.
/// Tag kinds with an empty marker never match.
///
/// # Examples
/// ```
/// use template_cache::core::config::TemplateSettings;
/// use template_cache::core::templates::looks_like_template_source;
///
/// let settings = TemplateSettings::default();
/// assert!(looks_like_template_source("<%= data %>", &settings));
/// assert!(!looks_like_template_source("<p>foobar</p>", &settings));
/// ```
pub fn looks_like_template_source(candidate: &str, settings: &TemplateSettings) -> bool {
    if candidate.is_empty() {
        return false;
    }
    let has_tags = settings.tag_pairs().iter().any(|pair| {
        pair.is_complete()
            && candidate.contains(pair.open.as_str())
            && candidate.contains(pair.close.as_str())
    });
    let has_variable = settings
        .variable
        .as_deref()
        .is_none_or(|variable| candidate.contains(variable));
    has_tags && has_variable
}

/// Unwraps template code hidden in an HTML comment.
///
/// `<!-- code -->` becomes `code` (trimmed); anything not wrapped is returned unchanged.
///
/// # Examples
/// ```
/// use template_cache::core::templates::strip_comment_wrapper;
///
/// assert_eq!(strip_comment_wrapper("<!-- foobar -->"), "foobar");
/// assert_eq!(strip_comment_wrapper("foobar"), "foobar");
/// ```
pub fn strip_comment_wrapper(candidate: &str) -> &str {
    match strip_wrapper(candidate, COMMENT_OPEN, COMMENT_CLOSE) {
        Some(inner) => inner.trim(),
        None => candidate,
    }
}

/// Why the host document could not supply a template source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupMiss {
    #[error("Element \"#{element_id}\" not found!")]
    NotFound { element_id: String },

    #[error("Element \"#{element_id}\" is empty!")]
    Empty { element_id: String },

    #[error("Template code in element \"#{element_id}\" is invalid!")]
    Invalid { element_id: String },
}

impl LookupMiss {
    pub fn element_id(&self) -> &str {
        match self {
            LookupMiss::NotFound { element_id }
            | LookupMiss::Empty { element_id }
            | LookupMiss::Invalid { element_id } => element_id,
        }
    }
}

/// Finds template sources for keys in an [`ElementStore`]
pub struct SourceLocator {
    store: Box<dyn ElementStore>,
}

impl SourceLocator {
    pub fn new(store: Box<dyn ElementStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn ElementStore {
        self.store.as_ref()
    }

    /// Look up the source for `key`, screening it with `settings`
    pub fn locate(
        &self,
        key: &CanonicalKey,
        settings: &TemplateSettings,
    ) -> Result<String, LookupMiss> {
        let element_id = key.element_id();
        debug!("Looking up template element #{}", element_id);

        let Some(text) = self.store.element_text(&element_id) else {
            return Err(LookupMiss::NotFound { element_id });
        };

        let mut code = text.trim();
        if code.is_empty() {
            return Err(LookupMiss::Empty { element_id });
        }
        if settings.unwrap_comment_tag {
            code = strip_comment_wrapper(code);
        }

        if looks_like_template_source(code, settings) {
            Ok(code.to_string())
        } else {
            Err(LookupMiss::Invalid { element_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TagPair;
    use crate::core::templates::Identifier;
    use crate::infrastructure::dom::MemoryElementStore;

    const TEMPLATE_CODE_1: &str = "<p><%= data.text %><p>";
    const TEMPLATE_CODE_2: &str = "<ul>\n<% for person in data %>\n<li><%= person.name ~ ': ' ~ person.age %></li>\n<% endfor %>\n</ul>";

    fn key(raw: &str) -> CanonicalKey {
        Identifier::parse(raw).into_key().unwrap()
    }

    #[test]
    fn test_looks_like_template_source() {
        let settings = TemplateSettings::default();
        assert!(looks_like_template_source(TEMPLATE_CODE_1, &settings));
        assert!(looks_like_template_source(TEMPLATE_CODE_2, &settings));
        assert!(looks_like_template_source("<%= data %>", &settings));

        assert!(!looks_like_template_source("", &settings));
        assert!(!looks_like_template_source("foobar", &settings));
        assert!(!looks_like_template_source("<p>foobar</p>", &settings));
        assert!(!looks_like_template_source("<% open only", &settings));
        assert!(!looks_like_template_source("<%= name %>", &settings));
    }

    #[test]
    fn test_looks_like_template_source_is_substring_based() {
        let settings = TemplateSettings::default();
        // tags inside a string literal still count
        assert!(looks_like_template_source("var s = '<% data %>'", &settings));
        // the variable name only has to occur somewhere
        assert!(looks_like_template_source("<%= database %>", &settings));
    }

    #[test]
    fn test_looks_like_template_source_without_variable() {
        let settings = TemplateSettings::default().with_variable(None);
        assert!(looks_like_template_source("<%= name %>", &settings));
        assert!(!looks_like_template_source("name", &settings));
    }

    #[test]
    fn test_looks_like_template_source_tera_markers() {
        let settings = TemplateSettings::tera();
        assert!(looks_like_template_source("<p>{{ data.text }}</p>", &settings));
        assert!(looks_like_template_source("{% for x in data %}{% endfor %}", &settings));
        assert!(!looks_like_template_source("<%= data %>", &settings));
    }

    #[test]
    fn test_looks_like_template_source_ignores_empty_markers() {
        let settings = TemplateSettings {
            evaluate: TagPair::new("", ""),
            interpolate: TagPair::new("", "%>"),
            escape: TagPair::new("<%-", ""),
            ..TemplateSettings::default()
        };
        assert!(!looks_like_template_source("data", &settings));
        assert!(!looks_like_template_source("<%= data %>", &settings));
    }

    #[test]
    fn test_strip_comment_wrapper() {
        assert_eq!(strip_comment_wrapper("<!-- foobar -->"), "foobar");
        assert_eq!(strip_comment_wrapper("<!-- <p>foobar</p> -->"), "<p>foobar</p>");
    }

    #[test]
    fn test_strip_comment_wrapper_returns_unwrapped_input() {
        for code in ["", "<%= data %>", "foobar", "<p>foobar</p>", "<!-- open", "<!-->"] {
            assert_eq!(strip_comment_wrapper(code), code);
        }
    }

    #[test]
    fn test_locate_found() {
        let mut store = MemoryElementStore::new();
        store.insert("template-paragraph", format!("\n  {TEMPLATE_CODE_1}\n"));
        let locator = SourceLocator::new(Box::new(store));

        let source = locator
            .locate(&key("paragraph"), &TemplateSettings::default())
            .unwrap();
        assert_eq!(source, TEMPLATE_CODE_1);
    }

    #[test]
    fn test_locate_misses() {
        let mut store = MemoryElementStore::new();
        store.insert("template-blank", "   \n ");
        store.insert("template-markup", "<p>foobar</p>");
        let locator = SourceLocator::new(Box::new(store));
        let settings = TemplateSettings::default();

        assert_eq!(
            locator.locate(&key("missing"), &settings),
            Err(LookupMiss::NotFound {
                element_id: "template-missing".to_string()
            })
        );
        assert_eq!(
            locator.locate(&key("blank"), &settings),
            Err(LookupMiss::Empty {
                element_id: "template-blank".to_string()
            })
        );
        let miss = locator.locate(&key("markup"), &settings).unwrap_err();
        assert!(matches!(miss, LookupMiss::Invalid { .. }));
        assert_eq!(
            miss.to_string(),
            "Template code in element \"#template-markup\" is invalid!"
        );
    }

    #[test]
    fn test_locate_comment_wrapped() {
        let mut store = MemoryElementStore::new();
        store.insert("template-wrapped", format!("<!-- {TEMPLATE_CODE_1} -->"));
        let locator = SourceLocator::new(Box::new(store));

        let plain = TemplateSettings::default();
        let wrapped = locator.locate(&key("wrapped"), &plain).unwrap();
        assert_eq!(wrapped, format!("<!-- {TEMPLATE_CODE_1} -->"));

        let unwrapping = TemplateSettings::default().with_unwrap_comment_tag(true);
        let unwrapped = locator.locate(&key("wrapped"), &unwrapping).unwrap();
        assert_eq!(unwrapped, TEMPLATE_CODE_1);
    }
}
