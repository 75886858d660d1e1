//! Element store backed by an HTML page.
//!
//! Templates are commonly shipped inside a page as dummy elements that browsers do not
//! render, e.g. `<script type="text/template" id="template-paragraph">`. This store
//! indexes the raw inner HTML of every element carrying an `id` attribute, like
//! `document.getElementById(id).innerHTML` would return it. It is a scanner, not an
//! HTML parser:
//! - `<script>` and `<style>` contents are raw text and are not scanned for elements.
//! - An element ends at the close tag that balances nested tags of the same name.
//! - Void and self-closing elements have empty contents.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::error::Result;
use crate::core::templates::ElementStore;

static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<([a-z][a-z0-9-]*)\b((?:[^>\x22']|\x22[^\x22]*\x22|'[^']*')*)>")
        .expect("valid regex")
});
static ID_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid regex")
});

/// Elements whose contents are not markup
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Elements that never have contents
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// An element with an id and its raw inner HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlElement {
    pub id: String,
    pub text: String,
    /// Byte offset of the element in the document
    pub offset: usize,
}

/// Elements of an HTML document that carry an id, in document order
#[derive(Debug, Default, Clone)]
pub struct HtmlDocument {
    elements: Vec<HtmlElement>,
}

impl HtmlDocument {
    /// Scan `html` for elements with an `id`
    pub fn parse(html: &str) -> Self {
        let mut elements = Vec::new();
        let mut pos = 0;

        while let Some(caps) = OPEN_TAG_RE.captures_at(html, pos) {
            let (Some(tag), Some(name), Some(attributes)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                break;
            };
            let name = name.as_str().to_ascii_lowercase();
            let attributes = attributes.as_str();
            let content_start = tag.end();
            pos = content_start;

            let self_closing = attributes.trim_end().ends_with('/');
            let inner = if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                Some((content_start, content_start))
            } else if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let end = raw_text_end(html, &name, content_start);
                if let Some((_, close_end)) = end {
                    pos = close_end;
                }
                end.map(|(close_start, _)| (content_start, close_start))
            } else {
                balanced_end(html, &name, content_start)
                    .map(|(close_start, _)| (content_start, close_start))
            };

            if let (Some(id), Some((start, end))) = (element_id(attributes), inner) {
                elements.push(HtmlElement {
                    id,
                    text: html[start..end].to_string(),
                    offset: tag.start(),
                });
            }
        }

        debug!("Found {} elements with an id in HTML document", elements.len());
        Self { elements }
    }

    /// Read and scan an HTML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading HTML document: {}", path.display());
        let html = std::fs::read_to_string(path)?;
        Ok(Self::parse(&html))
    }

    pub fn elements(&self) -> &[HtmlElement] {
        &self.elements
    }

    /// Ids of all elements, in document order
    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|element| element.id.as_str())
    }
}

fn element_id(attributes: &str) -> Option<String> {
    let caps = ID_ATTR_RE.captures(attributes)?;
    let id = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(id.as_str().to_string())
}

fn tag_re(name: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(name))).ok()
}

/// Start and end of the first close tag of `name` after `from`
fn raw_text_end(html: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    tag_re(name)?
        .captures_iter(&html[from..])
        .filter(|caps| caps.get(1).is_some_and(|slash| !slash.is_empty()))
        .find_map(|caps| caps.get(0))
        .map(|close| (from + close.start(), from + close.end()))
}

/// Start and end of the close tag of `name` that balances the element opened before `from`
fn balanced_end(html: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    for caps in tag_re(name)?.captures_iter(&html[from..]) {
        let tag = caps.get(0)?;
        let closing = caps.get(1).is_some_and(|slash| !slash.is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return Some((from + tag.start(), from + tag.end()));
            }
        } else if !tag.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}

impl ElementStore for HtmlDocument {
    /// The first element with a matching id wins, like `getElementById`
    fn element_text(&self, element_id: &str) -> Option<String> {
        self.elements
            .iter()
            .find(|element| element.id == element_id)
            .map(|element| element.text.clone())
    }
}
