//! Collaborator seams of the resolution engine.
//!
//! The engine does not parse or execute template syntax itself. It hands source text to
//! a [`TemplateCompiler`], caches the returned [`Renderer`], and looks up sources it has
//! never seen in an [`ElementStore`] that stands in for the host document.

use serde_json::Value as JsonValue;

use crate::core::config::TemplateSettings;
use crate::core::error::Result;

/// A compiled template, ready to be applied to render data
pub trait Renderer: Send + Sync {
    fn render(&self, data: &JsonValue) -> Result<String>;
}

impl<F> Renderer for F
where
    F: Fn(&JsonValue) -> Result<String> + Send + Sync,
{
    fn render(&self, data: &JsonValue) -> Result<String> {
        self(data)
    }
}

/// Turns template source into a [`Renderer`]
pub trait TemplateCompiler: Send + Sync {
    /// Compile `source` using the tag markers and variable name in `settings`
    fn compile(&self, source: &str, settings: &TemplateSettings) -> Result<Box<dyn Renderer>>;
}

/// Host element lookup by element id
pub trait ElementStore: Send + Sync {
    /// Text content of the element with `element_id`, or `None` when there is no such element
    fn element_text(&self, element_id: &str) -> Option<String>;
}
