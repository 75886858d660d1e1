//! Template cache - fetch, cache and render templates by id
//!
//! Templates are registered by id with [`TemplateManager::add`] or found in a host
//! document (`<script type="text/template" id="template-...">`). Both the raw source
//! and the compiled form are cached, and [`TemplateManager::render`] picks the fastest
//! available form.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use template_cache::TemplateManager;
//!
//! let mut templates = TemplateManager::new();
//! templates.add("paragraph", "<p><%= data.text %><p>");
//!
//! let html = templates.render("#template-paragraph", &json!({"text": "Hello world!"}));
//! assert_eq!(html, "<p>Hello world!<p>");
//! ```
#![deny(unsafe_code)]

pub mod core;
pub mod infrastructure;

pub use crate::core::config::{Config, EngineKind, RetentionPolicy, TemplateSettings};
pub use crate::core::error::{Error, Result};
pub use crate::core::templates::{
    ElementStore, Renderer, SharedTemplateManager, TemplateCompiler, TemplateManager,
};
pub use crate::infrastructure::compiler::{MiniJinjaCompiler, TeraCompiler, compiler_for};
pub use crate::infrastructure::dom::{HtmlDocument, MemoryElementStore};
