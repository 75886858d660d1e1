//! Template resolution and caching.
//!
//! This module turns a template id into rendered output. It provides:
//! - Identifier normalization to canonical cache keys and host element ids
//! - A substring heuristic that screens candidate template sources
//! - Unwrapping of template code hidden in HTML comments
//! - Source and compiled-template caches
//! - Lookup of unregistered templates in a host document
//! - The [`TemplateManager`] that ties these together

pub mod cache;
pub mod id;
pub mod manager;
pub mod source;
pub mod traits;

pub use cache::*;
pub use id::*;
pub use manager::*;
pub use source::*;
pub use traits::*;
