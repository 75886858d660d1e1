//! Host document adapters
//!
//! Implementations of [`ElementStore`](crate::core::templates::ElementStore) that the
//! resolution engine queries for templates it has not been given directly.

pub mod html;
pub mod memory;

pub use html::{HtmlDocument, HtmlElement};
pub use memory::MemoryElementStore;
