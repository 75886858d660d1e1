//! Infrastructure layer
//!
//! Concrete template compilers and host document adapters plugged into the core
//! resolution engine, plus the default wiring of [`TemplateManager`](crate::TemplateManager).

pub mod compiler;
mod defaults;
pub mod dom;
