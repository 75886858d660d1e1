//! Error handling for the template cache library.
//!
//! This module defines the main error type `Error` used by the fallible internals
//! (compilation, rendering, configuration and document loading), along with a
//! convenient `Result` type alias. The resolution operations on
//! [`TemplateManager`](crate::core::templates::TemplateManager) report these errors as
//! diagnostics and return a failure sentinel; only `try_render` hands them back.
//!
//! # Examples
//!
//! ```
//! use template_cache::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::compile("unclosed tag"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

use crate::core::templates::LookupMiss;

/// Result type for template cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for template cache operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Identifier that normalizes to an empty key
    #[error("Invalid template id: \"{0}\"")]
    InvalidId(String),

    /// No usable source in the caches or the host document
    #[error(transparent)]
    Lookup(#[from] LookupMiss),

    /// Template source failed to compile
    #[error("Compile error: {0}")]
    Compile(String),

    /// Compiled template failed while rendering
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new compile error
    pub fn compile<S: Into<String>>(msg: S) -> Self {
        Self::Compile(msg.into())
    }

    /// Create a new render error
    pub fn render<S: Into<String>>(msg: S) -> Self {
        Self::Render(msg.into())
    }
}
