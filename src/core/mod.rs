//! Template cache core
//!
//! Identifier handling, caching and resolution, independent of any particular
//! template engine or host document.

pub mod config;
pub mod error;
pub mod templates;
pub mod utils;

pub use error::Error;
