//! Template compilers
//!
//! Implementations of [`TemplateCompiler`] backed by template engine crates.

pub mod minijinja_compiler;
pub mod tera_compiler;

pub use minijinja_compiler::{MiniJinjaCompiler, MiniJinjaTemplate};
pub use tera_compiler::{TeraCompiler, TeraTemplate};

use crate::core::config::EngineKind;
use crate::core::templates::TemplateCompiler;

/// Create the compiler for `engine`
pub fn compiler_for(engine: EngineKind) -> Box<dyn TemplateCompiler> {
    match engine {
        EngineKind::MiniJinja => Box::new(MiniJinjaCompiler::new()),
        EngineKind::Tera => Box::new(TeraCompiler::new()),
    }
}

/// Template engines keep the useful part of their messages in the error source chain
pub(crate) fn describe(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
