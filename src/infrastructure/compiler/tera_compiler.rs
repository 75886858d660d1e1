//! Tera-based template compiler

use serde_json::Value as JsonValue;
use tera::{Context, Tera};

use super::describe;
use crate::core::config::TemplateSettings;
use crate::core::error::{Error, Result};
use crate::core::templates::{Renderer, TemplateCompiler};

/// Name of the single template registered in each compiled Tera instance
const TEMPLATE_NAME: &str = "__template";

/// Compiles sources with Tera; parsing happens once, at compile time
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraCompiler;

impl TeraCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateCompiler for TeraCompiler {
    fn compile(&self, source: &str, settings: &TemplateSettings) -> Result<Box<dyn Renderer>> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(|e| Error::compile(format!("Failed to add template: {}", describe(&e))))?;

        Ok(Box::new(TeraTemplate {
            tera,
            variable: settings.variable.clone(),
        }))
    }
}

/// A template parsed by Tera
pub struct TeraTemplate {
    tera: Tera,
    variable: Option<String>,
}

impl TeraTemplate {
    fn context(&self, data: &JsonValue) -> Result<Context> {
        match &self.variable {
            Some(variable) => {
                let mut context = Context::new();
                context.insert(variable.as_str(), data);
                Ok(context)
            }
            None => Ok(Context::from_serialize(data)?),
        }
    }
}

impl Renderer for TeraTemplate {
    fn render(&self, data: &JsonValue) -> Result<String> {
        let context = self.context(data)?;
        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| Error::render(describe(&e)))
    }
}
