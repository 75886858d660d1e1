//! MiniJinja-based template compiler
//!
//! The tag markers come from [`TemplateSettings`]: evaluate markers become MiniJinja's
//! block delimiters and interpolate markers its variable delimiters. MiniJinja has no
//! escaping print tag, so escape tags are turned into variable tags piped through the
//! `escape` filter before the source is handed over.
//!
//! With the default markers a template reads:
//!
//! ```text
//! <ul>
//! <% for person in data %>
//!   <li><%= person.name %>: <%- person.bio %></li>
//! <% endfor %>
//! </ul>
//! ```

use std::collections::HashMap;

use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, Value};
use serde_json::Value as JsonValue;

use super::describe;
use crate::core::config::TemplateSettings;
use crate::core::error::{Error, Result};
use crate::core::templates::{Renderer, TemplateCompiler};

/// Name of the single template registered in each compiled environment
const TEMPLATE_NAME: &str = "__template";

/// Compiles sources with MiniJinja using the configured tag markers
#[derive(Debug, Default, Clone, Copy)]
pub struct MiniJinjaCompiler;

impl MiniJinjaCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateCompiler for MiniJinjaCompiler {
    fn compile(&self, source: &str, settings: &TemplateSettings) -> Result<Box<dyn Renderer>> {
        settings.validate()?;

        let evaluate = &settings.evaluate;
        let interpolate = &settings.interpolate;
        let syntax = SyntaxConfig::builder()
            .block_delimiters(evaluate.open.clone(), evaluate.close.clone())
            .variable_delimiters(interpolate.open.clone(), interpolate.close.clone())
            .comment_delimiters(format!("{}#", evaluate.open), evaluate.close.clone())
            .build()
            .map_err(|e| Error::config(format!("Unusable tag markers: {}", describe(&e))))?;

        let source = rewrite_escape_tags(source, settings)?;

        let mut env = Environment::new();
        env.set_syntax(syntax);
        env.set_keep_trailing_newline(true);
        env.add_template_owned(TEMPLATE_NAME, source)
            .map_err(|e| Error::compile(describe(&e)))?;

        Ok(Box::new(MiniJinjaTemplate {
            env,
            variable: settings.variable.clone(),
        }))
    }
}

/// A template parsed by MiniJinja
pub struct MiniJinjaTemplate {
    env: Environment<'static>,
    variable: Option<String>,
}

impl Renderer for MiniJinjaTemplate {
    fn render(&self, data: &JsonValue) -> Result<String> {
        let context = match &self.variable {
            Some(variable) => Value::from_serialize(HashMap::from([(variable.as_str(), data)])),
            None => Value::from_serialize(data),
        };
        self.env
            .get_template(TEMPLATE_NAME)
            .and_then(|template| template.render(context))
            .map_err(|e| Error::render(describe(&e)))
    }
}

/// Rewrite `<%- expr %>` into `<%= (expr) | escape %>` using the configured markers
fn rewrite_escape_tags(source: &str, settings: &TemplateSettings) -> Result<String> {
    let escape = &settings.escape;
    let interpolate = &settings.interpolate;
    if escape == interpolate {
        return Ok(source.to_string());
    }

    let mut rewritten = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find(escape.open.as_str()) {
        rewritten.push_str(&rest[..start]);
        let body = &rest[start + escape.open.len()..];
        let end = body
            .find(escape.close.as_str())
            .ok_or_else(|| Error::compile(format!("unclosed `{}` tag", escape.open)))?;
        rewritten.push_str(&format!(
            "{} ({}) | escape {}",
            interpolate.open,
            body[..end].trim(),
            interpolate.close
        ));
        rest = &body[end + escape.close.len()..];
    }
    rewritten.push_str(rest);
    Ok(rewritten)
}
