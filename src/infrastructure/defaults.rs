//! Default wiring of the template manager to the bundled adapters

use crate::core::config::{Config, TemplateSettings};
use crate::core::templates::TemplateManager;
use crate::infrastructure::compiler::{MiniJinjaCompiler, compiler_for};
use crate::infrastructure::dom::MemoryElementStore;

impl Default for TemplateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateManager {
    /// Create a manager with default settings, the MiniJinja compiler and an empty host
    /// document
    pub fn new() -> Self {
        Self::from_parts(
            TemplateSettings::default(),
            Box::new(MiniJinjaCompiler::new()),
            Box::new(MemoryElementStore::new()),
        )
    }

    /// Create a manager for a loaded configuration file
    pub fn from_config(config: &Config) -> Self {
        Self::from_parts(
            config.templates.clone(),
            compiler_for(config.engine),
            Box::new(MemoryElementStore::new()),
        )
    }
}
