//! Template resolution and rendering.
//!
//! The `TemplateManager` resolves a template id to rendered output. Lookups are tried in
//! a fixed order, first match wins:
//!
//! 1. **Compiled cache**: invoke the cached renderer.
//! 2. **Source cache**: compile the cached source, cache the renderer, invoke it.
//! 3. **Host document**: fetch the source from the [`ElementStore`], cache it, then
//!    continue as in step 2.
//!
//! Misses are never cached; a template that could not be found is looked up again on
//! the next call. Replacing a source with [`TemplateManager::add`] drops the compiled
//! form so stale output is never served.
//!
//! `add`, `remove` and `render` never fail. Problems are reported through `tracing` and
//! the operation returns `false` or an empty string. [`TemplateManager::try_render`]
//! reports the same diagnostics and also returns the error.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value as JsonValue;
use tracing::{debug, error, warn};

use super::{
    CanonicalKey, CompiledCache, ElementStore, Identifier, Renderer, SourceCache, SourceLocator,
    TemplateCompiler,
};
use crate::core::config::{RetentionPolicy, TemplateSettings};
use crate::core::error::{Error, Result};

/// Caches template sources and compiled templates, and renders them by id
pub struct TemplateManager {
    settings: TemplateSettings,
    compiler: Box<dyn TemplateCompiler>,
    locator: SourceLocator,
    sources: SourceCache,
    compiled: CompiledCache,
}

impl fmt::Debug for TemplateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateManager")
            .field("settings", &self.settings)
            .field("sources", &self.sources)
            .field("compiled", &self.compiled)
            .finish_non_exhaustive()
    }
}

impl TemplateManager {
    /// Create a manager with empty caches from its collaborators
    pub fn from_parts(
        settings: TemplateSettings,
        compiler: Box<dyn TemplateCompiler>,
        store: Box<dyn ElementStore>,
    ) -> Self {
        Self {
            settings,
            compiler,
            locator: SourceLocator::new(store),
            sources: SourceCache::new(),
            compiled: CompiledCache::new(),
        }
    }

    pub fn with_settings(mut self, settings: TemplateSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_compiler(self, compiler: impl TemplateCompiler + 'static) -> Self {
        self.with_boxed_compiler(Box::new(compiler))
    }

    pub fn with_boxed_compiler(mut self, compiler: Box<dyn TemplateCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    /// Set the host document consulted for templates that were never added
    pub fn with_element_store(mut self, store: impl ElementStore + 'static) -> Self {
        self.locator = SourceLocator::new(Box::new(store));
        self
    }

    pub fn settings(&self) -> &TemplateSettings {
        &self.settings
    }

    pub fn source_cache(&self) -> &SourceCache {
        &self.sources
    }

    pub fn compiled_cache(&self) -> &CompiledCache {
        &self.compiled
    }

    pub fn element_store(&self) -> &dyn ElementStore {
        self.locator.store()
    }

    fn parse_id(&self, id: &str) -> Identifier {
        Identifier::parse_with(id, self.settings.prefix_match)
    }

    /// Register template source under `id`.
    ///
    /// Returns `false` without touching the caches when `source` is empty or `id`
    /// normalizes to an empty key. A compiled template for the same key is discarded.
    pub fn add(&mut self, id: &str, source: &str) -> bool {
        if source.is_empty() {
            debug!("Ignoring empty template code for \"{}\"", id);
            return false;
        }
        let Some(key) = self.parse_id(id).into_key() else {
            error!("Missing template id to add template code");
            return false;
        };

        if self.settings.warn_on_overwrite
            && (self.sources.has(key.as_str()) || self.compiled.has(key.as_str()))
        {
            warn!("Template id \"{}\" already existed.", key);
        }
        if self.compiled.delete(key.as_str()).is_some() {
            debug!("Invalidated compiled template \"{}\"", key);
        }
        self.sources.set(key, source.to_string());
        true
    }

    /// Drop both cached forms of `id`, returning whether anything was cached
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(key) = self.parse_id(id).into_key() else {
            return false;
        };
        let had_source = self.sources.delete(key.as_str()).is_some();
        let had_compiled = self.compiled.delete(key.as_str()).is_some();
        if had_source || had_compiled {
            debug!("Removed template \"{}\"", key);
        }
        had_source || had_compiled
    }

    /// Render the template for `id` with `data`.
    ///
    /// Returns an empty string when no usable template exists or it fails to compile
    /// or render.
    pub fn render(&mut self, id: &str, data: &JsonValue) -> String {
        self.try_render(id, data).unwrap_or_default()
    }

    /// Like [`render`](Self::render), but hands the failure back to the caller.
    ///
    /// An invalid id yields [`Error::InvalidId`], a template that could not be found
    /// [`Error::Lookup`], and engine failures [`Error::Compile`] or [`Error::Render`].
    pub fn try_render(&mut self, id: &str, data: &JsonValue) -> Result<String> {
        let Some(key) = self.parse_id(id).into_key() else {
            warn!("Invalid template id: \"{}\"", id);
            return Err(Error::InvalidId(id.to_string()));
        };

        if let Some(renderer) = self.compiled.get(key.as_str()) {
            debug!("Rendering \"{}\" from compiled cache", key);
            return invoke(&key, renderer.as_ref(), data);
        }

        if !self.sources.has(key.as_str()) {
            match self.locator.locate(&key, &self.settings) {
                Ok(source) => {
                    debug!("Loaded template \"{}\" from host document", key);
                    self.sources.set(key.clone(), source);
                }
                Err(miss) => {
                    warn!("{}", miss);
                    return Err(miss.into());
                }
            }
        }

        let renderer = self.compile(&key)?;
        let output = invoke(&key, renderer.as_ref(), data);
        self.compiled.set(key, renderer);
        output
    }

    /// Like [`render`](Self::render), reporting missing data as a usage error
    pub fn render_opt(&mut self, id: &str, data: Option<&JsonValue>) -> String {
        match data {
            Some(data) => self.render(id, data),
            None => {
                error!("Missing data to render template: \"{}\"", id);
                String::new()
            }
        }
    }

    /// Compile the cached source for `key`, applying the retention policy on success
    fn compile(&mut self, key: &CanonicalKey) -> Result<Box<dyn Renderer>> {
        let Some(source) = self.sources.get(key.as_str()) else {
            return Err(Error::compile(format!("no source cached for \"{key}\"")));
        };
        debug!("Compiling template \"{}\"", key);

        match self.compiler.compile(source, &self.settings) {
            Ok(renderer) => {
                if self.settings.retention == RetentionPolicy::Release {
                    self.sources.delete(key.as_str());
                }
                Ok(renderer)
            }
            Err(e) => {
                error!("Failed to compile template \"{}\": {}", key, e);
                Err(e)
            }
        }
    }
}

fn invoke(key: &CanonicalKey, renderer: &dyn Renderer, data: &JsonValue) -> Result<String> {
    renderer.render(data).inspect_err(|e| {
        error!("Failed to render template \"{}\": {}", key, e);
    })
}

/// A [`TemplateManager`] behind a single lock, shareable across threads
#[derive(Debug, Clone)]
pub struct SharedTemplateManager {
    inner: Arc<Mutex<TemplateManager>>,
}

impl SharedTemplateManager {
    pub fn new(manager: TemplateManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    // A panic inside a renderer poisons the lock; the caches are still consistent.
    fn lock(&self) -> MutexGuard<'_, TemplateManager> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, id: &str, source: &str) -> bool {
        self.lock().add(id, source)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.lock().remove(id)
    }

    pub fn render(&self, id: &str, data: &JsonValue) -> String {
        self.lock().render(id, data)
    }

    pub fn try_render(&self, id: &str, data: &JsonValue) -> Result<String> {
        self.lock().try_render(id, data)
    }

    /// Run `f` with the manager locked, e.g. to inspect the caches
    pub fn with_manager<R>(&self, f: impl FnOnce(&TemplateManager) -> R) -> R {
        f(&self.lock())
    }
}

impl From<TemplateManager> for SharedTemplateManager {
    fn from(manager: TemplateManager) -> Self {
        Self::new(manager)
    }
}
