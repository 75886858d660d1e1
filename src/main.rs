//! template-cache CLI entrypoint
//! Parses command-line arguments and dispatches to the template manager.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use template_cache::core::templates::{
    looks_like_template_source, strip_comment_wrapper, to_canonical_key,
};
use template_cache::{Config, EngineKind, Error, HtmlDocument, TemplateManager};

// External imports (alphabetized)
use anyhow::{Context, bail};
use clap::Parser;
use serde_json::Value as JsonValue;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "template-cache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log cache activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render a template by id
    Render {
        /// Template id (`name`, `template-name` or `#template-name`)
        id: String,
        /// HTML document holding elements with `id="template-..."`
        #[arg(long)]
        document: Option<PathBuf>,
        /// Render data as a JSON string
        #[arg(long, conflicts_with = "data_file")]
        data: Option<String>,
        /// Render data read from a JSON file
        #[arg(long)]
        data_file: Option<PathBuf>,
        /// Template source file registered under the id before rendering
        #[arg(long)]
        source: Option<PathBuf>,
        /// Template engine (overrides the configuration file)
        #[arg(long, value_enum)]
        engine: Option<EngineKind>,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Check whether a file looks like template source
    Check {
        /// File to check (reads stdin if not provided)
        file: Option<PathBuf>,
        /// Unwrap `<!-- ... -->` before checking
        #[arg(long)]
        unwrap_comments: bool,
        /// Variable name the template must mention
        #[arg(long, conflicts_with = "no_variable")]
        variable: Option<String>,
        /// Do not require a variable name
        #[arg(long)]
        no_variable: bool,
        /// Template engine whose tag markers are checked
        #[arg(long, value_enum, default_value_t = EngineKind::MiniJinja)]
        engine: EngineKind,
    },
    /// List the element ids of an HTML document
    Ids {
        /// HTML document to scan
        #[arg(long)]
        document: PathBuf,
    },
}

/// Exit status for usage errors such as missing render data
const USAGE_ERROR: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries rendered output
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            id,
            document,
            data,
            data_file,
            source,
            engine,
            config,
        } => render(RenderParams {
            id,
            document,
            data,
            data_file,
            source,
            engine,
            config,
        }),
        Commands::Check {
            file,
            unwrap_comments,
            variable,
            no_variable,
            engine,
        } => check(file.as_deref(), unwrap_comments, variable, no_variable, engine),
        Commands::Ids { document } => list_ids(&document),
    }
}

struct RenderParams {
    id: String,
    document: Option<PathBuf>,
    data: Option<String>,
    data_file: Option<PathBuf>,
    source: Option<PathBuf>,
    engine: Option<EngineKind>,
    config: Option<PathBuf>,
}

fn render(params: RenderParams) -> anyhow::Result<ExitCode> {
    let config = match &params.config {
        Some(path) => Config::from_file_with_engine(path, params.engine)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::for_engine(params.engine.unwrap_or_default()),
    };
    info!("Using {:?} engine", config.engine);

    let mut manager = TemplateManager::from_config(&config);
    if let Some(path) = &params.document {
        let document = HtmlDocument::from_file(path)
            .with_context(|| format!("Failed to read document {}", path.display()))?;
        manager = manager.with_element_store(document);
    }

    if let Some(path) = &params.source {
        let code = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template source {}", path.display()))?;
        if !manager.add(&params.id, &code) {
            bail!("Could not add template source from {}", path.display());
        }
    }

    let Some(data) = load_data(params.data.as_deref(), params.data_file.as_deref())? else {
        manager.render_opt(&params.id, None);
        return Ok(ExitCode::from(USAGE_ERROR));
    };

    match manager.try_render(&params.id, &data) {
        Ok(output) => {
            debug!("Rendered \"{}\" ({} bytes)", params.id, output.len());
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(Error::Lookup(_) | Error::InvalidId(_)) => {
            bail!("Template not found: \"{}\"", params.id)
        }
        Err(e) => bail!("Failed to render template \"{}\": {}", params.id, e),
    }
}

fn load_data(inline: Option<&str>, file: Option<&Path>) -> anyhow::Result<Option<JsonValue>> {
    if let Some(json) = inline {
        let data = serde_json::from_str(json).context("Invalid JSON in --data")?;
        return Ok(Some(data));
    }
    if let Some(path) = file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {}", path.display()))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        return Ok(Some(data));
    }
    Ok(None)
}

fn check(
    file: Option<&Path>,
    unwrap_comments: bool,
    variable: Option<String>,
    no_variable: bool,
    engine: EngineKind,
) -> anyhow::Result<ExitCode> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let mut settings = engine.default_settings();
    if no_variable {
        settings.variable = None;
    } else if variable.is_some() {
        settings.variable = variable;
    }

    let mut code = content.trim();
    if unwrap_comments {
        code = strip_comment_wrapper(code);
    }

    if looks_like_template_source(code, &settings) {
        println!("valid");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("invalid");
        Ok(ExitCode::FAILURE)
    }
}

fn list_ids(document: &Path) -> anyhow::Result<ExitCode> {
    let document = HtmlDocument::from_file(document)
        .with_context(|| format!("Failed to read document {}", document.display()))?;
    for id in document.element_ids() {
        println!("{}\t{}", id, to_canonical_key(id));
    }
    Ok(ExitCode::SUCCESS)
}
