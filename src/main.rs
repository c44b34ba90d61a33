//! Binary entry point for the grovedoc CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Document every source under two roots
//! grovedoc build --source-path src/main/groovy --source-path src/main/java
//!
//! # Document named files only, with private members
//! grovedoc build --property privateScope=true pkg/a/Foo.java pkg/a/package.html
//!
//! # List what discovery would pick up
//! grovedoc files --source-path src
//! ```

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use grovedoc::config::{Config, GrovedocConfig, SearchPolicy};
use grovedoc::error::{GrovedocError, OutputErrorCode};
use grovedoc::output::{emit_response, BuildResponse, ErrorResponse, SCHEMA_VERSION};
use grovedoc::{files, CollisionPolicy, Diagnostics, LinkArgument, RootDocBuilder};

// ============================================================================
// CLI Structure
// ============================================================================

/// API documentation model for Groovy and Java sources.
///
/// Output is one JSON document on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "grovedoc", version, about = "Groovy and Java documentation model builder")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (default: grovedoc.toml in the current directory, if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Source root; repeat for a search path. Replaces the configured roots.
    #[arg(long = "source-path", global = true)]
    source_path: Vec<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and resolve the documentation model, then print a summary.
    Build {
        /// Relative file names to process, in order. Discovered under the
        /// source roots when omitted.
        files: Vec<String>,

        /// Which copy to read when a name exists under several roots.
        #[arg(long, value_enum)]
        search_policy: Option<SearchPolicyArg>,

        /// What to do when a class is defined twice.
        #[arg(long, value_enum)]
        collision_policy: Option<CollisionPolicyArg>,

        /// Assembler property in `<key>=<value>` format; repeatable.
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,

        /// External link in `<packages>=<href>` format; repeatable.
        #[arg(long = "link", value_parser = parse_link)]
        links: Vec<LinkArgument>,

        /// Include full class documents in the output.
        #[arg(long)]
        documents: bool,
    },
    /// List the files discovery finds under the source roots.
    Files,
}

/// Parse a property in `<key>=<value>` format.
fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!(
            "invalid property '{}', expected '<key>=<value>' (e.g., 'privateScope=true')",
            s
        )),
    }
}

/// Parse a link in `<packages>=<href>` format.
fn parse_link(s: &str) -> Result<LinkArgument, String> {
    match s.split_once('=') {
        Some((packages, href)) if !packages.is_empty() && !href.is_empty() => {
            Ok(LinkArgument::new(packages, href))
        }
        _ => Err(format!(
            "invalid link '{}', expected '<packages>=<href>' (e.g., 'java.,javax.=https://docs.oracle.com/javase/8/docs/api/')",
            s
        )),
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SearchPolicyArg {
    FirstMatch,
    LastMatch,
    Error,
}

impl From<SearchPolicyArg> for SearchPolicy {
    fn from(arg: SearchPolicyArg) -> Self {
        match arg {
            SearchPolicyArg::FirstMatch => SearchPolicy::FirstMatch,
            SearchPolicyArg::LastMatch => SearchPolicy::LastMatch,
            SearchPolicyArg::Error => SearchPolicy::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CollisionPolicyArg {
    Overwrite,
    Report,
    KeepFirst,
}

impl From<CollisionPolicyArg> for CollisionPolicy {
    fn from(arg: CollisionPolicyArg) -> Self {
        match arg {
            CollisionPolicyArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionPolicyArg::Report => CollisionPolicy::Report,
            CollisionPolicyArg::KeepFirst => CollisionPolicy::KeepFirst,
        }
    }
}

/// Response for the files command.
#[derive(Debug, serde::Serialize)]
struct FilesResponse {
    status: String,
    schema_version: String,
    files: Vec<String>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_json);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON too.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), GrovedocError> {
    let mut settings = load_settings(&cli.global)?;
    match cli.command {
        Command::Build {
            files,
            search_policy,
            collision_policy,
            properties,
            links,
            documents,
        } => {
            if let Some(policy) = search_policy {
                settings.search_policy = policy.into();
            }
            if let Some(policy) = collision_policy {
                settings.collision_policy = policy.into();
            }
            for (key, value) in properties {
                settings.properties.set(key, value);
            }
            settings.links.extend(links);
            execute_build(settings, files, documents)
        }
        Command::Files => {
            let response = FilesResponse {
                status: "ok".to_string(),
                schema_version: SCHEMA_VERSION.to_string(),
                files: files::discover(&settings.source_path),
            };
            write_response(&response)
        }
    }
}

/// Configuration file values with the global flags applied.
fn load_settings(global: &GlobalArgs) -> Result<GrovedocConfig, GrovedocError> {
    let config = match &global.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = env::current_dir().map_err(|e| GrovedocError::io(".", e))?;
            Config::load_or_default(&cwd)?
        }
    };
    let mut settings = config.grovedoc;
    if !global.source_path.is_empty() {
        settings.source_path = global.source_path.clone();
    }
    for root in &settings.source_path {
        if !root.is_dir() {
            return Err(GrovedocError::NotFound { path: root.clone() });
        }
    }
    Ok(settings)
}

fn execute_build(
    settings: GrovedocConfig,
    file_names: Vec<String>,
    documents: bool,
) -> Result<(), GrovedocError> {
    let file_names = if file_names.is_empty() {
        files::discover(&settings.source_path)
    } else {
        file_names
    };

    let mut builder = RootDocBuilder::new(settings);
    let mut diagnostics = Diagnostics::new();
    builder.build_tree(&file_names, &mut diagnostics)?;

    let resolution = builder.resolve();
    let root = builder.root_doc();
    let mut response = BuildResponse::new(root, resolution, &diagnostics);
    if documents {
        response = response.with_documents(root);
    }
    write_response(&response)
}

fn write_response<T: serde::Serialize>(response: &T) -> Result<(), GrovedocError> {
    let mut stdout = io::stdout();
    emit_response(response, &mut stdout)
        .and_then(|()| stdout.flush())
        .map_err(|e| GrovedocError::internal(format!("failed to write output: {}", e)))
}

// ============================================================================
// Tests
// ============================================================================
