// ut-helper-core/src/lib.rs

// declare modules
pub mod api;
pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod output;
pub mod records;
pub mod session;
pub mod source_file;
pub mod status;
pub mod validation;

// re-export key structs/functions for external use by other crates
pub use anyhow::{Context, Result}; // re-export for convenience
pub use clap::Parser; // re-export Parser for CLI crate
pub use console::style; // re-export for the CLI crate's own printing
pub use dotenv::dotenv;

pub use crate::api::{Backend, GeneratedArtifact, HttpBackend, ServiceInfo};
pub use crate::config::Config;
pub use crate::controller::{Action, WorkflowController};
pub use crate::error::{WorkflowError, WorkflowResult};
pub use crate::records::{PatternRecord, SourceRecord};
pub use crate::status::{Status, StatusKind};

use clap::{Args, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// argument parsing struct - shared by the CLI crate and anything else embedding the flow
#[derive(Parser, Debug, Clone)]
#[command(name = "ut-helper")]
#[command(version)]
#[command(about = "pattern-based unit test generator for go projects", long_about = None)]
pub struct CoreCliArgs {
    /// path to a toml config file (defaults to $UT_HELPER_CONFIG if set)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// backend base address, overrides config and environment
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// run one step non-interactively instead of starting the session menu
    #[command(subcommand)]
    pub command: Option<CoreCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CoreCommand {
    /// upload a pattern and a source file, then generate tests in one go
    Generate(GenerateArgs),
    /// check that the backend is reachable and print what it reports
    Ping,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// file holding the pattern content
    #[arg(short, long)]
    pub pattern: PathBuf,

    /// pattern name (defaults to the pattern file's stem)
    #[arg(short = 'n', long)]
    pub pattern_name: Option<String>,

    /// optional pattern description
    #[arg(short, long)]
    pub description: Option<String>,

    /// go source file to generate tests for
    #[arg(short, long)]
    pub source: PathBuf,

    /// optional package name of the source file
    #[arg(long)]
    pub package: Option<String>,

    /// extra instructions passed to the generator
    #[arg(long)]
    pub context: Option<String>,

    /// write the generated tests here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// resolve configuration the way every entry point does: file, env, then flags
pub fn resolve_config(args: &CoreCliArgs) -> Result<Config> {
    dotenv().ok();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(api_base) = &args.api_base {
        config = config.with_api_base(api_base.clone());
    }
    Ok(config)
}

/// run whichever flow the arguments ask for
pub async fn execute_ut_helper_flow(args: CoreCliArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let backend = HttpBackend::new(&config)?;
    tracing::debug!(api_base = backend.base(), "backend configured");

    match args.command {
        None => session::run_interactive(WorkflowController::new(backend, &config)).await,
        Some(CoreCommand::Ping) => ping(&backend).await,
        Some(CoreCommand::Generate(generate)) => {
            let controller = WorkflowController::new(backend, &config);
            run_generate(&controller, &generate).await
        }
    }
}

async fn ping(backend: &HttpBackend) -> Result<()> {
    let spinner = session::spinner(format!("contacting {}...", backend.base()));
    let info = backend.service_info().await;
    spinner.finish_and_clear();

    let info = info.with_context(|| format!("backend at {} is not reachable", backend.base()))?;
    let state = if info.ok {
        style("ok").green().bold()
    } else {
        style("not ok").red().bold()
    };
    println!("{} {}", style("backend:").cyan().bold(), state);
    if let Some(service) = &info.service {
        println!("  └─ service: {service}");
    }
    if let Some(version) = &info.version {
        println!("  └─ version: {version}");
    }
    if let Some(model) = &info.model {
        println!("  └─ model: {model}");
    }
    if let Some(description) = &info.description {
        println!("  └─ {}", style(description).dim());
    }
    Ok(())
}

/// the three workflow steps in order, stopping at the first failure.
/// only the generated tests go to stdout so the output can be redirected into a file
pub async fn run_generate<B: Backend>(
    controller: &WorkflowController<B>,
    args: &GenerateArgs,
) -> Result<()> {
    run_generate_to(controller, args, &mut io::stdout(), &mut io::stderr()).await
}

/// `run_generate` with the artifact written to `out` and status lines to `log`
pub async fn run_generate_to<B, O, E>(
    controller: &WorkflowController<B>,
    args: &GenerateArgs,
    out: &mut O,
    log: &mut E,
) -> Result<()>
where
    B: Backend,
    O: Write,
    E: Write,
{
    let pattern_file = source_file::read_text_file(&args.pattern)?;
    let pattern_name = args
        .pattern_name
        .clone()
        .unwrap_or_else(|| file_stem(&args.pattern));
    let source = source_file::read_text_file(&args.source)?;

    let spinner = session::spinner("uploading pattern...");
    let pattern = controller
        .submit_pattern(&pattern_name, &pattern_file.content, args.description.as_deref())
        .await;
    spinner.finish_and_clear();
    write_current_status(controller, log)?;
    pattern.context("pattern upload failed")?;

    let spinner = session::spinner("uploading source file...");
    let uploaded = controller
        .submit_source_code(&source.file_name, &source.content, args.package.as_deref())
        .await;
    spinner.finish_and_clear();
    write_current_status(controller, log)?;
    uploaded.context("source upload failed")?;

    let spinner = session::spinner(format!("generating unit tests with pattern '{pattern_name}'..."));
    let artifact = controller.generate_artifact(args.context.as_deref()).await;
    spinner.finish_and_clear();
    write_current_status(controller, log)?;
    let artifact = artifact.context("generation failed")?;

    match &args.output {
        Some(path) => {
            write_output(path, &artifact.unit_tests)?;
            writeln!(
                log,
                "{} {}",
                style("✅ tests written to").green().bold(),
                style(path.display()).yellow()
            )?;
        }
        None => writeln!(out, "{}", artifact.unit_tests)?,
    }
    out.flush()?;
    Ok(())
}

fn write_current_status<B, E: Write>(controller: &WorkflowController<B>, log: &mut E) -> Result<()> {
    if let Some(status) = controller.status().current() {
        writeln!(log, "{}", session::status_line(&status))?;
    }
    Ok(())
}

pub(crate) fn write_output(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pattern".to_string())
}
