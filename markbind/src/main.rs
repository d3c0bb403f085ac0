//! Command-line front end for markbind.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use markbind::codegen::GenerationShape;
use markbind::settings::DEFAULT_SETTINGS_FILE;
use markbind::{JsonSettingsStore, Orchestrator, Outcome};

#[derive(Debug, clap::Parser)]
#[clap(name = "markbind", version, about = "Typed C# bindings for UXML documents")]
struct Cli {
    /// Project root that asset paths are relative to.
    #[clap(short, long, default_value = ".")]
    project: PathBuf,
    /// Settings file; defaults to ProjectSettings/MarkbindSettings.json under the project.
    #[clap(short, long)]
    settings: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Register an asset for binding generation.
    Enable {
        path: String,
        #[clap(long)]
        shape: Option<GenerationShape>,
        #[clap(long)]
        namespace: Option<String>,
        #[clap(long)]
        output_directory: Option<String>,
    },
    /// Unregister an asset.
    Disable { path: String },
    /// Regenerate bindings for the given assets, or every asset with --all.
    GenerateBindings {
        #[clap(long, conflicts_with = "paths")]
        all: bool,
        paths: Vec<String>,
    },
    /// Scaffold the script companion of an asset if it is missing.
    GenerateScript { path: String },
    /// Delete the generated bindings of an asset.
    ClearBindings { path: String },
    /// Delete every generated bindings file.
    ClearAllBindings,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings_path = cli
        .settings
        .unwrap_or_else(|| cli.project.join(DEFAULT_SETTINGS_FILE));
    let store = JsonSettingsStore::open(&settings_path)
        .with_context(|| format!("opening settings {}", settings_path.display()))?;
    let mut orchestrator = Orchestrator::builder(store).project_root(cli.project).build();

    match cli.command {
        Command::Enable {
            path,
            shape,
            namespace,
            output_directory,
        } => {
            orchestrator.enable(&path)?;
            orchestrator.update(&path, |setting| {
                if let Some(shape) = shape {
                    setting.generation_shape = shape;
                }
                if let Some(namespace) = namespace {
                    setting.namespace = namespace;
                }
                if let Some(output_directory) = output_directory {
                    setting.output_directory = output_directory;
                }
            })?;
        }
        Command::Disable { path } => {
            if orchestrator.disable(&path)?.is_none() {
                tracing::warn!("{} was not enabled", path);
            }
        }
        Command::GenerateBindings { all: true, .. } => {
            let report = orchestrator.generate_all()?;
            if !report.is_success() {
                bail!("{} assets failed to generate", report.failed.len());
            }
        }
        Command::GenerateBindings { all: false, paths } => {
            if paths.is_empty() {
                bail!("no asset given; pass one or more paths or --all");
            }
            let mut failed = 0;
            for path in &paths {
                if let Err(e) = orchestrator.generate_bindings(path) {
                    tracing::error!("Failed to generate bindings for {}: {}", path, e);
                    failed += 1;
                }
            }
            if failed > 0 {
                bail!("{} assets failed to generate", failed);
            }
        }
        Command::GenerateScript { path } => {
            let report = orchestrator.generate_script(&path)?;
            if report.outcome == Outcome::Skipped {
                println!("{} already exists", report.output_path.display());
            } else {
                println!("{}", report.output_path.display());
            }
        }
        Command::ClearBindings { path } => {
            if let Some(removed) = orchestrator.clear_bindings(&path)? {
                println!("{}", removed.display());
            }
        }
        Command::ClearAllBindings => {
            let report = orchestrator.clear_all_bindings()?;
            for removed in &report.removed {
                println!("{}", removed.display());
            }
            if !report.failures.is_empty() {
                bail!("{} files could not be deleted", report.failures.len());
            }
        }
    }
    Ok(())
}
