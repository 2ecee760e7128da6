//! pyuml CLI entry point

use clap::{Parser, Subcommand};
use pyuml::commands;
use pyuml::config::{AppConfig, SourceKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pyuml")]
#[command(about = "PlantUML class diagrams from Python source", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./pyuml.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a diagram for every Python file under the given paths
    Generate {
        /// Python files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Where .puml files are written
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Save the .puml files without invoking the renderer
        #[arg(long)]
        no_render: bool,

        /// Only print the diagrams, write nothing
        #[arg(long)]
        stdout: bool,

        /// Override the configured diagram source
        #[arg(short, long, value_enum)]
        source: Option<SourceKind>,

        /// Files processed at once
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Print the extracted class models of one file as JSON
    Models {
        file: PathBuf,
    },
    /// Run the configured renderer on an existing .puml file
    Render {
        file: PathBuf,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "pyuml={0},pyuml_core={0},pyuml_indexer={0},pyuml_ai={0}",
            log_level
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env loaded: {}", e);
    }

    let mut config = AppConfig::discover(cli.config.as_deref())?;
    if let Some(path) = config.config_file_path() {
        tracing::debug!("Loaded config from {}", path.display());
    }

    match cli.command {
        Commands::Generate {
            paths,
            output_dir,
            no_render,
            stdout,
            source,
            jobs,
        } => {
            if let Some(source) = source {
                config.source = source;
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(jobs) = jobs {
                config.concurrency = jobs;
            }
            if no_render {
                config.render.enabled = false;
            }
            commands::generate(paths, config, stdout).await
        }
        Commands::Models { file } => commands::models(&file),
        Commands::Render { file } => commands::render(&file, &config).await,
        Commands::Version => {
            println!("pyuml v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
