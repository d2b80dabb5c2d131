mod commands;
mod context;
mod output;
mod provider;
mod resolver;
mod store;
mod traits;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use commands::{LambdaCommand, MicroserviceCommand, NewCommand, RunOptions};
use context::Context;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter
const LOG_ENV: &str = "AWS_SCAFFOLD_LOG";

#[derive(Parser)]
#[command(name = "aws-scaffold")]
#[command(about = "Scaffold AWS microservice and lambda projects, remembering previous answers", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory holding the saved answers (defaults to current directory)
    #[arg(short, long, global = true, env = "AWS_SCAFFOLD_PATH")]
    path: Option<PathBuf>,

    /// AWS shared credentials file used to list profiles
    #[arg(long, global = true, env = "AWS_SHARED_CREDENTIALS_FILE")]
    credentials_file: Option<PathBuf>,

    /// Log resolution decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a project type, then configure it
    New,

    /// Configure a microservice project (project, author and AWS settings)
    Microservice {
        /// Keep saved answers instead of asking every question again
        #[arg(long)]
        reuse: bool,
    },

    /// Configure a lambda function inside an existing project
    Lambda,
}

/// Install the global subscriber. `AWS_SCAFFOLD_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.path {
        Some(path) => std::path::absolute(&path)
            .with_context(|| format!("Invalid project path: {:?}", path))?,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let options = RunOptions {
        project_dir,
        credentials_file: cli.credentials_file,
    };
    let ctx = Context::new();

    match cli.command {
        Commands::New => NewCommand::execute(&ctx, &options).await?,
        Commands::Microservice { reuse } => {
            MicroserviceCommand::execute(&ctx, &options, reuse).await?
        }
        Commands::Lambda => LambdaCommand::execute(&ctx, &options).await?,
    }

    Ok(())
}
