mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    derive, init, migrate, publish, show, templates, DeriveArgs, InitArgs, MigrateArgs,
    PublishArgs, ShowArgs,
};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Funnel CLI - build, migrate and publish step funnels
#[derive(Parser, Debug)]
#[command(name = "funnel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a funnel draft with one page
    Init(InitArgs),

    /// List the page templates
    Templates,

    /// Convert legacy steps into a tree document
    Migrate(MigrateArgs),

    /// Project a tree document onto legacy steps
    Derive(DeriveArgs),

    /// Publish a funnel's draft
    Publish(PublishArgs),

    /// Show a funnel's status and pages
    Show(ShowArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        cwd = %cwd.display(),
        storage_dir = %config.storage_dir,
        "Loaded configuration"
    );

    match cli.command {
        Command::Init(args) => init(args, &cwd, &config).await,
        Command::Templates => templates(),
        Command::Migrate(args) => migrate(args, &cwd, &config).await,
        Command::Derive(args) => derive(args),
        Command::Publish(args) => publish(args, &cwd, &config).await,
        Command::Show(args) => show(args, &cwd, &config).await,
    }
}
