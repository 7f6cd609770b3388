//! Depot CLI
//!
//! A command-line interface for the Depot archive storage service.

mod commands;

use clap::{Parser, Subcommand};
use depot_client::{DepotClient, DepotClientBuilder};
use tracing_subscriber::{EnvFilter, fmt};

/// Depot CLI — interact with a Depot storage server.
#[derive(Parser, Debug)]
#[command(name = "depot", version, about)]
struct Cli {
    /// Depot server endpoint URL.
    #[arg(
        long,
        env = "DEPOT_ENDPOINT",
        default_value = "http://localhost:8080",
        global = true
    )]
    endpoint: String,

    /// API key for authentication.
    #[arg(long, env = "DEPOT_API_KEY", global = true)]
    api_key: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check server health.
    Health,
    /// Upload an archive from a file.
    Upload(commands::files::UploadArgs),
    /// Download an archive.
    Download(commands::files::DownloadArgs),
    /// Check that an archive is retrievable.
    Check(commands::files::CheckArgs),
    /// Delete an archive now.
    Delete(commands::files::DeleteArgs),
    /// List stored archives.
    List(commands::files::ListArgs),
    /// Trigger a cleanup sweep.
    Cleanup,
    /// Show or change cleanup settings.
    Settings(commands::settings::SettingsArgs),
    /// Show storage statistics.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = DepotClientBuilder::new(&cli.endpoint);
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    let client: DepotClient = builder.build()?;

    match cli.command {
        Command::Health => commands::health::run(&client).await,
        Command::Upload(args) => commands::files::upload(&client, &args, &cli.format).await,
        Command::Download(args) => commands::files::download(&client, &args).await,
        Command::Check(args) => commands::files::check(&client, &args, &cli.format).await,
        Command::Delete(args) => commands::files::delete(&client, &args, &cli.format).await,
        Command::List(args) => commands::files::list(&client, &args, &cli.format).await,
        Command::Cleanup => commands::cleanup::run(&client, &cli.format).await,
        Command::Settings(args) => commands::settings::run(&client, &args, &cli.format).await,
        Command::Stats => commands::stats::run(&client, &cli.format).await,
    }
}
