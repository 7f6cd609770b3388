use clap::{Args, Subcommand};
use depot_client::{DepotClient, SettingsResponse, UpdateSettingsRequest};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show the current cleanup settings.
    Get,
    /// Change cleanup settings.
    Set {
        /// Enable or disable cleanup sweeps.
        #[arg(long)]
        cleanup_enabled: Option<bool>,
        /// Retention horizon in hours (must be positive).
        #[arg(long)]
        cleanup_max_age_hours: Option<u32>,
    },
}

fn print_settings(settings: &SettingsResponse, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
        OutputFormat::Text => {
            let enabled = if settings.cleanup_enabled { "ON" } else { "OFF" };
            println!("Cleanup:       {enabled}");
            println!("Max age:       {}h", settings.cleanup_max_age_hours);
            match settings.cleanup_last_run {
                Some(at) => println!("Last sweep:    {at}"),
                None => println!("Last sweep:    never"),
            }
        }
    }
    Ok(())
}

pub async fn run(
    client: &DepotClient,
    args: &SettingsArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match &args.command {
        SettingsCommand::Get => {
            let settings = client.settings().await?;
            print_settings(&settings, format)
        }
        SettingsCommand::Set {
            cleanup_enabled,
            cleanup_max_age_hours,
        } => {
            let update = UpdateSettingsRequest {
                cleanup_enabled: *cleanup_enabled,
                cleanup_max_age_hours: *cleanup_max_age_hours,
            };
            let settings = client.update_settings(&update).await?;
            print_settings(&settings, format)
        }
    }
}
