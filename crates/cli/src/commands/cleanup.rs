use depot_client::DepotClient;

use crate::OutputFormat;

pub async fn run(client: &DepotClient, format: &OutputFormat) -> anyhow::Result<()> {
    let report = client.cleanup().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => match report.status {
            depot_core::CleanupStatus::Skipped => {
                println!("Cleanup is disabled; nothing swept.");
            }
            depot_core::CleanupStatus::Completed => {
                println!(
                    "Sweep complete: {} archive(s) removed ({}h retention).",
                    report.deleted_count, report.max_age_hours
                );
            }
        },
    }
    Ok(())
}
