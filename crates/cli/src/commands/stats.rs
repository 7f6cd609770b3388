use depot_client::DepotClient;

use crate::OutputFormat;

pub async fn run(client: &DepotClient, format: &OutputFormat) -> anyhow::Result<()> {
    let stats = client.stats().await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            println!("Records:     {}", stats.total);
            println!("  active:    {}", stats.active);
            println!("  deleted:   {}", stats.deleted);
            println!("  downloaded:{}", stats.downloaded);
            println!("Stored:      {}", stats.total_size_human);
        }
    }
    Ok(())
}
