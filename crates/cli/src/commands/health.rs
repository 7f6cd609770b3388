use depot_client::DepotClient;

pub async fn run(client: &DepotClient) -> anyhow::Result<()> {
    match client.health().await {
        Ok(health) => {
            println!("{} is healthy ({})", health.service, health.timestamp);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to reach server: {e}");
            std::process::exit(1);
        }
    }
}
