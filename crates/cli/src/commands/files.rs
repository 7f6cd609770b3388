use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;
use depot_client::DepotClient;
use depot_core::format_bytes;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Job id to store the archive under.
    pub job_id: String,
    /// Path to the archive file.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Job id of the archive.
    pub job_id: String,
    /// Keep the archive on the server even if auto-delete is configured.
    #[arg(long)]
    pub keep: bool,
    /// Where to write the archive (defaults to `<job_id>.zip`).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Job id to check.
    pub job_id: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Job id to delete.
    pub job_id: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of records to show.
    #[arg(long, default_value_t = 100)]
    pub limit: usize,
    /// Number of records to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

pub async fn upload(
    client: &DepotClient,
    args: &UploadArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let data = std::fs::read(&args.file)?;
    let resp = client.upload(&args.job_id, Bytes::from(data)).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resp)?),
        OutputFormat::Text => println!(
            "Uploaded {} ({}) -> {}",
            resp.job_id,
            format_bytes(resp.size_bytes),
            resp.download_url
        ),
    }
    Ok(())
}

pub async fn download(client: &DepotClient, args: &DownloadArgs) -> anyhow::Result<()> {
    let data = client.download(&args.job_id, args.keep).await?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.zip", args.job_id)));

    std::fs::write(&output, &data)?;
    println!(
        "Downloaded {} ({}) -> {}",
        args.job_id,
        format_bytes(data.len() as u64),
        output.display()
    );
    if !args.keep {
        eprintln!("note: the server may now delete this archive (use --keep to prevent that)");
    }
    Ok(())
}

pub async fn check(
    client: &DepotClient,
    args: &CheckArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match client.check(&args.job_id).await {
        Ok(record) => {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Text => {
                    println!("Job:        {}", record.job_id);
                    println!("Size:       {}", format_bytes(record.size_bytes));
                    println!("Uploaded:   {}", record.uploaded_at);
                    match record.downloaded_at {
                        Some(at) => println!("Downloaded: {at}"),
                        None => println!("Downloaded: never"),
                    }
                }
            }
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            eprintln!("No retrievable archive for job {}", args.job_id);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    client: &DepotClient,
    args: &DeleteArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let resp = client.delete(&args.job_id).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resp)?),
        OutputFormat::Text => println!("Deleted {}", resp.job_id),
    }
    Ok(())
}

pub async fn list(
    client: &DepotClient,
    args: &ListArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let resp = client.list(args.limit, args.offset).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resp)?),
        OutputFormat::Text => {
            println!("{} archives:", resp.count);
            for record in &resp.files {
                let state = if record.deleted {
                    "deleted"
                } else if record.downloaded_at.is_some() {
                    "downloaded"
                } else {
                    "uploaded"
                };
                println!(
                    "  [{state:>10}] {} | {} | {}",
                    record.job_id,
                    format_bytes(record.size_bytes),
                    record.uploaded_at,
                );
            }
        }
    }
    Ok(())
}
