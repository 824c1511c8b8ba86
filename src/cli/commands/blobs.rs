//! Blob archive inspection commands

use super::shared::{CommandStats, Services, format_size, print_json, write_output};
use crate::Result;
use crate::app::models::BlobMetadata;
use crate::app::services::blob_storage::BlobStorage;
use crate::cli::args::{BlobCommands, BlobsArgs, OutputFormat};
use crate::config::Config;
use colored::*;
use std::time::Instant;
use tracing::info;

pub async fn run_blobs(args: BlobsArgs, config: Config) -> Result<CommandStats> {
    let start_time = Instant::now();
    let services = Services::open(config).await?;
    let storage = services.blob_storage();

    match args.command {
        BlobCommands::List(list) => {
            let blobs = storage.list(&list.prefix).await?;
            match list.output_format {
                OutputFormat::Human => print_blob_list(&list.prefix, &blobs),
                OutputFormat::Json => print_json(&blobs)?,
            }
        }
        BlobCommands::Fetch(fetch) => {
            let content = storage.fetch(&fetch.key).await?;
            write_output(&content, fetch.output.as_deref())?;
        }
        BlobCommands::Latest(latest) => {
            let (metadata, content) = storage.fetch_latest(&latest.prefix).await?;
            info!("Latest upload under '{}' is {}", latest.prefix, metadata.key);
            write_output(&content, latest.output.as_deref())?;
        }
    }

    Ok(CommandStats {
        processing_time: start_time.elapsed(),
        ..CommandStats::default()
    })
}

fn print_blob_list(prefix: &str, blobs: &[BlobMetadata]) {
    let title = if prefix.is_empty() {
        "Archived blobs".to_string()
    } else {
        format!("Archived blobs under {}", prefix)
    };
    println!("\n{}", title.bright_green().bold());

    if blobs.is_empty() {
        println!("   None");
    }
    for blob in blobs {
        let marker = if blob.latest_upload {
            " latest".bright_yellow().bold().to_string()
        } else {
            String::new()
        };
        println!(
            "   {}{}\n      {} by {} ({}, {})",
            blob.key.bright_white().bold(),
            marker,
            blob.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
            blob.uploaded_by.as_deref().unwrap_or("unknown"),
            blob.content_type,
            format_size(blob.size)
        );
    }
    println!();
}
