//! Init command: prepare blob storage and the repository snapshot

use super::shared::{CommandStats, Services};
use crate::Result;
use crate::app::services::blob_storage::BlobStorage;
use crate::config::Config;
use colored::*;
use std::time::Instant;
use tracing::info;

pub async fn run_init(config: Config) -> Result<CommandStats> {
    let start_time = Instant::now();
    let snapshot_path = config.snapshot_path();
    let snapshot_existed = snapshot_path.exists();

    let services = Services::open(config).await?;
    if !snapshot_existed {
        services.persist().await?;
        info!("Created empty repository snapshot at {}", snapshot_path.display());
    }

    let blobs = services.blob_storage().list("").await?.len();

    println!("{}", "Tariff importer initialized".bright_green().bold());
    println!(
        "   • Blob container: {}",
        services.storage.root().display().to_string().bright_white()
    );
    println!(
        "   • Repository snapshot: {}",
        snapshot_path.display().to_string().bright_white()
    );
    println!("   • Blobs stored: {}", blobs);

    Ok(CommandStats {
        processing_time: start_time.elapsed(),
        ..CommandStats::default()
    })
}
