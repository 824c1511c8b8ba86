//! Command implementations for the tariff importer CLI
//!
//! Each command is implemented in its own module. The runner sets up logging,
//! loads the layered configuration and dispatches to the handler.

pub mod blobs;
pub mod countries;
pub mod import;
pub mod init;
pub mod shared;
pub mod tariffs;

pub use shared::CommandStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};
use tracing::debug;

/// Main command runner for the tariff importer
///
/// Returns the statistics of the command; the caller decides the exit status
/// from [`CommandStats::has_failures`].
pub async fn run(args: Args) -> Result<CommandStats> {
    shared::setup_logging(&args);

    let config = shared::load_configuration(&args)?;
    debug!("Configuration: {:?}", config);

    let Some(command) = args.command.clone() else {
        return Err(Error::configuration("No command given"));
    };

    match command {
        Commands::Init => init::run_init(config).await,
        Commands::Import(import_args) => import::run_import(import_args, config).await,
        Commands::ImportDir(dir_args) => {
            import::run_import_dir(dir_args, config, args.show_progress()).await
        }
        Commands::Tariffs(tariffs_args) => tariffs::run_tariffs(tariffs_args, config).await,
        Commands::StagingBaskets(baskets_args) => {
            tariffs::run_staging_baskets(baskets_args, config).await
        }
        Commands::Countries(countries_args) => {
            countries::run_countries(countries_args, config).await
        }
        Commands::Blobs(blobs_args) => blobs::run_blobs(blobs_args, config).await,
    }
}
