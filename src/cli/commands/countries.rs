//! Country catalogue listing

use super::shared::{CommandStats, Services, print_json};
use crate::Result;
use crate::app::models::CountryList;
use crate::app::services::blob_storage::load_countries;
use crate::app::services::tariff_repository::TariffRepository;
use crate::cli::args::{CountriesArgs, OutputFormat};
use crate::config::Config;
use colored::*;
use std::time::Instant;

pub async fn run_countries(args: CountriesArgs, config: Config) -> Result<CommandStats> {
    let start_time = Instant::now();
    let services = Services::open(config).await?;
    let countries = load_countries(services.blob_storage()).await?;

    match args.output_format {
        OutputFormat::Json => print_json(&CountryList { countries })?,
        OutputFormat::Human => {
            println!("\n{}", "Countries".bright_green().bold());
            for country in &countries {
                let tariffs = services.repository.count_by_country_code(&country.code).await?;
                println!(
                    "   {:<12} {:<28} {} tariffs",
                    country.code.bright_white().bold(),
                    country.name.as_deref().unwrap_or(""),
                    tariffs
                );
            }
            println!();
        }
    }

    Ok(CommandStats {
        processing_time: start_time.elapsed(),
        ..CommandStats::default()
    })
}
