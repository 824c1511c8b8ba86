//! Tariff and staging basket queries for the CLI

use super::shared::{CommandStats, Services, print_json};
use crate::Result;
use crate::app::models::{Page, StagingBasket, Tariff};
use crate::cli::args::{OutputFormat, StagingBasketsArgs, TariffsArgs};
use crate::config::Config;
use crate::constants::ALL_STAGING_BASKETS;
use colored::*;
use std::time::Instant;

pub async fn run_tariffs(args: TariffsArgs, config: Config) -> Result<CommandStats> {
    let start_time = Instant::now();
    let services = Services::open(config).await?;
    let query = services.query();

    let request = query.page_request(args.page, args.size)?;
    let page = query
        .tariffs(&args.country, args.staging_basket_id, request)
        .await?;

    match args.output_format {
        OutputFormat::Human => print_tariff_page(&args, &page),
        OutputFormat::Json => print_json(&page)?,
    }

    Ok(CommandStats {
        processing_time: start_time.elapsed(),
        ..CommandStats::default()
    })
}

pub async fn run_staging_baskets(args: StagingBasketsArgs, config: Config) -> Result<CommandStats> {
    let start_time = Instant::now();
    let services = Services::open(config).await?;
    let baskets = services.query().staging_baskets(&args.country).await?;

    match args.output_format {
        OutputFormat::Human => print_staging_baskets(&args.country, &baskets),
        OutputFormat::Json => print_json(&baskets)?,
    }

    Ok(CommandStats {
        processing_time: start_time.elapsed(),
        ..CommandStats::default()
    })
}

fn print_tariff_page(args: &TariffsArgs, page: &Page<Tariff>) {
    let filter = if args.staging_basket_id == ALL_STAGING_BASKETS {
        "all staging baskets".to_string()
    } else {
        format!("staging basket {}", args.staging_basket_id)
    };
    println!(
        "\n{} ({})",
        format!("Tariffs for {}", args.country).bright_green().bold(),
        filter
    );

    if page.content.is_empty() {
        println!("   No tariffs on this page");
    }
    for tariff in &page.content {
        let rates: Vec<String> = tariff
            .rates
            .iter()
            .map(|rate| format!("{}={}", rate.year, rate.value))
            .collect();
        println!(
            "   {} {} {}",
            tariff.legacy_id.to_string().bright_white().bold(),
            tariff.tariff_line.as_deref().unwrap_or("-"),
            tariff.description.as_deref().unwrap_or("")
        );
        if !rates.is_empty() {
            println!("      rates: {}", rates.join(", "));
        }
    }

    println!(
        "\n   Page {} of {} ({} tariffs)\n",
        page.ordinal(),
        page.total_pages.max(1),
        page.total_elements
    );
}

fn print_staging_baskets(country: &str, baskets: &[StagingBasket]) {
    println!(
        "\n{}",
        format!("Staging baskets for {}", country).bright_green().bold()
    );
    if baskets.is_empty() {
        println!("   None");
    }
    for basket in baskets {
        println!(
            "   {:>4}  {}",
            basket.id.to_string().bright_white().bold(),
            basket.name.as_deref().unwrap_or("")
        );
    }
    println!();
}
