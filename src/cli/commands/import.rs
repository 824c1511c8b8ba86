//! Import commands for the tariff importer CLI
//!
//! `import` reads one file for an explicit country code. `import-dir` imports
//! every `*.csv` of a directory, deriving each country code from the file
//! name, and keeps going when a file fails.

use super::shared::{CommandStats, Services, create_progress_bar, print_json};
use crate::app::services::importer::{ImportReport, TariffImporter};
use crate::cli::args::{ImportArgs, ImportDirArgs, OutputFormat};
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::HumanDuration;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Import command runner
pub async fn run_import(args: ImportArgs, config: Config) -> Result<CommandStats> {
    let start_time = Instant::now();
    let uploaded_by = args
        .uploaded_by
        .clone()
        .unwrap_or_else(|| config.import.uploaded_by.clone());

    let csv = read_document(&args.file).await?;
    let services = Services::open(config).await?;
    let importer = services.importer();

    let report = if args.dry_run {
        importer.preview(&args.country, &csv).await?
    } else {
        let report = importer.import(&args.country, &csv, &uploaded_by).await?;
        services.persist().await?;
        report
    };

    match args.output_format {
        OutputFormat::Human => print_report(&report),
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(CommandStats {
        files_processed: 1,
        files_failed: 0,
        tariffs_saved: report.tariffs_saved,
        processing_time: start_time.elapsed(),
    })
}

/// Import-dir command runner
pub async fn run_import_dir(
    args: ImportDirArgs,
    config: Config,
    show_progress: bool,
) -> Result<CommandStats> {
    let start_time = Instant::now();
    args.validate()?;

    let uploaded_by = args
        .uploaded_by
        .clone()
        .unwrap_or_else(|| config.import.uploaded_by.clone());
    let files = discover_csv_files(&args.dir)?;
    info!("Found {} CSV files in {}", files.len(), args.dir.display());

    let services = Services::open(config).await?;
    let importer = services.importer();
    let mut stats = CommandStats::default();

    let progress = create_progress_bar(files.len() as u64, "Importing tariff files");
    if !show_progress {
        progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    for file in &files {
        let Some(country_code) = country_code_for(file) else {
            error!("Cannot derive a country code from {}", file.display());
            stats.files_failed += 1;
            progress.inc(1);
            continue;
        };
        progress.set_message(country_code.clone());

        let outcome = import_file(
            &services,
            &importer,
            file,
            &country_code,
            &uploaded_by,
            args.dry_run,
        )
        .await;

        match outcome {
            Ok(report) => {
                debug!("{}: {} tariffs", country_code, report.tariffs_saved);
                stats.files_processed += 1;
                stats.tariffs_saved += report.tariffs_saved;
            }
            Err(e) if e.is_input_error() => {
                warn!("Skipping {}: {}", file.display(), e);
                stats.files_failed += 1;
            }
            Err(e) => {
                error!("Failed to import {}: {}", file.display(), e);
                stats.files_failed += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    stats.processing_time = start_time.elapsed();
    print_dir_summary(&stats, args.dry_run);
    Ok(stats)
}

/// Import one file of a directory run
///
/// The repository snapshot is written after every successful import.
pub async fn import_file(
    services: &Services,
    importer: &TariffImporter,
    file: &Path,
    country_code: &str,
    uploaded_by: &str,
    dry_run: bool,
) -> Result<ImportReport> {
    let csv = read_document(file).await?;
    if dry_run {
        return importer.preview(country_code, &csv).await;
    }

    let report = importer.import(country_code, &csv, uploaded_by).await?;
    services.persist().await?;
    Ok(report)
}

/// `*.csv` files directly inside a directory, in name order
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.csv");
    let pattern = pattern.to_string_lossy();

    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| Error::configuration(format!("Invalid file pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Country code of a file: its upper-cased stem
pub fn country_code_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(|stem| stem.to_uppercase())
}

async fn read_document(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))
}

fn print_report(report: &ImportReport) {
    let title = if report.dry_run {
        "Dry run complete (nothing stored)"
    } else {
        "Import complete"
    };
    println!("\n{}", title.bright_green().bold());
    println!("   • Country: {}", report.country_code.bright_white().bold());
    println!("   • Rate scheme: {}", report.scheme);
    println!(
        "   • Tariffs {}: {}",
        if report.dry_run { "translated" } else { "saved" },
        report.tariffs_saved.to_string().bright_white().bold()
    );
    println!(
        "   • Rates extracted: {} ({} from alternate columns)",
        report.rates_extracted, report.alternate_rates
    );
    println!(
        "   • Tariffs {}: {}",
        if report.dry_run { "that would be replaced" } else { "replaced" },
        report.tariffs_replaced
    );
    if let Some(key) = &report.blob_key {
        println!("   • Archived as: {}", key);
    }
    println!();
}

fn print_dir_summary(stats: &CommandStats, dry_run: bool) {
    println!("\n{}", "Import Summary".bright_green().bold());
    println!(
        "   • Files imported: {}",
        stats.files_processed.to_string().bright_white().bold()
    );
    if stats.has_failures() {
        println!(
            "   • Files failed: {}",
            stats.files_failed.to_string().bright_red().bold()
        );
    }
    println!(
        "   • Tariffs {}: {}",
        if dry_run { "translated" } else { "saved" },
        stats.tariffs_saved
    );
    println!(
        "   • Processing time: {}",
        HumanDuration(stats.processing_time)
    );
    println!();
}
