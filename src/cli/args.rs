//! Command-line argument definitions for the tariff importer
//!
//! This module defines the complete CLI interface using the clap derive API.
//! Global options (`--config`, `-v`, `-q`) are accepted before or after the
//! subcommand.

use crate::constants::ALL_STAGING_BASKETS;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tariff importer
///
/// Imports government tariff schedules from CSV exports, serves them as
/// paginated queries and archives the source files in blob storage.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tariff-importer",
    version,
    about = "Import tariff schedules from CSV and query them by country and staging basket",
    long_about = "Translates tariff CSV exports into tariff records with per-year rates, replaces \
                  a country's tariffs in the local repository and archives every source file in \
                  blob storage with upload metadata. Countries whose code contains USMCA use \
                  relative-year rate columns (YEAR1..YEAR30); all others use calendar-year \
                  columns (Y2004..Y2041)."
)]
pub struct Args {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config_dir>/tariff-importer/config.toml. Environment variables
    /// prefixed with TARIFF_ override file values.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only warnings and errors are logged, and progress bars are hidden.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Only log warnings and errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the tariff importer
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create the blob container and an empty tariff repository
    Init,
    /// Import one country's tariff CSV
    Import(ImportArgs),
    /// Import every CSV file in a directory, one country per file
    ImportDir(ImportDirArgs),
    /// List a country's tariffs page by page
    Tariffs(TariffsArgs),
    /// List the staging baskets used by a country's tariffs
    StagingBaskets(StagingBasketsArgs),
    /// List the countries in the catalogue
    Countries(CountriesArgs),
    /// Inspect archived source files
    Blobs(BlobsArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// Country or agreement code the file belongs to
    ///
    /// Codes containing USMCA select relative-year rate extraction.
    #[arg(long = "country", value_name = "CODE", help = "Country code (e.g. CHINA, USMCA-MX)")]
    pub country: String,

    #[arg(
        short = 'f',
        long = "file",
        value_name = "PATH",
        help = "Tariff CSV file to import"
    )]
    pub file: PathBuf,

    /// Identity recorded on the archived file
    ///
    /// Defaults to `import.uploaded_by` from the configuration.
    #[arg(long = "uploaded-by", value_name = "NAME", help = "Uploader recorded in blob metadata")]
    pub uploaded_by: Option<String>,

    /// Translate the file and report the result without storing anything
    #[arg(long = "dry-run", help = "Validate and summarize without storing anything")]
    pub dry_run: bool,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the import report"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the import-dir command
#[derive(Debug, Clone, Parser)]
pub struct ImportDirArgs {
    /// Directory containing `<COUNTRY>.csv` files
    ///
    /// The country code of each file is its upper-cased file stem, so
    /// `china.csv` is imported as CHINA.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "PATH",
        help = "Directory of tariff CSV files named after their country"
    )]
    pub dir: PathBuf,

    #[arg(long = "uploaded-by", value_name = "NAME", help = "Uploader recorded in blob metadata")]
    pub uploaded_by: Option<String>,

    #[arg(long = "dry-run", help = "Validate every file without storing anything")]
    pub dry_run: bool,
}

/// Arguments for the tariffs command
#[derive(Debug, Clone, Parser)]
pub struct TariffsArgs {
    #[arg(long = "country", value_name = "CODE", help = "Country code")]
    pub country: String,

    /// Staging basket to filter by; -1 lists every basket
    #[arg(
        long = "staging-basket-id",
        value_name = "ID",
        default_value_t = ALL_STAGING_BASKETS,
        allow_negative_numbers = true,
        help = "Staging basket id (-1 for all)"
    )]
    pub staging_basket_id: i64,

    #[arg(
        long = "page",
        value_name = "N",
        default_value_t = 0,
        help = "Zero-based page number"
    )]
    pub page: usize,

    /// Page size, clamped to `query.max_page_size`
    #[arg(long = "size", value_name = "N", help = "Tariffs per page")]
    pub size: Option<usize>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct StagingBasketsArgs {
    #[arg(long = "country", value_name = "CODE", help = "Country code")]
    pub country: String,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct CountriesArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the blobs command group
#[derive(Debug, Clone, Parser)]
pub struct BlobsArgs {
    #[command(subcommand)]
    pub command: BlobCommands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum BlobCommands {
    /// List archived blobs under a key prefix
    List(BlobListArgs),
    /// Download one blob by key
    Fetch(BlobFetchArgs),
    /// Download the most recent upload under a key prefix
    Latest(BlobLatestArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct BlobListArgs {
    /// Key prefix, usually `<COUNTRY>/`
    #[arg(long = "prefix", value_name = "PREFIX", default_value = "", help = "Key prefix")]
    pub prefix: String,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct BlobFetchArgs {
    #[arg(long = "key", value_name = "KEY", help = "Blob key")]
    pub key: String,

    /// If not specified, writes to stdout
    #[arg(short = 'o', long = "output", value_name = "FILE", help = "Output file")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct BlobLatestArgs {
    #[arg(long = "prefix", value_name = "PREFIX", default_value = "", help = "Key prefix")]
    pub prefix: String,

    #[arg(short = 'o', long = "output", value_name = "FILE", help = "Output file")]
    pub output: Option<PathBuf>,
}

/// Output format options for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

impl Args {
    /// Get log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ImportDirArgs {
    /// Validate the directory argument
    pub fn validate(&self) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(Error::configuration(format!(
                "Import directory does not exist: {}",
                self.dir.display()
            )));
        }
        Ok(())
    }
}
