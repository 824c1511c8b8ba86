use clap::Parser;
use std::process;
use tariff_importer::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(tariff_importer::Error::processing_interrupted(
                    "Interrupted by user",
                ))
            }
        }
    });

    match result {
        Ok(stats) if stats.has_failures() => {
            eprintln!("Error: {} file(s) failed to import", stats.files_failed);
            process::exit(1);
        }
        Ok(_stats) => {
            // Success - results have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Tariff Importer - Tariff Schedule Publishing Tool");
    println!("=================================================");
    println!();
    println!("Import tariff schedules from CSV exports, query them by country and");
    println!("staging basket, and archive every source file in blob storage.");
    println!();
    println!("USAGE:");
    println!("    tariff-importer [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    init               Create the blob container and repository snapshot");
    println!("    import             Import one country's tariff CSV");
    println!("    import-dir         Import every <COUNTRY>.csv in a directory");
    println!("    tariffs            List a country's tariffs page by page");
    println!("    staging-baskets    List the staging baskets of a country");
    println!("    countries          List the country catalogue");
    println!("    blobs              List and download archived source files");
    println!("    help               Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>    Configuration file (TOML)");
    println!("    -v, --verbose          Increase logging verbosity");
    println!("    -q, --quiet            Only log warnings and errors");
    println!("    -h, --help             Show help information");
    println!("    -V, --version          Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Import a calendar-year schedule:");
    println!("    tariff-importer import --country CHINA --file china.csv");
    println!();
    println!("    # Import a relative-year schedule and print the report as JSON:");
    println!("    tariff-importer import --country USMCA-MX --file mexico.csv --format json");
    println!();
    println!("    # Show the second page of one staging basket:");
    println!("    tariff-importer tariffs --country KOREA --staging-basket-id 4 --page 1");
    println!();
    println!("    # Download the most recent upload for a country:");
    println!("    tariff-importer blobs latest --prefix CHINA/ --output china.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    tariff-importer <COMMAND> --help");
}
