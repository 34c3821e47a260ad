mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analytic::AnalyticDistributionArgs;
use commands::depreciation::{ProrataArgs, RescaleArgs, ScheduleArgs, SplitArgs};

/// Fixed-asset depreciation schedules and invoice analytic distribution
#[derive(Parser)]
#[command(
    name = "fa",
    version,
    about = "Fixed-asset depreciation schedules with decimal precision",
    long_about = "A CLI for generating fiscal and economic depreciation schedules \
                  (linear or degressive, with prorata temporis), rescaling or splitting \
                  assets, and distributing invoice lines over analytic accounts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the fiscal and/or economic depreciation schedule of an asset
    Schedule(ScheduleArgs),
    /// Compute the first-period prorata temporis factor of a schedule
    Prorata(ProrataArgs),
    /// Rescale an asset's value and planned lines by a ratio
    Rescale(RescaleArgs),
    /// Split an asset into retained and disposed parts
    Split(SplitArgs),
    /// Distribute an invoice line over analytic accounts
    AnalyticDistribution(AnalyticDistributionArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::depreciation::run_schedule(args),
        Commands::Prorata(args) => commands::depreciation::run_prorata(args),
        Commands::Rescale(args) => commands::depreciation::run_rescale(args),
        Commands::Split(args) => commands::depreciation::run_split(args),
        Commands::AnalyticDistribution(args) => commands::analytic::run_distribution(args),
        Commands::Version => {
            println!("fa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
