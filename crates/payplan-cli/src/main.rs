mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::projection::{ProjectArgs, ScheduleArgs};
use commands::timeline::{CalendarArgs, TimelineArgs};

/// Dividend and commission schedule projections for fixed-term contracts
#[derive(Parser)]
#[command(
    name = "payplan",
    version,
    about = "Dividend and commission schedule projections for fixed-term contracts",
    long_about = "A CLI for projecting the investor dividend schedule and the agent and \
                  leader commission schedules of a fixed-term contract with decimal \
                  precision. Terms come from flags, a JSON or YAML file, or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log schedule construction to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the full payment plan: summary plus all three schedules
    Project(ProjectArgs),
    /// Print a single party's schedule
    Schedule(ScheduleArgs),
    /// Party-tagged payment calendar, optionally within a date window
    Calendar(CalendarArgs),
    /// Contract progress, renewal window and dividends paid as of a date
    Timeline(TimelineArgs),
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

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Schedule(args) => commands::projection::run_schedule(args),
        Commands::Calendar(args) => commands::timeline::run_calendar(args),
        Commands::Timeline(args) => commands::timeline::run_timeline(args),
        Commands::Version => {
            println!("payplan {}", env!("CARGO_PKG_VERSION"));
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
