//! Command-line entry point: load a ticket export, build one MIS report,
//! write it next to the other reports (or print it as JSON).

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;

use mis_report::clock::{Clock, FixedClock, SystemClock};
use mis_report::config::{load_config, AnalysisConfig};
use mis_report::error::AppError;
use mis_report::mis::{generate, ReportKind};
use mis_report::{export, parser};

/// Ticket MIS report generator
#[derive(Parser, Debug)]
#[clap(name = "mis-report")]
#[clap(about = "Build SLA and recurring-issue MIS reports from a ticket export")]
struct Args {
    /// Ticket export: CSV (delimiter detected) or a workbook (first sheet)
    #[clap(long, value_name = "FILE")]
    input: PathBuf,

    /// Report to build: open-ticket, open-ticket-detailed, client,
    /// request-open, request-closed, bug-closed, recurring-issues
    #[clap(long)]
    report: ReportKind,

    /// Output directory
    #[clap(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Pin the run date (YYYY-MM-DD) instead of the local date
    #[clap(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// JSON file overriding the recurring-issue heuristics
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the report structure as JSON instead of writing a file
    #[clap(long)]
    json: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose > 0 {
        let level = match verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        builder.filter_level(level);
    }
    builder.init();
}

fn run(args: &Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AnalysisConfig::default(),
    };

    let clock: Box<dyn Clock> = match args.today {
        Some(day) => Box::new(FixedClock(day)),
        None => Box::new(SystemClock),
    };
    let today = clock.today();

    let input = args.input.to_string_lossy();
    let parsed = parser::parse_file(&input, |processed, accepted| {
        log::debug!("{} rows read, {} kept", processed, accepted);
    })?;
    for warning in &parsed.warnings {
        log::warn!("line {}: {}", warning.line, warning.message);
    }

    let output = generate(args.report, &parsed.dataset, clock.as_ref(), &config);
    if let Some(table) = output.single_table().filter(|t| t.is_notice()) {
        if let Some(notice) = table.rows[0].cells.first() {
            log::warn!("{}: {}", args.report, notice.display());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let path = export::write_output(args.report, &output, &args.out_dir, today)?;
    println!("{}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("mis-report: {}", e);
            ExitCode::FAILURE
        }
    }
}
