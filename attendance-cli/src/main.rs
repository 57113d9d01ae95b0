//! Attendance CLI Application
//!
//! This is the command-line interface for the attendance analyzer.
//! It uses the attendance-engine library and adds:
//! - Comment loading (JSON array or JSON Lines)
//! - Persisted date selection (JSON state file)
//! - Report generation (TXT/JSON) and plain-text export

use anyhow::{Context, Result};
use attendance_engine::{Analyzer, CalendarDate, DateTokenParser};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;
mod input;
mod report;
mod state;
mod store;

use config::{AppConfig, OutputFormat};
use state::Session;

/// Attendance analyzer - tally `<date> @참석` tags from comment threads
#[derive(Parser, Debug)]
#[command(name = "attendance-cli")]
#[command(about = "Tally attendance tags from comment threads", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Path to the state file (overrides config)
    #[arg(long, value_name = "FILE", global = true)]
    state: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve comments and print attendance for the selected dates
    Analyze {
        #[command(flatten)]
        run: RunArgs,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print `<date> : <names>` lines for the selected dates
    Export {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Maintain the saved dates and their selection
    Dates {
        #[command(subcommand)]
        action: DatesCommand,
    },

    /// Show or set the stored source page address
    TargetUrl {
        /// New address (omit to show the current one)
        url: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Comments file (JSON array or JSON Lines)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Year applied to month/day tokens (default: current year)
    #[arg(long, value_name = "YEAR")]
    year: Option<i32>,
}

#[derive(Subcommand, Debug)]
enum DatesCommand {
    /// List saved dates ([x] = selected)
    List,
    /// Save a date, selected unless --unchecked
    Add {
        /// `YYYY-MM-DD` or a short token like `5.2`
        date: String,
        #[arg(long)]
        unchecked: bool,
    },
    /// Select a date
    Check { date: String },
    /// Deselect a date
    Uncheck { date: String },
    /// Forget a date
    Remove { date: String },
    /// Forget every date
    Clear,
    /// Select exactly the given dates
    Sync { dates: Vec<String> },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Attendance CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using engine library v{}", attendance_engine::VERSION);

    let mut config = config::load_or_default(args.config.as_deref())?;
    if let Some(path) = &args.state {
        config.state.path = path.clone();
    }
    log::debug!("State file: {:?}", config.state.path);

    match args.command {
        Command::Analyze { run, format } => {
            let format = format.unwrap_or(config.output.format);
            analyze_mode(&config, &run, format)
        }
        Command::Export { run } => export_mode(&config, &run),
        Command::Dates { action } => dates_mode(&config, action),
        Command::TargetUrl { url } => target_url_mode(&config, url),
    }
}

/// Analyze mode - resolve comments, summarize over the selected dates, print
fn analyze_mode(config: &AppConfig, run: &RunArgs, format: OutputFormat) -> Result<()> {
    let summary = run_analysis(config, run)?;

    let mut out = open_output(output_path(config, run))?;
    match format {
        OutputFormat::Txt => report::write_txt(&mut out, &summary)?,
        OutputFormat::Json => report::write_json(&mut out, &summary)?,
    }
    out.flush()?;
    Ok(())
}

/// Export mode - plain `<date> : <names>` lines
fn export_mode(config: &AppConfig, run: &RunArgs) -> Result<()> {
    let summary = run_analysis(config, run)?;
    if summary.nothing_selected() {
        log::warn!("No dates selected, export is empty");
    }

    let mut out = open_output(output_path(config, run))?;
    let text = summary.export_text();
    if !text.is_empty() {
        writeln!(out, "{}", text)?;
    }
    out.flush()?;
    Ok(())
}

fn run_analysis(
    config: &AppConfig,
    run: &RunArgs,
) -> Result<attendance_engine::AttendanceSummary> {
    let mut engine_config = config.engine.clone();
    if let Some(year) = run.year {
        engine_config.reference_year = Some(year);
    }

    let analyzer = Analyzer::new(engine_config).context("Invalid engine configuration")?;
    let session = Session::open(&config.state.path)?;
    let comments = input::load_comments(&run.input)?;

    Ok(analyzer.analyze(&comments, session.catalog().filter()))
}

/// Dates mode - edit the saved date list
fn dates_mode(config: &AppConfig, action: DatesCommand) -> Result<()> {
    let parser = DateTokenParser::for_year(config.engine.reference_year);
    let mut session = Session::open(&config.state.path)?;

    match action {
        DatesCommand::List => {}
        DatesCommand::Add { date, unchecked } => {
            let date = parse_date_arg(&parser, &date)?;
            session.update(|catalog| catalog.add_date(date, !unchecked))?;
            println!("Added {} ({})", date, date.short_label());
        }
        DatesCommand::Check { date } => {
            let date = parse_date_arg(&parser, &date)?;
            session.update(|catalog| catalog.set_checked(date, true))?;
        }
        DatesCommand::Uncheck { date } => {
            let date = parse_date_arg(&parser, &date)?;
            session.update(|catalog| catalog.set_checked(date, false))?;
        }
        DatesCommand::Remove { date } => {
            let date = parse_date_arg(&parser, &date)?;
            let mut removed = false;
            session.update(|catalog| removed = catalog.delete_date(&date))?;
            if !removed {
                log::warn!("Date {} was not saved", date);
            }
        }
        DatesCommand::Clear => {
            session.update(|catalog| catalog.clear_all())?;
            println!("All dates removed");
        }
        DatesCommand::Sync { dates } => {
            let dates = dates
                .iter()
                .map(|d| parse_date_arg(&parser, d))
                .collect::<Result<Vec<_>>>()?;
            session.update(|catalog| catalog.sync_checked(dates))?;
        }
    }

    let stdout = io::stdout();
    report::write_dates(&mut stdout.lock(), session.catalog())?;
    Ok(())
}

/// Target URL mode - show or store the `targetUrl` key
fn target_url_mode(config: &AppConfig, url: Option<String>) -> Result<()> {
    let mut session = Session::open(&config.state.path)?;

    match url {
        Some(url) => {
            let url = url.trim().to_string();
            if url.is_empty() {
                anyhow::bail!("URL must not be empty");
            }
            session.update(|catalog| catalog.set_target_url(Some(url)))?;
            println!("URL saved");
        }
        None => match session.catalog().target_url() {
            Some(url) => println!("{}", url),
            None => println!("No URL saved"),
        },
    }
    Ok(())
}

fn parse_date_arg(parser: &DateTokenParser, input: &str) -> Result<CalendarDate> {
    parser
        .parse_any(input)
        .with_context(|| format!("Invalid date: {:?}", input))
}

/// `-o` wins over `output.output_file`; neither means stdout
fn output_path<'a>(config: &'a AppConfig, run: &'a RunArgs) -> Option<&'a Path> {
    run.output.as_deref().or(config.output.output_file.as_deref())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            log::info!("Writing output to {:?}", path);
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(output: Option<&str>) -> RunArgs {
        RunArgs {
            input: PathBuf::from("comments.json"),
            output: output.map(PathBuf::from),
            year: None,
        }
    }

    #[test]
    fn test_output_path_falls_back_to_config() {
        let mut config = AppConfig::default();
        assert_eq!(output_path(&config, &run_args(None)), None);

        config.output.output_file = Some(PathBuf::from("report.txt"));
        assert_eq!(
            output_path(&config, &run_args(None)),
            Some(Path::new("report.txt"))
        );
        assert_eq!(
            output_path(&config, &run_args(Some("export.txt"))),
            Some(Path::new("export.txt"))
        );
    }

    #[test]
    fn test_export_args_share_output_fallback() {
        let mut config = AppConfig::default();
        config.output.output_file = Some(PathBuf::from("out/attendance.txt"));

        let args = Args::parse_from(["attendance-cli", "export", "-i", "comments.json"]);
        let Command::Export { run } = args.command else {
            panic!("expected export command");
        };
        assert_eq!(
            output_path(&config, &run),
            Some(Path::new("out/attendance.txt"))
        );
    }
}
