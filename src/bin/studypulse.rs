//! StudyPulse CLI - Command-line harness over the session engine
//!
//! Commands:
//! - report: Replay recorded samples into one session analytics record
//! - rollup: Reduce stored session records into a period dashboard

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use chrono::NaiveDate;
use studypulse::rollup::{
    daily_trends, engagement_analysis, study_patterns, DateRange, ProductivityScorer,
};
use studypulse::types::{
    EngagementAnalysis, ProductivityComponents, ProductivityScore, SessionRecord, StudyPatterns,
    TrendPoint,
};
use studypulse::{
    EngineError, ManualClock, RawSample, SessionEngine, SmoothingConfig, ENGINE_VERSION,
};

/// StudyPulse - Behavioral engagement and analytics engine for study sessions
#[derive(Parser)]
#[command(name = "studypulse")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score study-session behavior and roll up session history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded samples into one session analytics record
    Report {
        /// Input file of NDJSON sample records (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Pretty-print the output (defaults to on when stdout is a TTY)
        #[arg(long)]
        pretty: bool,
    },

    /// Reduce stored session records into a period dashboard
    Rollup {
        /// Input file holding a JSON array of session records (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Period start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Period end date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Streak anchor date (defaults to the period end)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Pretty-print the output (defaults to on when stdout is a TTY)
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliReportError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Report {
            input,
            output,
            pretty,
        } => cmd_report(&input, &output, pretty),

        Commands::Rollup {
            input,
            output,
            start,
            end,
            today,
            pretty,
        } => cmd_rollup(&input, &output, start, end, today, pretty),
    }
}

fn cmd_report(input: &Path, output: &Path, pretty: bool) -> Result<(), CliError> {
    let input_data = read_input(input)?;

    let mut samples: Vec<RawSample> = Vec::new();
    for line in input_data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let sample: RawSample = serde_json::from_str(trimmed)
            .map_err(|e| CliError::Parse(format!("Failed to parse sample: {}", e)))?;
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(CliError::NoSamples);
    }

    // Replay on a manual clock so the report reflects the recorded
    // timestamps, not the wall clock at replay time.
    let first_ts = samples
        .iter()
        .find_map(|s| s.timestamp)
        .ok_or_else(|| CliError::Parse("No sample carries a timestamp".to_string()))?;

    let clock = Rc::new(ManualClock::new(first_ts));
    let mut engine =
        SessionEngine::with_clock(Box::new(Rc::clone(&clock)), SmoothingConfig::default());

    for sample in &samples {
        if let Some(ts) = sample.timestamp {
            clock.set(ts);
        }
        engine.push_raw(sample);
        engine.tick();
    }

    let record = engine.finish();
    write_output(output, &to_json(&record, use_pretty(output, pretty))?)
}

fn cmd_rollup(
    input: &Path,
    output: &Path,
    start: NaiveDate,
    end: NaiveDate,
    today: Option<NaiveDate>,
    pretty: bool,
) -> Result<(), CliError> {
    let input_data = read_input(input)?;
    let sessions: Vec<SessionRecord> = serde_json::from_str(&input_data)?;

    let range = DateRange::new(start, end)?;
    let today = today.unwrap_or(end);

    let trends = daily_trends(&sessions, &range);
    let patterns = study_patterns(&sessions, &range, today);
    let engagement = engagement_analysis(&sessions, &range);
    let productivity = ProductivityScorer::score(period_components(&range, &trends));

    let dashboard = Dashboard {
        engine_version: ENGINE_VERSION.to_string(),
        range_start: start,
        range_end: end,
        trends,
        patterns,
        engagement,
        productivity,
    };

    write_output(output, &to_json(&dashboard, use_pretty(output, pretty))?)
}

/// Derive productivity components from the period's daily trends: study-day
/// coverage for consistency, mean daily engagement, and mean daily posture
/// standing in for health.
fn period_components(range: &DateRange, trends: &[TrendPoint]) -> ProductivityComponents {
    if trends.is_empty() {
        return ProductivityComponents {
            consistency: 0.0,
            engagement: 0.0,
            health: 0.0,
        };
    }

    let range_days = range
        .end()
        .signed_duration_since(range.start())
        .num_days()
        .max(0) as f64
        + 1.0;
    let n = trends.len() as f64;

    ProductivityComponents {
        consistency: 100.0 * n / range_days,
        engagement: trends.iter().map(|t| t.avg_engagement).sum::<f64>() / n,
        health: trends.iter().map(|t| t.avg_posture).sum::<f64>() / n,
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, CliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), CliError> {
    if output.to_string_lossy() == "-" {
        println!("{}", data);
        Ok(())
    } else {
        Ok(fs::write(output, data)?)
    }
}

fn use_pretty(output: &Path, pretty: bool) -> bool {
    pretty || (output.to_string_lossy() == "-" && atty::is(atty::Stream::Stdout))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

// Report types

#[derive(serde::Serialize)]
struct Dashboard {
    engine_version: String,
    range_start: NaiveDate,
    range_end: NaiveDate,
    trends: Vec<TrendPoint>,
    patterns: StudyPatterns,
    engagement: EngagementAnalysis,
    productivity: ProductivityScore,
}

// Error types

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Engine(EngineError),
    Json(serde_json::Error),
    Parse(String),
    NoSamples,
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        CliError::Engine(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliReportError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliError> for CliReportError {
    fn from(e: CliError) -> Self {
        match e {
            CliError::Io(e) => CliReportError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliError::Engine(e) => CliReportError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check date range and record contents".to_string()),
            },
            CliError::Json(e) => CliReportError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CliError::Parse(msg) => CliReportError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Each input line must be one JSON sample record".to_string()),
            },
            CliError::NoSamples => CliReportError {
                code: "NO_SAMPLES".to_string(),
                message: "No samples found in input".to_string(),
                hint: Some("Ensure input is not empty".to_string()),
            },
        }
    }
}
