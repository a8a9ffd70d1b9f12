use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use issue_tracking::{LocalHistoryTracker, Tracker};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

mod input;
mod report;

use report::TrackReport;

/// File name used for the history pool of a `reconcile` run
const RECONCILE_FILE: &str = "input";

#[derive(Parser)]
#[command(name = "issue-tracker")]
#[command(about = "Match findings of a new analysis with previously known findings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match raw findings against base findings and report the mapping
    Track(TrackArgs),

    /// Carry history from previous findings over to new findings
    Reconcile(ReconcileArgs),
}

#[derive(Args)]
struct TrackArgs {
    /// JSON array of newly found findings
    #[arg(long)]
    raw: PathBuf,

    /// JSON array of previously known findings
    #[arg(long)]
    base: PathBuf,

    /// TOML file selecting the strategies to run
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ReconcileArgs {
    /// JSON array of findings from the previous analysis
    #[arg(long)]
    previous: PathBuf,

    /// JSON array of findings from the latest analysis
    #[arg(long)]
    raw: PathBuf,

    /// Creation date for new findings (millis since epoch, default: now)
    #[arg(long)]
    now: Option<i64>,

    /// TOML file selecting the strategies to run
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Track(args) => run_track(args),
        Commands::Reconcile(args) => run_reconcile(args),
    }
}

fn run_track(args: TrackArgs) -> Result<()> {
    let config = input::load_config(args.config.as_deref())?;
    let tracker = Tracker::new(config).context("Invalid tracker configuration")?;
    let raws = input::load_findings(&args.raw)?;
    let bases = input::load_findings(&args.base)?;

    log::info!(
        "Tracking {} raw finding(s) against {} base finding(s)",
        raws.len(),
        bases.len()
    );
    let tracking = tracker.track(&raws, &bases);

    if args.json {
        let report = TrackReport::from_tracking(&tracking);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_text(&tracking));
    }
    Ok(())
}

fn run_reconcile(args: ReconcileArgs) -> Result<()> {
    let config = input::load_config(args.config.as_deref())?;
    let tracker = Tracker::new(config).context("Invalid tracker configuration")?;
    let previous = input::load_findings(&args.previous)?;
    let mut raws = input::load_findings(&args.raw)?;
    let now = match args.now {
        Some(now) => now,
        None => now_millis()?,
    };

    let mut history = LocalHistoryTracker::new(tracker);
    history.set_previous(RECONCILE_FILE, previous);
    let summary = history.match_with_previous_findings(RECONCILE_FILE, &mut raws, now);
    log::info!(
        "{} finding(s) matched history, {} new, {} previous finding(s) to close",
        summary.matched,
        summary.new,
        summary.unmatched_previous
    );

    println!("{}", serde_json::to_string_pretty(&raws)?);
    Ok(())
}

fn now_millis() -> Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?;
    i64::try_from(elapsed.as_millis()).context("Current time does not fit in i64 millis")
}
