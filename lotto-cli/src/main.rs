use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use lotto_cli::analysis::checker::find_matches;
use lotto_cli::analysis::frequency::FrequencyTable;
use lotto_cli::analysis::window::trailing_window;
use lotto_cli::analysis::{AnalysisReport, analyze, recommend};
use lotto_cli::config::{AnalysisConfig, GenerationPolicy, MatchMode};
use lotto_cli::display::{
    display_candidates, display_check, display_draws, display_frequencies, display_frequency_chart,
    display_import_summary,
    display_report,
};
use lotto_db::db::{count_draws, db_path, fetch_history, fetch_last_draws, insert_draw, migrate, open_db};
use lotto_db::models::{CandidateSet, Draw};
use lotto_db::rusqlite::Connection;

const EMPTY_DB_HINT: &str = "Empty database. Run first: lotto6 import";

#[derive(Parser)]
#[command(name = "lotto6", about = "Draw-history statistics for 6/45 lotto")]
struct Cli {
    /// SQLite database (default: ./data/lotto.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON analysis configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference date of the trailing window (default: today)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import draws from a JSON or CSV file
    Import {
        /// Path to the draw file
        #[arg(short, long, default_value = "data/lotto_numbers.json")]
        file: PathBuf,
    },

    /// Print the database path
    DbPath,

    /// List the most recent draws
    List {
        /// Number of draws to show
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Frequency of every number over the window
    Stats,

    /// Window statistics and recommended grids
    Analyze {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Seed for reproducible grids
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate grids never drawn before
    Recommend {
        /// Number of grids
        #[arg(short, long)]
        count: Option<usize>,

        /// Generation policy
        #[arg(short, long)]
        policy: Option<GenerationPolicy>,

        /// Seed for reproducible grids
        #[arg(long)]
        seed: Option<u64>,

        /// Sampling attempts before giving up
        #[arg(long)]
        max_attempts: Option<usize>,
    },

    /// Check whether six numbers were ever drawn
    Check {
        /// Comparison mode
        #[arg(short, long)]
        mode: Option<MatchMode>,

        /// Six numbers
        #[arg(required = true, num_args = 6)]
        numbers: Vec<u8>,
    },

    /// Add a draw manually
    Add {
        /// Draw date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Draw round
        #[arg(long)]
        round: Option<u32>,

        /// Bonus number
        #[arg(long)]
        bonus: Option<u8>,

        /// Six numbers in drawing order
        #[arg(required = true, num_args = 6)]
        numbers: Vec<u8>,
    },
}

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    report: &'a AnalysisReport,
    recommendations: &'a [CandidateSet],
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let path = cli.db.clone().unwrap_or_else(db_path);
    let config = load_config(cli.config.as_deref())?;
    let today = cli.today.unwrap_or_else(|| chrono::Local::now().date_naive());

    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats => cmd_stats(&conn, &config, today),
        Command::Analyze { json, seed } => cmd_analyze(&conn, &config, today, json, seed),
        Command::Recommend {
            count,
            policy,
            seed,
            max_attempts,
        } => {
            let config = AnalysisConfig {
                max_attempts: max_attempts.unwrap_or(config.max_attempts),
                ..config
            };
            let policy = policy.unwrap_or(config.policy);
            let count = count.unwrap_or(config.recommendations);
            cmd_recommend(&conn, &config, today, policy, count, seed)
        }
        Command::Check { mode, numbers } => {
            cmd_check(&conn, &numbers, mode.unwrap_or(config.match_mode))
        }
        Command::Add {
            date,
            round,
            bonus,
            numbers,
        } => cmd_add(&conn, date, round, bonus, &numbers),
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load(p),
        None => Ok(AnalysisConfig::default()),
    }
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = lotto_cli::import::import_file(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB_HINT}");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, config: &AnalysisConfig, today: NaiveDate) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB_HINT}");
        return Ok(());
    }
    let history = fetch_history(conn)?;
    let windowed = trailing_window(&history, today, config.window_years);
    let table = FrequencyTable::from_draws(&windowed);
    let entries = table.entries();
    display_frequencies(&entries, windowed.len());
    display_frequency_chart(&entries);
    Ok(())
}

fn cmd_analyze(
    conn: &Connection,
    config: &AnalysisConfig,
    today: NaiveDate,
    json: bool,
    seed: Option<u64>,
) -> Result<()> {
    let history = fetch_history(conn)?;
    if history.is_empty() && !json {
        println!("{EMPTY_DB_HINT}");
        return Ok(());
    }

    let report = analyze(&history, today, config);
    let recommendations = recommend(
        &history,
        today,
        config,
        config.policy,
        config.recommendations,
        seed,
    )
    .context("Unable to generate recommended grids")?;

    if json {
        let output = AnalysisOutput {
            report: &report,
            recommendations: &recommendations,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        display_report(&report);
        display_candidates(&recommendations);
    }
    Ok(())
}

fn cmd_recommend(
    conn: &Connection,
    config: &AnalysisConfig,
    today: NaiveDate,
    policy: GenerationPolicy,
    count: usize,
    seed: Option<u64>,
) -> Result<()> {
    let history = fetch_history(conn)?;
    let grids = recommend(&history, today, config, policy, count, seed)
        .with_context(|| format!("Unable to generate {count} grids with the {policy:?} policy"))?;
    display_candidates(&grids);
    Ok(())
}

fn cmd_check(conn: &Connection, numbers: &[u8], mode: MatchMode) -> Result<()> {
    let history = fetch_history(conn)?;
    if history.is_empty() {
        println!("{EMPTY_DB_HINT}");
        return Ok(());
    }
    let matches = find_matches(&history, numbers, mode)?;
    display_check(numbers, &matches);
    Ok(())
}

fn cmd_add(
    conn: &Connection,
    date: NaiveDate,
    round: Option<u32>,
    bonus: Option<u8>,
    numbers: &[u8],
) -> Result<()> {
    let draw = Draw::new(round, date, numbers, bonus.map(i64::from))?;

    display_draws(&[draw]);
    if insert_draw(conn, &draw)? {
        println!("Draw inserted.");
    } else {
        bail!("Round {} already exists", round.unwrap_or_default());
    }
    Ok(())
}
