pub mod checker;
pub mod frequency;
pub mod pairs;
pub mod ratio;
pub mod sampler;
pub mod window;

use chrono::NaiveDate;
use serde::Serialize;

use lotto_db::models::{CandidateSet, ConsecutivePair, Draw, NumberFrequency};

use crate::config::{AnalysisConfig, GenerationPolicy};
use frequency::FrequencyTable;
use pairs::PairTally;
use ratio::{PatternPercentages, PatternSummary};
use sampler::{CandidatePool, GenerationError, generate_candidates};

/// Statistics over the trailing window ending at `reference_date`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub reference_date: NaiveDate,
    pub window_start: NaiveDate,
    pub draws_in_window: usize,
    pub frequencies: Vec<NumberFrequency>,
    pub top_numbers: Vec<NumberFrequency>,
    pub patterns: PatternSummary,
    pub percentages: PatternPercentages,
    pub top_pairs: Vec<ConsecutivePair>,
    pub consecutive_total: u32,
}

/// `history` is the full, unwindowed history; windowing happens here.
pub fn analyze(history: &[Draw], today: NaiveDate, config: &AnalysisConfig) -> AnalysisReport {
    let windowed = window::trailing_window(history, today, config.window_years);
    let table = FrequencyTable::from_draws(&windowed);
    let tally = PairTally::from_draws(&windowed);
    let patterns = PatternSummary::from_draws(&windowed);

    AnalysisReport {
        reference_date: today,
        window_start: window::window_start(today, config.window_years),
        draws_in_window: windowed.len(),
        frequencies: table.entries(),
        top_numbers: table.top(config.top_numbers),
        patterns,
        percentages: patterns.percentages(),
        top_pairs: tally.top(config.top_pairs),
        consecutive_total: tally.total(),
    }
}

/// Candidate grids under `policy`. Anchors come from the window; the
/// historical check runs against the full history.
pub fn recommend(
    history: &[Draw],
    today: NaiveDate,
    config: &AnalysisConfig,
    policy: GenerationPolicy,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<CandidateSet>, GenerationError> {
    let windowed = window::trailing_window(history, today, config.window_years);
    let table = FrequencyTable::from_draws(&windowed);
    let favored: Vec<u8> = table
        .top(config.top_numbers)
        .iter()
        .map(|f| f.number)
        .collect();

    let pool = CandidatePool::for_policy(policy, &table, &favored)?;
    generate_candidates(history, &pool, count, config.max_attempts, seed)
}
