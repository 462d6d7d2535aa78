use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use crate::analysis::AnalysisReport;
use crate::import::ImportResult;
use lotto_db::models::{CandidateSet, Draw, NumberFrequency};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn format_round(draw: &Draw) -> String {
    draw.round.map(|r| r.to_string()).unwrap_or_else(|| "—".to_string())
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("No draws to display.");
        return;
    }

    let mut table = new_table(vec!["Round", "Date", "Numbers", "Bonus"]);
    for draw in draws {
        let bonus = draw.bonus.map(|b| format!("{:2}", b)).unwrap_or_else(|| "—".to_string());
        table.add_row(vec![
            format_round(draw),
            draw.date.to_string(),
            format_numbers(&draw.sorted_numbers()),
            bonus,
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import finished:");
    println!("  Records read       : {}", result.total_records);
    println!("  Inserted           : {}", result.inserted);
    println!("  Duplicates skipped : {}", result.skipped);
    if result.errors > 0 {
        println!("  Errors             : {}", result.errors);
    }
}

pub fn display_frequencies(frequencies: &[NumberFrequency], draws_in_window: usize) {
    println!("\nFrequencies over {} draws\n", draws_in_window);

    let mut table = new_table(vec!["Number", "Count", "Share"]);
    let total: u32 = frequencies.iter().map(|f| f.count).sum();

    let mut sorted = frequencies.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));

    for f in &sorted {
        let share = if total > 0 {
            f.count as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        table.add_row(vec![
            format!("{:2}", f.number),
            f.count.to_string(),
            format!("{:.2} %", share),
        ]);
    }
    println!("{table}");
}

/// One `(number, count)` point per number, for the bar chart.
fn frequency_points(frequencies: &[NumberFrequency]) -> Vec<(f32, f32)> {
    frequencies
        .iter()
        .map(|f| (f.number as f32, f.count as f32))
        .collect()
}

pub fn display_frequency_chart(frequencies: &[NumberFrequency]) {
    let points = frequency_points(frequencies);
    if points.iter().all(|&(_, count)| count == 0.0) {
        println!("  (No data to chart)");
        return;
    }

    println!("\n── Frequency by number ──");
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new(120, 40, 0.5, 45.5);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_report(report: &AnalysisReport) {
    println!(
        "\nWindow {} .. {} ({} draws)\n",
        report.window_start, report.reference_date, report.draws_in_window
    );

    println!("── Most frequent numbers ──");
    if report.top_numbers.is_empty() {
        println!("(none)");
    } else {
        let mut table = new_table(vec!["#", "Number", "Count"]);
        for (i, f) in report.top_numbers.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                format!("{:2}", f.number),
                f.count.to_string(),
            ]);
        }
        println!("{table}");
    }

    println!("\n── Patterns ──");
    let p = &report.patterns;
    let pct = &report.percentages;
    let mut table = new_table(vec!["Class", "Count", "Share"]);
    for (label, count, share) in [
        ("Odd", p.odd, pct.odd),
        ("Even", p.even, pct.even),
        ("Low (1-22)", p.low, pct.low),
        ("High (23-45)", p.high, pct.high),
    ] {
        table.add_row(vec![
            label.to_string(),
            count.to_string(),
            format!("{:.2} %", share),
        ]);
    }
    println!("{table}");

    println!(
        "\n── Consecutive pairs ({} found) ──",
        report.consecutive_total
    );
    if report.top_pairs.is_empty() {
        println!("(none)");
    } else {
        let mut table = new_table(vec!["#", "Pair", "Draws"]);
        for (i, pair) in report.top_pairs.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                pair.to_string(),
                pair.count.to_string(),
            ]);
        }
        println!("{table}");
    }
}

pub fn display_candidates(candidates: &[CandidateSet]) {
    println!("\n── Recommended grids ──");

    let mut table = new_table(vec!["#", "Numbers"]);
    for (i, grid) in candidates.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), format_numbers(&grid.numbers)]);
    }
    println!("{table}");
}

pub fn display_check(ticket: &[u8], matches: &[&Draw]) {
    if matches.is_empty() {
        println!(
            "{} has never been drawn.",
            format_numbers(ticket)
        );
        return;
    }

    println!("{} was drawn {} time(s):", format_numbers(ticket), matches.len());
    let mut table = new_table(vec!["Round", "Date", "Numbers"]);
    for draw in matches {
        table.add_row(vec![
            Cell::new(format_round(draw)),
            Cell::new(draw.date.to_string()),
            Cell::new(format_numbers(&draw.numbers)).fg(Color::Green),
        ]);
    }
    println!("{table}");
}
