use chrono::{Months, NaiveDate};

use lotto_db::models::Draw;

/// First day of the trailing window ending at `today`. Calendar subtraction:
/// 2024-02-29 minus one year is 2023-02-28. The day is clamped to the end of
/// the month; it does not roll over to 2023-03-01.
pub fn window_start(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

/// Draws dated on or after `window_start(today, years)`, in their stored order.
pub fn trailing_window(draws: &[Draw], today: NaiveDate, years: u32) -> Vec<Draw> {
    let start = window_start(today, years);
    draws.iter().filter(|d| d.date >= start).copied().collect()
}

pub fn last_year(draws: &[Draw], today: NaiveDate) -> Vec<Draw> {
    trailing_window(draws, today, 1)
}
