use serde::Serialize;

use lotto_db::models::Draw;

/// Largest number counted as "low".
pub const LOW_MAX: u8 = 22;

/// Odd/even and low/high counts over a flat sequence of numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub odd: u32,
    pub even: u32,
    pub low: u32,
    pub high: u32,
}

/// Shares in percent; all zero when nothing was counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PatternPercentages {
    pub odd: f64,
    pub even: f64,
    pub low: f64,
    pub high: f64,
}

impl PatternSummary {
    pub fn from_numbers<I: IntoIterator<Item = u8>>(numbers: I) -> Self {
        let mut summary = Self::default();
        for n in numbers {
            if n % 2 == 0 {
                summary.even += 1;
            } else {
                summary.odd += 1;
            }
            if n <= LOW_MAX {
                summary.low += 1;
            } else {
                summary.high += 1;
            }
        }
        summary
    }

    pub fn from_draws(draws: &[Draw]) -> Self {
        Self::from_numbers(draws.iter().flat_map(|d| d.numbers))
    }

    pub fn total(&self) -> u32 {
        self.odd + self.even
    }

    pub fn percentages(&self) -> PatternPercentages {
        let total = self.total();
        PatternPercentages {
            odd: percentage(self.odd, total),
            even: percentage(self.even, total),
            low: percentage(self.low, total),
            high: percentage(self.high, total),
        }
    }
}

fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
