use lotto_db::models::{Draw, NumberFrequency, POOL_SIZE};

/// Occurrence count of every number in 1-45 over a set of draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; POOL_SIZE as usize],
}

impl FrequencyTable {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let mut counts = [0u32; POOL_SIZE as usize];
        for draw in draws {
            for &n in &draw.numbers {
                counts[(n - 1) as usize] += 1;
            }
        }
        Self { counts }
    }

    pub fn count(&self, number: u8) -> u32 {
        match number {
            1..=POOL_SIZE => self.counts[(number - 1) as usize],
            _ => 0,
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// All 45 numbers in ascending order, zero counts included.
    pub fn entries(&self) -> Vec<NumberFrequency> {
        (1..=POOL_SIZE)
            .map(|number| NumberFrequency {
                number,
                count: self.count(number),
            })
            .collect()
    }

    /// Numbers that never occurred, ascending.
    pub fn unseen(&self) -> Vec<u8> {
        (1..=POOL_SIZE).filter(|&n| self.count(n) == 0).collect()
    }

    /// The `n` most frequent numbers that occurred at least once.
    /// Ties go to the smaller number.
    pub fn top(&self, n: usize) -> Vec<NumberFrequency> {
        let mut seen: Vec<NumberFrequency> = self
            .entries()
            .into_iter()
            .filter(|e| e.count > 0)
            .collect();
        seen.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
        seen.truncate(n);
        seen
    }
}

pub fn top_numbers(draws: &[Draw], n: usize) -> Vec<NumberFrequency> {
    FrequencyTable::from_draws(draws).top(n)
}
