use lotto_db::models::{ConsecutivePair, Draw, POOL_SIZE};

/// Tally of `(n, n + 1)` pairs, indexed by the low member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTally {
    counts: [u32; POOL_SIZE as usize - 1],
}

impl PairTally {
    pub fn from_draws(draws: &[Draw]) -> Self {
        let mut counts = [0u32; POOL_SIZE as usize - 1];
        for draw in draws {
            let sorted = draw.sorted_numbers();
            for w in sorted.windows(2) {
                if w[1] == w[0] + 1 {
                    counts[(w[0] - 1) as usize] += 1;
                }
            }
        }
        Self { counts }
    }

    /// Number of draws containing both `low` and `low + 1`.
    pub fn count(&self, low: u8) -> u32 {
        if (1..POOL_SIZE).contains(&low) {
            self.counts[(low - 1) as usize]
        } else {
            0
        }
    }

    /// Adjacent pairs found across all draws.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// The `n` most frequent pairs. Ties go to the smaller low member.
    pub fn top(&self, n: usize) -> Vec<ConsecutivePair> {
        let mut pairs: Vec<ConsecutivePair> = (1..POOL_SIZE)
            .filter_map(|low| {
                let count = self.count(low);
                (count > 0).then_some(ConsecutivePair {
                    low,
                    high: low + 1,
                    count,
                })
            })
            .collect();
        pairs.sort_by(|a, b| b.count.cmp(&a.count).then(a.low.cmp(&b.low)));
        pairs.truncate(n);
        pairs
    }
}

pub fn top_pairs(draws: &[Draw], n: usize) -> Vec<ConsecutivePair> {
    PairTally::from_draws(draws).top(n)
}
