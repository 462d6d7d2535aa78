use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use lotto_db::models::{CandidateSet, Draw, PICK_COUNT, POOL_SIZE};

use super::frequency::FrequencyTable;
use crate::config::GenerationPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("candidate pool holds {available} numbers, at least 6 are required")]
    PoolTooSmall { available: usize },

    #[error("no top-frequency numbers in the window to anchor candidates on")]
    NoFavoredNumbers,

    #[error("gave up after {attempts} attempts ({produced}/{requested} grids generated)")]
    AttemptsExhausted {
        attempts: usize,
        produced: usize,
        requested: usize,
    },
}

/// Numbers a candidate is drawn from, and the numbers it must hit at least
/// once (no constraint when `anchors` is empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    numbers: Vec<u8>,
    anchors: Vec<u8>,
}

impl CandidatePool {
    pub fn full() -> Self {
        Self {
            numbers: (1..=POOL_SIZE).collect(),
            anchors: Vec::new(),
        }
    }

    /// Builds the pool for `policy` from the windowed frequency table and the
    /// top-frequency numbers of that window.
    pub fn for_policy(
        policy: GenerationPolicy,
        window: &FrequencyTable,
        favored: &[u8],
    ) -> Result<Self, GenerationError> {
        let pool = match policy {
            GenerationPolicy::Uniform => Self::full(),
            GenerationPolicy::Favored => {
                if favored.is_empty() {
                    return Err(GenerationError::NoFavoredNumbers);
                }
                Self {
                    anchors: favored.to_vec(),
                    ..Self::full()
                }
            }
            GenerationPolicy::Unpicked => {
                if favored.is_empty() {
                    return Err(GenerationError::NoFavoredNumbers);
                }
                // Unseen numbers never include the favored ones, so they are
                // added back for the anchor condition to be reachable.
                let mut numbers = window.unseen();
                numbers.extend_from_slice(favored);
                numbers.sort_unstable();
                numbers.dedup();
                Self {
                    numbers,
                    anchors: favored.to_vec(),
                }
            }
        };

        if pool.numbers.len() < PICK_COUNT {
            return Err(GenerationError::PoolTooSmall {
                available: pool.numbers.len(),
            });
        }
        Ok(pool)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    fn accepts(&self, grid: &[u8; PICK_COUNT]) -> bool {
        self.anchors.is_empty() || grid.iter().any(|n| self.anchors.contains(n))
    }
}

/// Draws `count` distinct grids from `pool`, none set-equal to a draw of
/// `history`. `max_attempts` bounds the total number of samples for the batch.
pub fn generate_candidates(
    history: &[Draw],
    pool: &CandidatePool,
    count: usize,
    max_attempts: usize,
    seed: Option<u64>,
) -> Result<Vec<CandidateSet>, GenerationError> {
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    generate_with_rng(history, pool, count, max_attempts, &mut rng)
}

fn generate_with_rng<R: Rng + ?Sized>(
    history: &[Draw],
    pool: &CandidatePool,
    count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Vec<CandidateSet>, GenerationError> {
    if pool.numbers.len() < PICK_COUNT {
        return Err(GenerationError::PoolTooSmall {
            available: pool.numbers.len(),
        });
    }

    let historical: HashSet<[u8; PICK_COUNT]> = history.iter().map(Draw::sorted_numbers).collect();
    let mut produced: HashSet<[u8; PICK_COUNT]> = HashSet::with_capacity(count);
    let mut candidates = Vec::with_capacity(count);
    let mut attempts = 0usize;

    while candidates.len() < count {
        if attempts >= max_attempts {
            return Err(GenerationError::AttemptsExhausted {
                attempts,
                produced: candidates.len(),
                requested: count,
            });
        }
        attempts += 1;

        let grid = sample_grid(&pool.numbers, rng);
        if !pool.accepts(&grid) || historical.contains(&grid) || !produced.insert(grid) {
            continue;
        }
        candidates.push(CandidateSet { numbers: grid });
    }

    log::debug!("{} grids generated in {} attempts", candidates.len(), attempts);
    Ok(candidates)
}

/// Six distinct numbers of `pool`, ascending.
fn sample_grid<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> [u8; PICK_COUNT] {
    let picks = rand::seq::index::sample(rng, pool.len(), PICK_COUNT);
    let mut grid = [0u8; PICK_COUNT];
    for (slot, idx) in grid.iter_mut().zip(picks.iter()) {
        *slot = pool[idx];
    }
    grid.sort_unstable();
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draws(sets: &[[u8; 6]]) -> Vec<Draw> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        sets.iter()
            .map(|s| Draw::new(None, date, s, None).unwrap())
            .collect()
    }

    fn assert_valid(grid: &CandidateSet) {
        let n = grid.numbers;
        assert!(n.iter().all(|&x| (1..=45).contains(&x)), "{:?}", n);
        assert!(n.windows(2).all(|w| w[0] < w[1]), "not strictly ascending: {:?}", n);
    }

    #[test]
    fn test_uniform_grids_are_valid_and_new() {
        let history = draws(&[[1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12]]);
        let grids = generate_candidates(&history, &CandidatePool::full(), 50, 10_000, Some(42)).unwrap();
        assert_eq!(grids.len(), 50);

        let historical: HashSet<_> = history.iter().map(Draw::sorted_numbers).collect();
        let unique: HashSet<_> = grids.iter().map(|g| g.numbers).collect();
        assert_eq!(unique.len(), 50);
        for grid in &grids {
            assert_valid(grid);
            assert!(!historical.contains(&grid.numbers));
        }
    }

    #[test]
    fn test_empty_history_still_generates() {
        let grids = generate_candidates(&[], &CandidatePool::full(), 5, 1_000, None).unwrap();
        assert_eq!(grids.len(), 5);
        grids.iter().for_each(assert_valid);
    }

    #[test]
    fn test_same_seed_same_grids() {
        let a = generate_candidates(&[], &CandidatePool::full(), 3, 1_000, Some(7)).unwrap();
        let b = generate_candidates(&[], &CandidatePool::full(), 3, 1_000, Some(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_history_covering_pool_exhausts_attempts() {
        // A seven-number pool has exactly seven grids; all of them are historical.
        let pool = CandidatePool {
            numbers: vec![1, 2, 3, 4, 5, 6, 7],
            anchors: Vec::new(),
        };
        let history = draws(&[
            [1, 2, 3, 4, 5, 6],
            [1, 2, 3, 4, 5, 7],
            [1, 2, 3, 4, 6, 7],
            [1, 2, 3, 5, 6, 7],
            [1, 2, 4, 5, 6, 7],
            [1, 3, 4, 5, 6, 7],
            [2, 3, 4, 5, 6, 7],
        ]);
        let err = generate_candidates(&history, &pool, 1, 500, Some(1)).unwrap_err();
        assert_eq!(
            err,
            GenerationError::AttemptsExhausted { attempts: 500, produced: 0, requested: 1 }
        );
    }

    #[test]
    fn test_more_grids_than_pool_allows() {
        let pool = CandidatePool {
            numbers: vec![1, 2, 3, 4, 5, 6],
            anchors: Vec::new(),
        };
        let err = generate_candidates(&[], &pool, 2, 200, Some(3)).unwrap_err();
        assert!(matches!(err, GenerationError::AttemptsExhausted { produced: 1, .. }));
    }

    #[test]
    fn test_favored_policy_hits_an_anchor() {
        let window = FrequencyTable::from_draws(&[]);
        let pool = CandidatePool::for_policy(GenerationPolicy::Favored, &window, &[13, 27]).unwrap();
        let grids = generate_candidates(&[], &pool, 20, 100_000, Some(5)).unwrap();
        for grid in &grids {
            assert_valid(grid);
            assert!(grid.numbers.contains(&13) || grid.numbers.contains(&27));
        }
    }

    #[test]
    fn test_unpicked_policy_pool() {
        let history = draws(&[[1, 2, 3, 4, 5, 6], [1, 2, 3, 10, 11, 12]]);
        let window = FrequencyTable::from_draws(&history);
        let favored = [1, 2];
        let pool = CandidatePool::for_policy(GenerationPolicy::Unpicked, &window, &favored).unwrap();

        assert!(pool.numbers().contains(&1));
        assert!(!pool.numbers().contains(&3));
        assert!(!pool.numbers().contains(&10));
        assert_eq!(pool.numbers().len(), 45 - 9 + 2);

        let grids = generate_candidates(&history, &pool, 10, 100_000, Some(11)).unwrap();
        for grid in &grids {
            assert_valid(grid);
            assert!(grid.numbers.iter().any(|n| favored.contains(n)));
            assert!(grid.numbers.iter().all(|n| pool.numbers().contains(n)));
        }
    }

    #[test]
    fn test_anchor_policies_need_favored_numbers() {
        let window = FrequencyTable::from_draws(&[]);
        assert_eq!(
            CandidatePool::for_policy(GenerationPolicy::Favored, &window, &[]),
            Err(GenerationError::NoFavoredNumbers)
        );
        assert_eq!(
            CandidatePool::for_policy(GenerationPolicy::Unpicked, &window, &[]),
            Err(GenerationError::NoFavoredNumbers)
        );
        assert!(CandidatePool::for_policy(GenerationPolicy::Uniform, &window, &[]).is_ok());
    }

    #[test]
    fn test_unpicked_pool_too_small() {
        // 42 numbers seen leaves 3 unseen; with 2 favored the pool is 5.
        let history = draws(&[
            [1, 2, 3, 4, 5, 6],
            [7, 8, 9, 10, 11, 12],
            [13, 14, 15, 16, 17, 18],
            [19, 20, 21, 22, 23, 24],
            [25, 26, 27, 28, 29, 30],
            [31, 32, 33, 34, 35, 36],
            [37, 38, 39, 40, 41, 42],
        ]);
        let window = FrequencyTable::from_draws(&history);
        assert_eq!(
            CandidatePool::for_policy(GenerationPolicy::Unpicked, &window, &[1, 2]),
            Err(GenerationError::PoolTooSmall { available: 5 })
        );
    }
}
