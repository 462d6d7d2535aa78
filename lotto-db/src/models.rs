use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest number in the 6/45 pool.
pub const POOL_SIZE: u8 = 45;

/// Numbers drawn per draw (bonus excluded).
pub const PICK_COUNT: usize = 6;

/// A malformed draw record. Raised while parsing a source file or validating
/// user input; never raised by the analysis itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("expected {expected} numbers, got {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("number {0} out of range (1-45)")]
    OutOfRange(i64),

    #[error("duplicate number: {0}")]
    Duplicate(u8),

    #[error("bonus number {0} out of range (1-45)")]
    BonusOutOfRange(i64),

    #[error("bonus number {0} repeats a main number")]
    BonusDuplicate(u8),

    #[error("unparseable date: '{0}'")]
    InvalidDate(String),

    #[error("unparseable number list: '{0}'")]
    InvalidNumbers(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// One historical result. Immutable once loaded; `numbers` keeps the order
/// supplied by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Draw {
    pub round: Option<u32>,
    pub date: NaiveDate,
    pub numbers: [u8; PICK_COUNT],
    pub bonus: Option<u8>,
}

impl Draw {
    pub fn new<T>(
        round: Option<u32>,
        date: NaiveDate,
        numbers: &[T],
        bonus: Option<i64>,
    ) -> Result<Self, DataError>
    where
        T: Copy + Into<i64>,
    {
        let numbers = validate_numbers(numbers)?;
        let bonus = match bonus {
            Some(b) => Some(validate_bonus(b, &numbers)?),
            None => None,
        };
        Ok(Self {
            round,
            date,
            numbers,
            bonus,
        })
    }

    /// Ascending copy of the main numbers. The stored order is left untouched.
    pub fn sorted_numbers(&self) -> [u8; PICK_COUNT] {
        let mut sorted = self.numbers;
        sorted.sort_unstable();
        sorted
    }
}

/// Freshly generated 6-number grid, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateSet {
    pub numbers: [u8; PICK_COUNT],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub count: u32,
}

/// Two adjacent values `low`, `low + 1` seen together in `count` draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsecutivePair {
    pub low: u8,
    pub high: u8,
    pub count: u32,
}

impl std::fmt::Display for ConsecutivePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Checks that `numbers` is exactly six distinct values in [1,45] and returns
/// them in the supplied order.
pub fn validate_numbers<T>(numbers: &[T]) -> Result<[u8; PICK_COUNT], DataError>
where
    T: Copy + Into<i64>,
{
    if numbers.len() != PICK_COUNT {
        return Err(DataError::WrongCount {
            expected: PICK_COUNT,
            found: numbers.len(),
        });
    }

    let mut out = [0u8; PICK_COUNT];
    for (slot, &raw) in out.iter_mut().zip(numbers) {
        *slot = in_pool(raw.into()).ok_or(DataError::OutOfRange(raw.into()))?;
    }

    for i in 0..out.len() {
        for j in (i + 1)..out.len() {
            if out[i] == out[j] {
                return Err(DataError::Duplicate(out[i]));
            }
        }
    }
    Ok(out)
}

fn validate_bonus(raw: i64, numbers: &[u8; PICK_COUNT]) -> Result<u8, DataError> {
    let bonus = in_pool(raw).ok_or(DataError::BonusOutOfRange(raw))?;
    if numbers.contains(&bonus) {
        return Err(DataError::BonusDuplicate(bonus));
    }
    Ok(bonus)
}

fn in_pool(raw: i64) -> Option<u8> {
    if (1..=POOL_SIZE as i64).contains(&raw) {
        Some(raw as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_validate_numbers_ok() {
        assert_eq!(validate_numbers(&[1u8, 2, 3, 4, 5, 6]).unwrap(), [1, 2, 3, 4, 5, 6]);
        assert_eq!(validate_numbers(&[45i64, 44, 43, 42, 41, 40]).unwrap(), [45, 44, 43, 42, 41, 40]);
    }

    #[test]
    fn test_validate_numbers_wrong_count() {
        assert_eq!(
            validate_numbers(&[1u8, 2, 3, 4, 5]),
            Err(DataError::WrongCount { expected: 6, found: 5 })
        );
        assert!(validate_numbers(&[1u8, 2, 3, 4, 5, 6, 7]).is_err());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert_eq!(validate_numbers(&[0i64, 2, 3, 4, 5, 6]), Err(DataError::OutOfRange(0)));
        assert_eq!(validate_numbers(&[1i64, 2, 3, 4, 5, 46]), Err(DataError::OutOfRange(46)));
        assert_eq!(validate_numbers(&[1i64, 2, 3, 4, 5, -3]), Err(DataError::OutOfRange(-3)));
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert_eq!(validate_numbers(&[7u8, 2, 3, 7, 5, 6]), Err(DataError::Duplicate(7)));
    }

    #[test]
    fn test_draw_bonus_checks() {
        let d = date("2024-01-06");
        assert!(Draw::new(Some(1), d, &[1u8, 2, 3, 4, 5, 6], Some(7)).is_ok());
        assert_eq!(
            Draw::new(Some(1), d, &[1u8, 2, 3, 4, 5, 6], Some(6)),
            Err(DataError::BonusDuplicate(6))
        );
        assert_eq!(
            Draw::new(Some(1), d, &[1u8, 2, 3, 4, 5, 6], Some(50)),
            Err(DataError::BonusOutOfRange(50))
        );
    }

    #[test]
    fn test_sorted_numbers_leaves_draw_untouched() {
        let draw = Draw::new(None, date("2024-01-06"), &[30u8, 2, 17, 4, 45, 9], None).unwrap();
        assert_eq!(draw.sorted_numbers(), [2, 4, 9, 17, 30, 45]);
        assert_eq!(draw.numbers, [30, 2, 17, 4, 45, 9]);
    }

    #[test]
    fn test_consecutive_pair_display() {
        let pair = ConsecutivePair { low: 12, high: 13, count: 3 };
        assert_eq!(pair.to_string(), "12-13");
    }
}
