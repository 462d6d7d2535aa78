use lotto_db::models::{DataError, Draw, validate_numbers};

use crate::config::MatchMode;

/// Historical draws matching `ticket` under `mode`. The ticket must be six
/// distinct numbers in 1-45.
pub fn find_matches<'a>(
    history: &'a [Draw],
    ticket: &[u8],
    mode: MatchMode,
) -> Result<Vec<&'a Draw>, DataError> {
    let ticket = validate_numbers(ticket)?;
    let matches: Vec<&Draw> = match mode {
        MatchMode::Positional => history.iter().filter(|d| d.numbers == ticket).collect(),
        MatchMode::Set => {
            let mut sorted = ticket;
            sorted.sort_unstable();
            history.iter().filter(|d| d.sorted_numbers() == sorted).collect()
        }
    };
    Ok(matches)
}

pub fn is_winning(history: &[Draw], ticket: &[u8], mode: MatchMode) -> Result<bool, DataError> {
    Ok(!find_matches(history, ticket, mode)?.is_empty())
}
