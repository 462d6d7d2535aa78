//! Parsing of draw-history files into [`Draw`] records.
//!
//! Two layouts are understood: a JSON array of objects and a CSV file with a
//! header row. Both accept the English keys (`round`, `date`, `numbers`,
//! `bonus`) as well as the Korean column names used by the historical export.
//!
//! A record that fails validation is skipped and reported in
//! [`LoadedDraws::rejected`]; only an unreadable file fails the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{DataError, Draw};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

const ROUND_KEYS: [&str; 2] = ["round", "회차"];
const DATE_KEYS: [&str; 2] = ["date", "날짜"];
const NUMBERS_KEYS: [&str; 2] = ["numbers", "번호"];
const BONUS_KEYS: [&str; 2] = ["bonus", "보너스 번호"];

#[derive(Debug, Clone, PartialEq)]
pub struct RecordError {
    /// 1-based position of the record in the file.
    pub index: usize,
    pub error: DataError,
}

#[derive(Debug, Default)]
pub struct LoadedDraws {
    pub draws: Vec<Draw>,
    pub rejected: Vec<RecordError>,
}

impl LoadedDraws {
    pub fn total_records(&self) -> usize {
        self.draws.len() + self.rejected.len()
    }

    fn push(&mut self, index: usize, record: Result<Draw, DataError>) {
        match record {
            Ok(draw) => self.draws.push(draw),
            Err(error) => {
                log::warn!("record {index} skipped: {error}");
                self.rejected.push(RecordError { index, error });
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumbers {
    List(Vec<i64>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default, alias = "회차")]
    round: Option<u32>,
    #[serde(alias = "날짜")]
    date: String,
    #[serde(alias = "번호")]
    numbers: RawNumbers,
    #[serde(default, alias = "보너스 번호")]
    bonus: Option<i64>,
}

impl RawRecord {
    fn into_draw(self) -> Result<Draw, DataError> {
        let date = parse_date(&self.date)?;
        let numbers = match self.numbers {
            RawNumbers::List(v) => v,
            RawNumbers::Text(s) => parse_number_list(&s)?,
        };
        Draw::new(self.round, date, numbers.as_slice(), self.bonus)
    }
}

/// Parses `YYYY-MM-DD` (also `.` or `/` separated). A trailing time part such
/// as `T00:00:00` or ` 00:00:00` is ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate, DataError> {
    let trimmed = raw.trim();
    let day_part = trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
        .ok_or_else(|| DataError::InvalidDate(raw.to_string()))
}

/// Parses a list written as text, e.g. `"[1, 2, 3, 4, 5, 6]"` or `"1 2 3 4 5 6"`.
pub fn parse_number_list(raw: &str) -> Result<Vec<i64>, DataError> {
    let inner = raw.trim().trim_start_matches('[').trim_end_matches(']');
    inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| DataError::InvalidNumbers(raw.to_string()))
}

pub fn read_json<R: Read>(reader: R) -> Result<LoadedDraws> {
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(reader).context("Draw file is not a JSON array")?;

    let mut loaded = LoadedDraws::default();
    for (i, value) in values.into_iter().enumerate() {
        let record = serde_json::from_value::<RawRecord>(value)
            .map_err(|e| DataError::Malformed(e.to_string()))
            .and_then(RawRecord::into_draw);
        loaded.push(i + 1, record);
    }
    Ok(loaded)
}

struct CsvColumns {
    round: Option<usize>,
    date: usize,
    numbers: usize,
    bonus: Option<usize>,
}

impl CsvColumns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |keys: &[&str]| headers.iter().position(|h| keys.contains(&h.trim()));
        let Some(date) = find(&DATE_KEYS) else {
            bail!("CSV header has no date column");
        };
        let Some(numbers) = find(&NUMBERS_KEYS) else {
            bail!("CSV header has no numbers column");
        };
        Ok(Self {
            round: find(&ROUND_KEYS),
            date,
            numbers,
            bonus: find(&BONUS_KEYS),
        })
    }

    fn parse(&self, record: &csv::StringRecord) -> Result<Draw, DataError> {
        let field = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .ok_or_else(|| DataError::Malformed(format!("missing field at column {}", idx + 1)))
        };
        let optional = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::trim).filter(|s| !s.is_empty());

        let round = match optional(self.round) {
            Some(s) => Some(
                s.parse::<u32>()
                    .map_err(|_| DataError::Malformed(format!("invalid round '{s}'")))?,
            ),
            None => None,
        };
        let bonus = match optional(self.bonus) {
            Some(s) => Some(
                s.parse::<i64>()
                    .map_err(|_| DataError::Malformed(format!("invalid bonus '{s}'")))?,
            ),
            None => None,
        };

        let date = parse_date(field(self.date)?)?;
        let numbers = parse_number_list(field(self.numbers)?)?;
        Draw::new(round, date, numbers.as_slice(), bonus)
    }
}

pub fn read_csv<R: Read>(reader: R) -> Result<LoadedDraws> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Unable to read CSV header")?.clone();
    let columns = CsvColumns::from_headers(&headers)?;

    let mut loaded = LoadedDraws::default();
    for (i, record_result) in reader.records().enumerate() {
        let record = record_result
            .map_err(|e| DataError::Malformed(e.to_string()))
            .and_then(|r| columns.parse(&r));
        loaded.push(i + 1, record);
    }
    Ok(loaded)
}

/// Reads a draw file, choosing the layout from the extension (`.csv`, else JSON).
pub fn read_file(path: &Path) -> Result<LoadedDraws> {
    let file = File::open(path).with_context(|| format!("Unable to open {:?}", path))?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        read_csv(file).with_context(|| format!("Invalid CSV in {:?}", path))
    } else {
        read_json(file).with_context(|| format!("Invalid JSON in {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(parse_date("2024-01-06").unwrap(), expected);
        assert_eq!(parse_date("2024.01.06").unwrap(), expected);
        assert_eq!(parse_date("2024/01/06").unwrap(), expected);
        assert_eq!(parse_date("2024-01-06T00:00:00").unwrap(), expected);
        assert_eq!(parse_date(" 2024-01-06 20:45:00 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date("Jan 6th"), Err(DataError::InvalidDate("Jan 6th".into())));
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_number_list() {
        assert_eq!(parse_number_list("[1, 2, 3, 4, 5, 6]").unwrap(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(parse_number_list("10 20 30").unwrap(), vec![10, 20, 30]);
        assert!(parse_number_list("[1, two, 3]").is_err());
    }

    #[test]
    fn test_read_json_english_and_korean_keys() {
        let json = r#"[
            {"date": "2024-01-06", "numbers": [6, 12, 17, 21, 32, 39], "round": 1101, "bonus": 30},
            {"회차": 1102, "날짜": "2024-01-13", "번호": [13, 14, 19, 26, 40, 43], "보너스 번호": 15}
        ]"#;
        let loaded = read_json(json.as_bytes()).unwrap();
        assert_eq!(loaded.draws.len(), 2);
        assert!(loaded.rejected.is_empty());
        assert_eq!(loaded.draws[0].round, Some(1101));
        assert_eq!(loaded.draws[1].numbers, [13, 14, 19, 26, 40, 43]);
        assert_eq!(loaded.draws[1].bonus, Some(15));
    }

    #[test]
    fn test_read_json_skips_bad_records() {
        let json = r#"[
            {"date": "2024-01-06", "numbers": [1, 2, 3, 4, 5, 6]},
            {"date": "not a date", "numbers": [1, 2, 3, 4, 5, 6]},
            {"date": "2024-01-20", "numbers": [1, 2, 3, 4, 5]},
            {"numbers": [1, 2, 3, 4, 5, 6]},
            {"date": "2024-01-27", "numbers": "[7, 8, 9, 10, 11, 12]"}
        ]"#;
        let loaded = read_json(json.as_bytes()).unwrap();
        assert_eq!(loaded.draws.len(), 2);
        assert_eq!(loaded.total_records(), 5);
        let indices: Vec<usize> = loaded.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(
            loaded.rejected[1].error,
            DataError::WrongCount { expected: 6, found: 5 }
        );
    }

    #[test]
    fn test_read_json_not_an_array() {
        assert!(read_json(r#"{"date": "2024-01-06"}"#.as_bytes()).is_err());
    }

    #[test]
    fn test_read_csv_korean_header_layout() {
        let csv = "회차,날짜,번호,보너스 번호\n\
                   1,2002-12-07,\"[10, 23, 29, 33, 37, 40]\",16\n\
                   2,2002-12-14,\"[9, 13, 21, 25, 32, 42]\",2\n\
                   3,2002-12-21,\"[11, 16, 19, 21, 27]\",30\n";
        let loaded = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(loaded.draws.len(), 2);
        assert_eq!(loaded.rejected.len(), 1);
        assert_eq!(loaded.rejected[0].index, 3);
        assert_eq!(loaded.draws[0].round, Some(1));
        assert_eq!(loaded.draws[1].date, NaiveDate::from_ymd_opt(2002, 12, 14).unwrap());
    }

    #[test]
    fn test_read_csv_missing_columns() {
        assert!(read_csv("round,bonus\n1,2\n".as_bytes()).is_err());
    }

    #[test]
    fn test_read_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "date,numbers").unwrap();
        writeln!(file, "2024-01-06,\"1 2 3 4 5 6\"").unwrap();
        let loaded = read_file(file.path()).unwrap();
        assert_eq!(loaded.draws.len(), 1);
        assert_eq!(loaded.draws[0].round, None);
    }
}
