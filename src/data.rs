//! The dataset provider: typed player records and CSV ingest.
//!
//! Rows are validated while loading; a row whose numeric cells fail coercion is
//! dropped from the working set rather than zero-filled. The surviving batch is
//! rebuilt in full on every load; there is no incremental update.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString};
use thiserror::Error;

pub const COL_NAME: &str = "Player_Name";
pub const COL_CLUB: &str = "Club";
pub const COL_POSITION: &str = "Position";
pub const COL_RATING: &str = "Rating";
pub const COL_GOALS: &str = "Goals";
pub const COL_ASSISTS: &str = "Assists";
pub const COL_PASSES_COMPLETED: &str = "Passes_Completed";
pub const COL_PASS_ACCURACY: &str = "Pass_Accuracy";
pub const COL_SHOT_ACCURACY: &str = "Shot_Accuracy";
pub const COL_TACKLES_WON: &str = "Tackles_Won";

const REQUIRED_COLUMNS: [&str; 9] = [
    COL_NAME,
    COL_CLUB,
    COL_POSITION,
    COL_GOALS,
    COL_ASSISTS,
    COL_PASSES_COMPLETED,
    COL_PASS_ACCURACY,
    COL_SHOT_ACCURACY,
    COL_TACKLES_WON,
];

const NUMERIC_COLUMNS: [&str; 6] = [
    COL_GOALS,
    COL_ASSISTS,
    COL_PASSES_COMPLETED,
    COL_PASS_ACCURACY,
    COL_SHOT_ACCURACY,
    COL_TACKLES_WON,
];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "Player_Name")]
    pub name: String,
    #[serde(rename = "Club")]
    pub club: String,
    #[serde(rename = "Position")]
    pub position: Position,
    #[serde(rename = "Rating")]
    pub rating: Option<f64>,
    #[serde(rename = "Goals")]
    pub goals: u32,
    #[serde(rename = "Assists")]
    pub assists: u32,
    #[serde(rename = "Passes_Completed")]
    pub passes_completed: u32,
    #[serde(rename = "Pass_Accuracy")]
    pub pass_accuracy: f64,
    #[serde(rename = "Shot_Accuracy")]
    pub shot_accuracy: f64,
    #[serde(rename = "Tackles_Won")]
    pub tackles_won: u32,
}

/// The batch that survived ingest, alongside the number of rows dropped for
/// failing coercion.
#[derive(Debug)]
pub struct Loaded {
    pub records: Vec<PlayerRecord>,
    pub dropped: usize,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("data source unavailable: {0}")]
    DataUnavailable(#[source] csv::Error),

    #[error("{0}")]
    InvalidColumn(#[from] InvalidColumn),

    #[error("{0}")]
    EmptyBatch(#[from] EmptyBatch),
}

#[derive(Debug, Error)]
pub enum InvalidColumn {
    #[error("required column {0} is missing")]
    Missing(&'static str),

    #[error("column {0} is entirely non-numeric")]
    NonNumeric(&'static str),
}

#[derive(Debug, Error)]
#[error("no records remain in the batch")]
pub struct EmptyBatch;

/// Reads a player dataset from a CSV file at the given `path`.
///
/// The header must carry every required column. Individual rows whose numeric
/// cells do not coerce are dropped; if a numeric column coerces on no row at
/// all, the column itself is reported as invalid.
pub fn read_from_file(path: impl AsRef<Path>) -> Result<Loaded, DataError> {
    let reader = csv::Reader::from_path(path).map_err(DataError::DataUnavailable)?;
    read_rows(reader)
}

fn read_rows<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Loaded, DataError> {
    let headers = reader.headers().map_err(DataError::DataUnavailable)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(InvalidColumn::Missing(column).into());
        }
    }
    let column_index = |column: &str| {
        headers
            .iter()
            .position(|header| header == column)
            .expect("required column was checked against the header")
    };
    let rating_index = headers.iter().position(|header| header == COL_RATING);

    let mut records = vec![];
    let mut rows = 0;
    let mut coercion_failures = [0_usize; NUMERIC_COLUMNS.len()];
    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(DataError::DataUnavailable(err)),
            Err(_) => {
                rows += 1;
                continue;
            }
        };
        rows += 1;

        let cell = |column: &str| row.get(column_index(column)).unwrap_or("").trim();
        let mut numeric = [0.0; NUMERIC_COLUMNS.len()];
        let mut coercible = true;
        for (ordinal, &column) in NUMERIC_COLUMNS.iter().enumerate() {
            match cell(column).parse::<f64>() {
                Ok(value) => numeric[ordinal] = value,
                Err(_) => {
                    coercion_failures[ordinal] += 1;
                    coercible = false;
                }
            }
        }
        let Ok(position) = Position::from_str(cell(COL_POSITION)) else {
            continue;
        };
        if !coercible {
            continue;
        }
        let rating = match rating_index.and_then(|index| row.get(index)).map(str::trim) {
            None | Some("") => None,
            Some(value) => match value.parse::<f64>() {
                Ok(rating) => Some(rating),
                Err(_) => continue,
            },
        };
        let [goals, assists, passes_completed, pass_accuracy, shot_accuracy, tackles_won] = numeric;
        records.push(PlayerRecord {
            name: cell(COL_NAME).to_string(),
            club: cell(COL_CLUB).to_string(),
            position,
            rating,
            goals: count(goals),
            assists: count(assists),
            passes_completed: count(passes_completed),
            pass_accuracy,
            shot_accuracy,
            tackles_won: count(tackles_won),
        });
    }

    if rows > 0 {
        for (ordinal, &column) in NUMERIC_COLUMNS.iter().enumerate() {
            if coercion_failures[ordinal] == rows {
                return Err(InvalidColumn::NonNumeric(column).into());
            }
        }
    }
    if records.is_empty() {
        return Err(EmptyBatch.into());
    }
    let dropped = rows - records.len();
    Ok(Loaded { records, dropped })
}

// count columns coerce through f64; fractional values round to the nearest whole
fn count(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

/// Writes a player dataset as CSV, headers included.
pub fn write_to_file(path: impl AsRef<Path>, records: &[PlayerRecord]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path).map_err(DataError::DataUnavailable)?;
    for record in records {
        writer.serialize(record).map_err(DataError::DataUnavailable)?;
    }
    writer
        .flush()
        .map_err(|err| DataError::DataUnavailable(err.into()))?;
    Ok(())
}

/// Extracts the dataset's rating column, failing if any record lacks one.
pub fn ratings(records: &[PlayerRecord]) -> Result<Vec<f64>, InvalidColumn> {
    records
        .iter()
        .map(|record| record.rating.ok_or(InvalidColumn::Missing(COL_RATING)))
        .collect()
}

/// Retains only the records belonging to the given club (case-insensitive).
pub fn filter_by_club(
    records: Vec<PlayerRecord>,
    club: &str,
) -> Result<Vec<PlayerRecord>, EmptyBatch> {
    let records: Vec<_> = records
        .into_iter()
        .filter(|record| record.club.eq_ignore_ascii_case(club))
        .collect();
    if records.is_empty() {
        return Err(EmptyBatch);
    }
    Ok(records)
}

#[cfg(test)]
mod tests;
