//! The similarity ranker: cosine similarity between a query record's feature
//! vector and every other record in the batch.

use thiserror::Error;

use crate::data::PlayerRecord;
use crate::linear::Matrix;

/// The cosine of the angle between two vectors, defined as 0 when either
/// vector has zero norm.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "vector lengths do not match: {} ≠ {}",
        a.len(),
        b.len()
    );
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no record matches name {0:?}")]
    RecordNotFound(String),

    #[error("name {name:?} is ambiguous, matching rows {rows:?}")]
    AmbiguousRecord { name: String, rows: Vec<usize> },
}

/// Resolves a player name to exactly one row index. Duplicate names must be
/// disambiguated by row index instead.
pub fn resolve(records: &[PlayerRecord], name: &str) -> Result<usize, ResolveError> {
    let rows: Vec<_> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.name == name)
        .map(|(row, _)| row)
        .collect();
    match rows.as_slice() {
        [] => Err(ResolveError::RecordNotFound(name.to_string())),
        [row] => Ok(*row),
        _ => Err(ResolveError::AmbiguousRecord {
            name: name.to_string(),
            rows,
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Neighbour {
    pub row: usize,
    pub similarity: f64,
}

/// Ranks every other row by descending cosine similarity to the query row,
/// excluding the query itself, and returns the top `top_n`. Ties preserve the
/// original row order.
pub fn rank(matrix: &Matrix, query: usize, top_n: usize) -> Vec<Neighbour> {
    assert!(
        query < matrix.rows(),
        "invalid query row {query} for a batch of {}",
        matrix.rows()
    );
    let query_row = matrix.row_slice(query);
    let mut neighbours: Vec<_> = (0..matrix.rows())
        .filter(|&row| row != query)
        .map(|row| Neighbour {
            row,
            similarity: cosine(query_row, matrix.row_slice(row)),
        })
        .collect();
    neighbours.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    neighbours.truncate(top_n);
    neighbours
}
