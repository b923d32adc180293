//! Batch summary analytics: grouped performance summaries, descriptive
//! statistics and correlation between stat columns.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::data::{EmptyBatch, PlayerRecord};
use crate::linear::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
}

/// Descriptive statistics over a sequence of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

pub fn describe(values: &[f64]) -> Result<Describe, EmptyBatch> {
    if values.is_empty() {
        return Err(EmptyBatch);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(Describe {
        count: values.len(),
        mean: mean(values),
        std: stdev(values),
        min,
        median: median(values),
        max,
    })
}

/// A per-group (club or position) performance summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub players: usize,
    pub mean_score: f64,
    pub median_score: f64,
    pub std_score: f64,
    pub total_goals: u32,
    pub mean_goals: f64,
    pub total_assists: u32,
    pub mean_assists: f64,
    pub mean_pass_accuracy: f64,
    pub mean_shot_accuracy: f64,
    /// Standard score of this group's mean performance across all groups.
    pub z_score: f64,
}

/// Summarises performance scores per club, alphabetically. The z-score column
/// compares each club's mean score against the other clubs.
pub fn club_summaries(
    records: &[PlayerRecord],
    scores: &[f64],
) -> Result<Vec<GroupSummary>, EmptyBatch> {
    summarise(records, scores, |record| record.club.clone())
}

/// Summarises performance scores per position, alphabetically.
pub fn position_summaries(
    records: &[PlayerRecord],
    scores: &[f64],
) -> Result<Vec<GroupSummary>, EmptyBatch> {
    summarise(records, scores, |record| record.position.to_string())
}

fn summarise(
    records: &[PlayerRecord],
    scores: &[f64],
    key_of: impl Fn(&PlayerRecord) -> String,
) -> Result<Vec<GroupSummary>, EmptyBatch> {
    assert_eq!(
        records.len(),
        scores.len(),
        "{} records against {} scores",
        records.len(),
        scores.len()
    );
    if records.is_empty() {
        return Err(EmptyBatch);
    }
    let mut groups: FxHashMap<String, Vec<usize>> = FxHashMap::default();
    for (row, record) in records.iter().enumerate() {
        groups.entry(key_of(record)).or_default().push(row);
    }
    let mut keys: Vec<_> = groups.keys().cloned().collect();
    keys.sort();

    let mut summaries: Vec<_> = keys
        .into_iter()
        .map(|key| {
            let rows = &groups[&key];
            let group_scores: Vec<_> = rows.iter().map(|&row| scores[row]).collect();
            let group_records: Vec<_> = rows.iter().map(|&row| &records[row]).collect();
            let mean_of = |extract: fn(&PlayerRecord) -> f64| {
                group_records.iter().map(|record| extract(record)).sum::<f64>()
                    / group_records.len() as f64
            };
            GroupSummary {
                players: rows.len(),
                mean_score: mean(&group_scores),
                median_score: median(&group_scores),
                std_score: stdev(&group_scores),
                total_goals: group_records.iter().map(|record| record.goals).sum(),
                mean_goals: mean_of(|record| record.goals as f64),
                total_assists: group_records.iter().map(|record| record.assists).sum(),
                mean_assists: mean_of(|record| record.assists as f64),
                mean_pass_accuracy: mean_of(|record| record.pass_accuracy),
                mean_shot_accuracy: mean_of(|record| record.shot_accuracy),
                z_score: 0.0,
                key,
            }
        })
        .collect();

    let group_means: Vec<_> = summaries.iter().map(|summary| summary.mean_score).collect();
    let (centre, spread) = (mean(&group_means), stdev(&group_means));
    for summary in &mut summaries {
        summary.z_score = if spread == 0.0 {
            0.0
        } else {
            (summary.mean_score - centre) / spread
        };
    }
    Ok(summaries)
}

/// Pearson product-moment correlation, 0 when either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    assert_eq!(
        xs.len(),
        ys.len(),
        "series lengths do not match: {} ≠ {}",
        xs.len(),
        ys.len()
    );
    let (mean_x, mean_y) = (mean(xs), mean(ys));
    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        covariance += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    covariance / (var_x.sqrt() * var_y.sqrt())
}

/// Spearman rank correlation: Pearson over average ranks.
pub fn spearman(xs: &[f64], ys: &[f64]) -> f64 {
    pearson(&average_ranks(xs), &average_ranks(ys))
}

/// Pairwise correlation of the matrix's columns. Zero-variance columns
/// correlate at 0, including with themselves.
pub fn correlation_matrix(matrix: &Matrix, method: CorrelationMethod) -> Matrix {
    let columns: Vec<Vec<f64>> = (0..matrix.cols())
        .map(|col| (0..matrix.rows()).map(|row| matrix[(row, col)]).collect())
        .collect();
    let mut correlations = Matrix::allocate(matrix.cols(), matrix.cols());
    for a in 0..matrix.cols() {
        for b in a..matrix.cols() {
            let correlation = match method {
                CorrelationMethod::Pearson => pearson(&columns[a], &columns[b]),
                CorrelationMethod::Spearman => spearman(&columns[a], &columns[b]),
            };
            correlations[(a, b)] = correlation;
            correlations[(b, a)] = correlation;
        }
    }
    correlations
}

// ascending 1-based ranks; ties share the average of their rank run
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<_> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + 1 + end + 1) as f64 / 2.0;
        for &index in &order[start..=end] {
            ranks[index] = rank;
        }
        start = end + 1;
    }
    ranks
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// population standard deviation
fn stdev(values: &[f64]) -> f64 {
    let centre = mean(values);
    (values.iter().map(|value| (value - centre).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;
    use crate::data::Position;
    use crate::testing::assert_slice_f64_relative;

    fn record(club: &str, position: Position, goals: u32, assists: u32) -> PlayerRecord {
        PlayerRecord {
            name: "Test".to_string(),
            club: club.to_string(),
            position,
            rating: None,
            goals,
            assists,
            passes_completed: 200,
            pass_accuracy: 80.0,
            shot_accuracy: 60.0,
            tackles_won: 30,
        }
    }

    #[test]
    fn describes_a_batch() {
        let stats = describe(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(4, stats.count);
        assert_float_absolute_eq!(2.5, stats.mean, 1e-9);
        assert_float_absolute_eq!(2.5, stats.median, 1e-9);
        assert_eq!(1.0, stats.min);
        assert_eq!(4.0, stats.max);
        assert_float_absolute_eq!((1.25_f64).sqrt(), stats.std, 1e-9);
        assert!(describe(&[]).is_err());
    }

    #[test]
    fn summarises_clubs_alphabetically() {
        let records = vec![
            record("Liverpool", Position::Forward, 10, 4),
            record("Arsenal", Position::Midfielder, 6, 8),
            record("Liverpool", Position::Defender, 2, 2),
        ];
        let scores = vec![80.0, 70.0, 60.0];
        let summaries = club_summaries(&records, &scores).unwrap();
        assert_eq!(2, summaries.len());

        let arsenal = &summaries[0];
        assert_eq!("Arsenal", arsenal.key);
        assert_eq!(1, arsenal.players);
        assert_float_absolute_eq!(70.0, arsenal.mean_score, 1e-9);

        let liverpool = &summaries[1];
        assert_eq!("Liverpool", liverpool.key);
        assert_eq!(2, liverpool.players);
        assert_float_absolute_eq!(70.0, liverpool.mean_score, 1e-9);
        assert_float_absolute_eq!(70.0, liverpool.median_score, 1e-9);
        assert_eq!(12, liverpool.total_goals);
        assert_float_absolute_eq!(6.0, liverpool.mean_goals, 1e-9);
        assert_eq!(6, liverpool.total_assists);

        // both clubs share the mean score, hence zero spread and zero z-scores
        assert_eq!(0.0, arsenal.z_score);
        assert_eq!(0.0, liverpool.z_score);
    }

    #[test]
    fn club_z_scores_compare_means() {
        let records = vec![
            record("Arsenal", Position::Forward, 1, 1),
            record("Liverpool", Position::Forward, 1, 1),
        ];
        let summaries = club_summaries(&records, &[90.0, 70.0]).unwrap();
        assert_float_absolute_eq!(1.0, summaries[0].z_score, 1e-9);
        assert_float_absolute_eq!(-1.0, summaries[1].z_score, 1e-9);
    }

    #[test]
    fn summarises_positions() {
        let records = vec![
            record("Arsenal", Position::Forward, 10, 2),
            record("Arsenal", Position::Goalkeeper, 0, 0),
        ];
        let summaries = position_summaries(&records, &[75.0, 55.0]).unwrap();
        assert_eq!("Forward", summaries[0].key);
        assert_eq!("Goalkeeper", summaries[1].key);
    }

    #[test]
    fn empty_batch_fails_fast() {
        assert!(club_summaries(&[], &[]).is_err());
    }

    #[test]
    fn pearson_of_linear_series_is_one() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [3.0, 5.0, 7.0, 9.0];
        assert_float_absolute_eq!(1.0, pearson(&xs, &ys), 1e-9);
        assert_float_absolute_eq!(-1.0, pearson(&xs, &[9.0, 7.0, 5.0, 3.0]), 1e-9);
    }

    #[test]
    fn pearson_without_variance_is_zero() {
        assert_eq!(0.0, pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]));
    }

    #[test]
    fn spearman_tracks_monotonic_series() {
        // monotonic but non-linear: rank correlation is exactly 1
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [1.0, 4.0, 9.0, 16.0];
        assert_float_absolute_eq!(1.0, spearman(&xs, &ys), 1e-9);
        assert!(pearson(&xs, &ys) < 1.0);
    }

    #[test]
    fn average_ranks_share_ties() {
        assert_slice_f64_relative(&[1.0, 2.5, 2.5, 4.0], &average_ranks(&[1.0, 5.0, 5.0, 9.0]), 1e-9);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let mut matrix = Matrix::allocate(4, 2);
        matrix
            .flatten_mut()
            .clone_from_slice(&[1.0, 2.0, 2.0, 4.0, 3.0, 6.0, 4.0, 8.0]);
        let correlations = correlation_matrix(&matrix, CorrelationMethod::Pearson);
        assert_float_absolute_eq!(1.0, correlations[(0, 0)], 1e-9);
        assert_float_absolute_eq!(1.0, correlations[(1, 1)], 1e-9);
        assert_float_absolute_eq!(correlations[(0, 1)], correlations[(1, 0)], 1e-12);
        assert_float_absolute_eq!(1.0, correlations[(0, 1)], 1e-9);
    }
}
