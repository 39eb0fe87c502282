//! Column normalizations. Rows are alternatives, columns follow the criteria order.

use crate::matrix::DecisionMatrix;

/// Floor used where a formula takes a logarithm or a reciprocal of a value that may be 0.
pub const EPSILON: f64 = 1e-12;

pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && denominator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

/// Returns `(min, max)` of a column; `(0, 0)` for an empty one.
pub fn extremes(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

/// `x / max` for beneficial, `min / x` for non-beneficial criteria.
pub fn linear(matrix: &DecisionMatrix) -> Vec<Vec<f64>> {
    map_columns(matrix, |column, beneficial| {
        let (min, max) = extremes(column);
        column
            .iter()
            .map(|x| {
                if beneficial {
                    safe_div(*x, max)
                } else {
                    safe_div(min, *x)
                }
            })
            .collect()
    })
}

/// `x / sqrt(sum x^2)`, direction-agnostic.
pub fn vector(matrix: &DecisionMatrix) -> Vec<Vec<f64>> {
    map_columns(matrix, |column, _| {
        let norm = column.iter().map(|x| x * x).sum::<f64>().sqrt();
        column.iter().map(|x| safe_div(*x, norm)).collect()
    })
}

/// `x / sum x` for beneficial, `(1/x) / sum(1/x)` for non-beneficial criteria.
/// A zero in a non-beneficial column contributes 0.
pub fn sum(matrix: &DecisionMatrix) -> Vec<Vec<f64>> {
    map_columns(matrix, |column, beneficial| {
        if beneficial {
            share(column)
        } else {
            let reciprocals = column
                .iter()
                .map(|x| if *x > 0.0 { 1.0 / x } else { 0.0 })
                .collect::<Vec<_>>();
            share(&reciprocals)
        }
    })
}

/// `x / sum x` regardless of direction.
pub fn proportion(matrix: &DecisionMatrix) -> Vec<Vec<f64>> {
    map_columns(matrix, |column, _| share(column))
}

/// Min-max range normalization onto `[0, 1]`, 1 being the best value.
/// Columns with no spread take `degenerate`.
pub fn range(matrix: &DecisionMatrix, degenerate: f64) -> Vec<Vec<f64>> {
    map_columns(matrix, |column, beneficial| {
        let (min, max) = extremes(column);
        let spread = max - min;
        column
            .iter()
            .map(|x| {
                if spread <= 0.0 {
                    degenerate
                } else if beneficial {
                    (x - min) / spread
                } else {
                    (max - x) / spread
                }
            })
            .collect()
    })
}

pub fn share(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    values.iter().map(|v| safe_div(*v, total)).collect()
}

pub fn weighted(normalized: &[Vec<f64>], weights: &[f64]) -> Vec<Vec<f64>> {
    normalized
        .iter()
        .map(|row| row.iter().zip(weights).map(|(r, w)| r * w).collect())
        .collect()
}

pub fn column(rows: &[Vec<f64>], j: usize) -> Vec<f64> {
    rows.iter().map(|row| row[j]).collect()
}

fn map_columns<F>(matrix: &DecisionMatrix, normalize: F) -> Vec<Vec<f64>>
where
    F: Fn(&[f64], bool) -> Vec<f64>,
{
    let m = matrix.alternative_count();
    let mut out = vec![vec![0.0; matrix.criterion_count()]; m];
    for j in 0..matrix.criterion_count() {
        let normalized = normalize(&matrix.column(j), matrix.is_beneficial(j));
        for (i, value) in normalized.into_iter().enumerate() {
            out[i][j] = value;
        }
    }
    out
}
