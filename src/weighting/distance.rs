//! Distance-to-reference weighting on the vector-normalized matrix.

use crate::matrix::normalize::{self, extremes, vector};
use crate::matrix::stats::{correlation_matrix, normalize_or_equal, pairwise_absolute_deviation};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::weighting::MethodWeights;

/// MDM: maximizing deviation between alternatives.
pub fn mdm(matrix: &DecisionMatrix) -> MethodWeights {
    let normalized = vector(matrix);
    let deviations: Vec<f64> = columns(&normalized, matrix)
        .iter()
        .map(|c| pairwise_absolute_deviation(c))
        .collect();
    finish(matrix, &normalized, &[("deviations", &deviations)], &deviations)
}

/// LSW: squared distance from the ideal value.
pub fn lsw(matrix: &DecisionMatrix) -> MethodWeights {
    reference_distance(matrix, true, |d| d * d, "squaredDistances")
}

/// GPOW: absolute deviation from the goal (ideal) value.
pub fn gpow(matrix: &DecisionMatrix) -> MethodWeights {
    reference_distance(matrix, true, f64::abs, "goalDeviations")
}

/// LPWM: absolute deviation from the anti-ideal value.
pub fn lpwm(matrix: &DecisionMatrix) -> MethodWeights {
    reference_distance(matrix, false, f64::abs, "antiIdealDeviations")
}

/// PCWM: independence `sum_k (1 - r_jk)` from the other criteria.
pub fn pcwm(matrix: &DecisionMatrix) -> MethodWeights {
    let normalized = vector(matrix);
    let correlations = correlation_matrix(&columns(&normalized, matrix));
    let independence: Vec<f64> = correlations
        .iter()
        .map(|row| row.iter().map(|r| 1.0 - r).sum())
        .collect();

    let mut out = finish(
        matrix,
        &normalized,
        &[("independence", &independence)],
        &independence,
    );
    let criteria = matrix.criterion_ids();
    out.metrics
        .table("correlationMatrix", &criteria, &criteria, &correlations);
    out
}

fn reference_distance(
    matrix: &DecisionMatrix,
    ideal: bool,
    distance: fn(f64) -> f64,
    name: &str,
) -> MethodWeights {
    let normalized = vector(matrix);
    let mut references = Vec::with_capacity(matrix.criterion_count());
    let mut totals = Vec::with_capacity(matrix.criterion_count());
    for (j, column) in columns(&normalized, matrix).iter().enumerate() {
        let (min, max) = extremes(column);
        let reference = if ideal == matrix.is_beneficial(j) { max } else { min };
        references.push(reference);
        totals.push(column.iter().map(|v| distance(v - reference)).sum());
    }
    let label = if ideal { "idealValues" } else { "antiIdealValues" };
    finish(
        matrix,
        &normalized,
        &[(label, &references), (name, &totals)],
        &totals,
    )
}

fn columns(normalized: &[Vec<f64>], matrix: &DecisionMatrix) -> Vec<Vec<f64>> {
    (0..matrix.criterion_count())
        .map(|j| normalize::column(normalized, j))
        .collect()
}

fn finish(
    matrix: &DecisionMatrix,
    normalized: &[Vec<f64>],
    vectors: &[(&str, &Vec<f64>)],
    scores: &[f64],
) -> MethodWeights {
    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, normalized);
    for (name, values) in vectors {
        metrics.vector(name, &criteria, values);
    }
    MethodWeights {
        weights: normalize_or_equal(scores),
        metrics,
    }
}
