//! Weights proportional to how widely each criterion spreads the alternatives.

use crate::matrix::normalize::{self, extremes, safe_div};
use crate::matrix::stats::{
    mean_absolute_deviation as mad, normalize_or_equal, pairwise_absolute_deviation,
    population_std, population_variance,
};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::weighting::MethodWeights;

pub fn standard_deviation(matrix: &DecisionMatrix) -> MethodWeights {
    spread(matrix, shares(matrix), population_std, "standardDeviations")
}

pub fn variance(matrix: &DecisionMatrix) -> MethodWeights {
    spread(matrix, shares(matrix), population_variance, "variances")
}

pub fn mean_absolute_deviation(matrix: &DecisionMatrix) -> MethodWeights {
    spread(matrix, shares(matrix), mad, "meanAbsoluteDeviations")
}

/// DBW: total pairwise distance between alternatives on each criterion.
pub fn distance_based(matrix: &DecisionMatrix) -> MethodWeights {
    spread(
        matrix,
        shares(matrix),
        pairwise_absolute_deviation,
        "distances",
    )
}

/// SVP: variance of the min-max normalized column.
pub fn statistical_variance(matrix: &DecisionMatrix) -> MethodWeights {
    spread(
        matrix,
        normalize::range(matrix, 1.0),
        population_variance,
        "variances",
    )
}

/// `x / sum x` regardless of criterion direction; a column summing to zero is
/// spread evenly over the alternatives.
fn shares(matrix: &DecisionMatrix) -> Vec<Vec<f64>> {
    let uniform = 1.0 / matrix.alternative_count() as f64;
    let mut normalized = normalize::proportion(matrix);
    for j in 0..matrix.criterion_count() {
        if matrix.column(j).iter().sum::<f64>() <= 0.0 {
            for row in &mut normalized {
                row[j] = uniform;
            }
        }
    }
    normalized
}

fn spread(
    matrix: &DecisionMatrix,
    normalized: Vec<Vec<f64>>,
    measure: fn(&[f64]) -> f64,
    name: &str,
) -> MethodWeights {
    let values: Vec<f64> = (0..matrix.criterion_count())
        .map(|j| measure(&normalize::column(&normalized, j)))
        .collect();
    let weights = normalize_or_equal(&values);

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector(name, &criteria, &values);
    MethodWeights { weights, metrics }
}

/// WENSLO in its published envelope/slope form: `q_j = E_j / tan_j`, where `E_j` is
/// the polyline length over the ascending sum-normalized column with horizontal
/// step `dx_j` and `tan_j` the column total over `(m - 1) dx_j`. This is not the
/// simplified variant that sums min-max normalized values.
pub fn wenslo(matrix: &DecisionMatrix) -> MethodWeights {
    let normalized = normalize::sum(matrix);
    let m = matrix.alternative_count() as f64;
    let classes = 1.0 + 3.322 * m.log10();

    let n = matrix.criterion_count();
    let mut intervals = Vec::with_capacity(n);
    let mut envelopes = Vec::with_capacity(n);
    let mut slopes = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for j in 0..n {
        let mut column = normalize::column(&normalized, j);
        column.sort_by(|a, b| a.total_cmp(b));
        let (min, max) = extremes(&column);
        let dx = (max - min) / classes;
        let (envelope, slope) = if dx > 0.0 {
            let envelope: f64 = column
                .windows(2)
                .map(|pair| ((pair[1] - pair[0]).powi(2) + dx * dx).sqrt())
                .sum();
            let slope = column.iter().sum::<f64>() / ((m - 1.0) * dx);
            (envelope, slope)
        } else {
            (0.0, 0.0)
        };
        intervals.push(dx);
        envelopes.push(envelope);
        slopes.push(slope);
        values.push(safe_div(envelope, slope));
    }
    let weights = normalize_or_equal(&values);

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("classIntervals", &criteria, &intervals);
    metrics.vector("envelopes", &criteria, &envelopes);
    metrics.vector("slopes", &criteria, &slopes);
    metrics.vector("wensloValues", &criteria, &values);
    MethodWeights { weights, metrics }
}
