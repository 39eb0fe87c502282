//! Gap and border-area rankings: MAIRCA, MABAC, MARCOS.

use crate::matrix::normalize::{self, extremes, safe_div, EPSILON};
use crate::matrix::stats::geometric_mean;
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::MethodScores;

/// Total gap between theoretical and real ratings, with equal a priori preference `1/m`.
/// Lower is better.
pub fn mairca(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::range(matrix, 0.0);
    let preference = 1.0 / matrix.alternative_count() as f64;
    let theoretical: Vec<f64> = matrix.weights().iter().map(|w| preference * w).collect();

    let real: Vec<Vec<f64>> = normalized
        .iter()
        .map(|row| row.iter().zip(&theoretical).map(|(r, t)| t * r).collect())
        .collect();
    let gaps: Vec<Vec<f64>> = real
        .iter()
        .map(|row| row.iter().zip(&theoretical).map(|(r, t)| t - r).collect())
        .collect();
    let scores: Vec<f64> = gaps.iter().map(|row| row.iter().sum()).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("theoreticalRatings", &criteria, &theoretical);
    metrics.table("realRatings", &alternatives, &criteria, &real);
    metrics.table("gapMatrix", &alternatives, &criteria, &gaps);
    metrics.vector("totalGaps", &alternatives, &scores);
    MethodScores { scores, metrics }
}

/// Sum of distances from the border approximation area (column geometric mean).
pub fn mabac(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::range(matrix, 0.0);
    let weights = matrix.weights();
    let weighted: Vec<Vec<f64>> = normalized
        .iter()
        .map(|row| row.iter().zip(&weights).map(|(r, w)| w * (r + 1.0)).collect())
        .collect();
    let border: Vec<f64> = (0..matrix.criterion_count())
        .map(|j| geometric_mean(&normalize::column(&weighted, j), EPSILON))
        .collect();
    let distances: Vec<Vec<f64>> = weighted
        .iter()
        .map(|row| row.iter().zip(&border).map(|(v, g)| v - g).collect())
        .collect();
    let scores: Vec<f64> = distances.iter().map(|row| row.iter().sum()).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    metrics.vector("borderApproximationArea", &criteria, &border);
    metrics.table("distanceMatrix", &alternatives, &criteria, &distances);
    MethodScores { scores, metrics }
}

/// Utility degrees relative to the ideal and anti-ideal solutions.
pub fn marcos(matrix: &DecisionMatrix) -> MethodScores {
    let n = matrix.criterion_count();
    let weights = matrix.weights();
    let mut ideal = Vec::with_capacity(n);
    let mut anti_ideal = Vec::with_capacity(n);
    let mut ideal_row = Vec::with_capacity(n);
    let mut anti_row = Vec::with_capacity(n);
    for j in 0..n {
        let (min, max) = extremes(&matrix.column(j));
        let ratio = |x: f64| {
            if matrix.is_beneficial(j) {
                safe_div(x, max)
            } else {
                safe_div(min, x)
            }
        };
        let (best, worst) = if matrix.is_beneficial(j) { (max, min) } else { (min, max) };
        ideal.push(best);
        anti_ideal.push(worst);
        ideal_row.push(weights[j] * ratio(best));
        anti_row.push(weights[j] * ratio(worst));
    }

    let normalized = normalize::linear(matrix);
    let weighted = normalize::weighted(&normalized, &weights);
    let s_ideal: f64 = ideal_row.iter().sum();
    let s_anti: f64 = anti_row.iter().sum();
    let sums: Vec<f64> = weighted.iter().map(|row| row.iter().sum()).collect();

    let m = matrix.alternative_count();
    let mut k_minus = Vec::with_capacity(m);
    let mut k_plus = Vec::with_capacity(m);
    let mut scores = Vec::with_capacity(m);
    for s in &sums {
        let km = safe_div(*s, s_anti);
        let kp = safe_div(*s, s_ideal);
        let total = km + kp;
        let f_minus = safe_div(kp, total);
        let f_plus = safe_div(km, total);
        let utility = if f_minus > 0.0 && f_plus > 0.0 {
            total / (1.0 + (1.0 - f_plus) / f_plus + (1.0 - f_minus) / f_minus)
        } else {
            0.0
        };
        k_minus.push(km);
        k_plus.push(kp);
        scores.push(utility);
    }

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.vector("idealSolution", &criteria, &ideal);
    metrics.vector("antiIdealSolution", &criteria, &anti_ideal);
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    metrics.vector("kMinus", &alternatives, &k_minus);
    metrics.vector("kPlus", &alternatives, &k_plus);
    metrics.vector("utilityDegrees", &alternatives, &scores);
    MethodScores { scores, metrics }
}
