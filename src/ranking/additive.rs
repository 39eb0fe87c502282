//! Weighted sum and weighted product models.

use crate::matrix::normalize::{self, EPSILON};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::MethodScores;

pub fn wsm(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::linear(matrix);
    let weighted = normalize::weighted(&normalized, &matrix.weights());
    let scores: Vec<f64> = weighted.iter().map(|row| row.iter().sum()).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    MethodScores { scores, metrics }
}

/// Zero normalized values are floored before exponentiation.
pub fn wpm(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::linear(matrix);
    let weights = matrix.weights();
    let terms: Vec<Vec<f64>> = normalized
        .iter()
        .map(|row| {
            row.iter()
                .zip(&weights)
                .map(|(r, w)| r.max(EPSILON).powf(*w))
                .collect()
        })
        .collect();
    let scores: Vec<f64> = terms.iter().map(|row| row.iter().product()).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedProductMatrix", &alternatives, &criteria, &terms);
    MethodScores { scores, metrics }
}

/// `Q = lambda * WSM + (1 - lambda) * WPM`.
pub fn waspas(matrix: &DecisionMatrix, lambda: f64) -> MethodScores {
    let sum = wsm(matrix);
    let product = wpm(matrix);
    let scores: Vec<f64> = sum
        .scores
        .iter()
        .zip(&product.scores)
        .map(|(s, p)| lambda * s + (1.0 - lambda) * p)
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let normalized = normalize::linear(matrix);
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("wsmScores", &alternatives, &sum.scores);
    metrics.vector("wpmScores", &alternatives, &product.scores);
    metrics.scalar("lambda", lambda);
    MethodScores { scores, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::{matrix, suppliers};
    use crate::matrix::CriterionType::{Beneficial as B, NonBeneficial as N};

    #[test]
    fn wsm_adds_weighted_linear_scores() {
        let m = matrix(&[&[10.0, 2.0], &[5.0, 4.0]], &[B, N], &[0.6, 0.4]);
        let out = wsm(&m);
        assert!((out.scores[0] - 1.0).abs() < 1e-12);
        assert!((out.scores[1] - (0.6 * 0.5 + 0.4 * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn wpm_multiplies_powered_ratios() {
        let m = matrix(&[&[4.0, 1.0], &[1.0, 1.0]], &[B, B], &[0.5, 0.5]);
        let out = wpm(&m);
        assert!((out.scores[0] - 1.0).abs() < 1e-12);
        assert!((out.scores[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn waspas_interpolates_between_models() {
        let m = suppliers();
        let sum = wsm(&m);
        let product = wpm(&m);
        let pure_sum = waspas(&m, 1.0);
        let pure_product = waspas(&m, 0.0);
        for i in 0..m.alternative_count() {
            assert!((pure_sum.scores[i] - sum.scores[i]).abs() < 1e-12);
            assert!((pure_product.scores[i] - product.scores[i]).abs() < 1e-12);
        }
        assert_eq!(waspas(&m, 0.5).metrics.scalar_value("lambda"), Some(0.5));
    }
}
