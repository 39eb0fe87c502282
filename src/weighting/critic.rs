use crate::matrix::normalize::{self, range};
use crate::matrix::stats::{correlation_matrix, normalize_or_equal, population_std};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::weighting::MethodWeights;

/// CRITIC: contrast intensity times conflict with the other criteria.
pub fn critic(matrix: &DecisionMatrix) -> MethodWeights {
    let normalized = range(matrix, 0.0);
    let n = matrix.criterion_count();
    let columns: Vec<Vec<f64>> = (0..n).map(|j| normalize::column(&normalized, j)).collect();

    let deviations: Vec<f64> = columns.iter().map(|c| population_std(c)).collect();
    let correlations = correlation_matrix(&columns);
    let information: Vec<f64> = (0..n)
        .map(|j| deviations[j] * correlations[j].iter().map(|r| 1.0 - r).sum::<f64>())
        .collect();
    let weights = normalize_or_equal(&information);

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("standardDeviations", &criteria, &deviations);
    metrics.table("correlationMatrix", &criteria, &criteria, &correlations);
    metrics.vector("informationContent", &criteria, &information);
    MethodWeights { weights, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::matrix;
    use crate::matrix::CriterionType::Beneficial as B;

    #[test]
    fn redundant_criteria_share_weight_with_independent_one() {
        // C1 and C2 move together, C3 moves against them
        let m = matrix(
            &[&[1.0, 2.0, 9.0], &[2.0, 4.0, 5.0], &[3.0, 6.0, 1.0]],
            &[B, B, B],
            &[0.3, 0.3, 0.4],
        );
        let out = critic(&m);
        assert!((out.weights[0] - out.weights[1]).abs() < 1e-12);
        assert!(out.weights[2] > out.weights[0]);
        let r = out
            .metrics
            .table_value("correlationMatrix", "C1", "C2")
            .expect("correlation");
        assert!((r - 1.0).abs() < 1e-12);
    }
}
