use crate::matrix::normalize::{extremes, EPSILON};
use crate::matrix::stats::normalize_or_equal;
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::weighting::MethodWeights;

/// MEREC: weight by the change in overall performance when a criterion is removed.
pub fn merec(matrix: &DecisionMatrix) -> MethodWeights {
    let m = matrix.alternative_count();
    let n = matrix.criterion_count();

    let mut normalized = vec![vec![0.0; n]; m];
    for j in 0..n {
        let column = matrix.column(j);
        let (min, max) = extremes(&column);
        for (i, x) in column.iter().enumerate() {
            let value = if matrix.is_beneficial(j) {
                if *x > 0.0 {
                    min / x
                } else {
                    1.0
                }
            } else if max > 0.0 {
                x / max
            } else {
                1.0
            };
            normalized[i][j] = value.max(EPSILON);
        }
    }

    let logs: Vec<Vec<f64>> = normalized
        .iter()
        .map(|row| row.iter().map(|v| v.ln().abs()).collect())
        .collect();
    let overall: Vec<f64> = logs
        .iter()
        .map(|row| (1.0 + row.iter().sum::<f64>() / n as f64).ln())
        .collect();

    let mut removed = vec![vec![0.0; n]; m];
    let mut effects = vec![0.0; n];
    for (i, row) in logs.iter().enumerate() {
        let total: f64 = row.iter().sum();
        for k in 0..n {
            let s = (1.0 + (total - row[k]) / n as f64).ln();
            removed[i][k] = s;
            effects[k] += ((overall[i] + EPSILON) / (s + EPSILON)).ln().abs();
        }
    }
    let weights = normalize_or_equal(&effects);

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("overallPerformance", &alternatives, &overall);
    metrics.table("removalPerformance", &alternatives, &criteria, &removed);
    metrics.vector("removalEffects", &criteria, &effects);
    MethodWeights { weights, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::matrix;
    use crate::matrix::CriterionType::{Beneficial as B, NonBeneficial as N};

    #[test]
    fn criterion_without_spread_has_no_effect() {
        let m = matrix(
            &[&[4.0, 10.0], &[4.0, 20.0], &[4.0, 40.0]],
            &[B, N],
            &[0.5, 0.5],
        );
        let out = merec(&m);
        assert!(out.weights[0] < 1e-9);
        assert!((out.weights[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalization_follows_direction() {
        let m = matrix(&[&[2.0, 5.0], &[4.0, 10.0]], &[B, N], &[0.5, 0.5]);
        let out = merec(&m);
        let benefit = out.metrics.table_value("normalizedMatrix", "A2", "C1");
        let cost = out.metrics.table_value("normalizedMatrix", "A1", "C2");
        assert_eq!(benefit, Some(0.5));
        assert_eq!(cost, Some(0.5));
    }
}
