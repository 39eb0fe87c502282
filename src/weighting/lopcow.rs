use crate::matrix::stats::{geometric_mean, normalize_or_equal};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::weighting::MethodWeights;

const FLOOR: f64 = 1e-6;

/// LOPCOW: percentage value `100 |ln GM|` of each vector-normalized column,
/// non-beneficial values inverted first.
pub fn lopcow(matrix: &DecisionMatrix) -> MethodWeights {
    let m = matrix.alternative_count();
    let n = matrix.criterion_count();

    let mut normalized = vec![vec![0.0; n]; m];
    let mut means = Vec::with_capacity(n);
    let mut percentages = Vec::with_capacity(n);
    for j in 0..n {
        let adjusted: Vec<f64> = matrix
            .column(j)
            .iter()
            .map(|x| {
                if matrix.is_beneficial(j) {
                    *x
                } else {
                    1.0 / x.max(FLOOR)
                }
            })
            .collect();
        let norm = adjusted.iter().map(|x| x * x).sum::<f64>().sqrt();
        let column: Vec<f64> = adjusted
            .iter()
            .map(|x| if norm > 0.0 { x / norm } else { 0.0 })
            .collect();
        for (i, value) in column.iter().enumerate() {
            normalized[i][j] = *value;
        }
        let gm = geometric_mean(&column, FLOOR);
        means.push(gm);
        percentages.push(100.0 * gm.ln().abs());
    }
    let weights = normalize_or_equal(&percentages);

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("geometricMeans", &criteria, &means);
    metrics.vector("percentageValues", &criteria, &percentages);
    MethodWeights { weights, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::matrix;
    use crate::matrix::CriterionType::{Beneficial as B, NonBeneficial as N};

    #[test]
    fn constant_columns_share_weight_evenly() {
        let m = matrix(&[&[3.0, 7.0], &[3.0, 7.0]], &[B, N], &[0.5, 0.5]);
        let out = lopcow(&m);
        // both columns normalize to 1/sqrt(2)
        assert!((out.weights[0] - 0.5).abs() < 1e-12);
        let pv = out.metrics.vector_value("percentageValues", "C1").expect("pv");
        assert!((pv - 100.0 * 0.5 * 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn zero_cost_value_is_floored() {
        let m = matrix(&[&[0.0, 1.0], &[2.0, 3.0]], &[N, B], &[0.5, 0.5]);
        let out = lopcow(&m);
        assert!(out.weights.iter().all(|w| w.is_finite()));
    }
}
