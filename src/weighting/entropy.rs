use crate::matrix::stats::normalize_or_equal;
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::weighting::MethodWeights;

/// Shannon entropy weighting. A column summing to zero is treated as uniform.
pub fn entropy(matrix: &DecisionMatrix) -> MethodWeights {
    let m = matrix.alternative_count();
    let n = matrix.criterion_count();
    let k = 1.0 / (m as f64).ln();

    let mut proportions = vec![vec![0.0; n]; m];
    let mut entropies = Vec::with_capacity(n);
    for j in 0..n {
        let column = matrix.column(j);
        let total: f64 = column.iter().sum();
        let mut h = 0.0;
        for (i, value) in column.iter().enumerate() {
            let p = if total > 0.0 {
                value / total
            } else {
                1.0 / m as f64
            };
            proportions[i][j] = p;
            if p > 0.0 {
                h -= p * p.ln();
            }
        }
        entropies.push((k * h).clamp(0.0, 1.0));
    }

    let diversity: Vec<f64> = entropies.iter().map(|e| 1.0 - e).collect();
    let weights = normalize_or_equal(&diversity);

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &proportions);
    metrics.vector("entropyValues", &criteria, &entropies);
    metrics.vector("diversityValues", &criteria, &diversity);
    MethodWeights { weights, metrics }
}
