use tracing::debug;

/// Below this a criterion measure counts as uniformly zero.
pub const ZERO_TOLERANCE: f64 = 1e-12;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64
}

pub fn population_std(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

pub fn mean_absolute_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    values.iter().map(|v| (v - mu).abs()).sum::<f64>() / values.len() as f64
}

/// Sum of |a - b| over every ordered pair.
pub fn pairwise_absolute_deviation(values: &[f64]) -> f64 {
    let mut total = 0.0;
    for a in values {
        for b in values {
            total += (a - b).abs();
        }
    }
    total
}

/// Pearson correlation clamped to `[-1, 1]`; 0 when either series is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mean_a = mean(&a[..n]);
    let mean_b = mean(&b[..n]);
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denom = (var_a * var_b).sqrt();
    if denom <= 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Criterion-by-criterion correlation with a unit diagonal.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let mut out = vec![vec![0.0; n]; n];
    for j in 0..n {
        out[j][j] = 1.0;
        for k in (j + 1)..n {
            let r = pearson(&columns[j], &columns[k]);
            out[j][k] = r;
            out[k][j] = r;
        }
    }
    out
}

/// Geometric mean with every value floored at `floor` before the logarithm.
pub fn geometric_mean(values: &[f64], floor: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let log_sum: f64 = values.iter().map(|v| v.max(floor).ln()).sum();
    (log_sum / values.len() as f64).exp()
}

/// Scales `scores` to sum to 1, or returns `1/n` for each entry when the scores are
/// uniformly zero or not finite.
pub fn normalize_or_equal(scores: &[f64]) -> Vec<f64> {
    let n = scores.len();
    if n == 0 {
        return Vec::new();
    }
    let total: f64 = scores.iter().sum();
    if !total.is_finite() || total <= ZERO_TOLERANCE || scores.iter().any(|s| !s.is_finite()) {
        debug!(criteria = n, "criterion measures are uniformly zero, using equal weights");
        return vec![1.0 / n as f64; n];
    }
    scores.iter().map(|s| s / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispersion_measures() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((population_variance(&values) - 4.0).abs() < 1e-12);
        assert!((population_std(&values) - 2.0).abs() < 1e-12);
        assert!((mean_absolute_deviation(&values) - 1.5).abs() < 1e-12);
        assert!((pairwise_absolute_deviation(&[1.0, 3.0]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_handles_perfect_and_constant_series() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]), 0.0);
        let corr = correlation_matrix(&[vec![1.0, 2.0], vec![2.0, 1.0]]);
        assert_eq!(corr[0][0], 1.0);
        assert!((corr[0][1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn geometric_mean_floors_zeros() {
        assert!((geometric_mean(&[2.0, 8.0], 1e-6) - 4.0).abs() < 1e-12);
        assert!(geometric_mean(&[0.0, 1.0], 1e-6) > 0.0);
    }

    #[test]
    fn normalize_or_equal_falls_back() {
        assert_eq!(normalize_or_equal(&[0.0, 0.0, 0.0, 0.0]), vec![0.25; 4]);
        let w = normalize_or_equal(&[1.0, 3.0]);
        assert!((w[0] - 0.25).abs() < 1e-12);
        assert!((w[1] - 0.75).abs() < 1e-12);
    }
}
