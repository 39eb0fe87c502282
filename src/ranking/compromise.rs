//! Compromise and relational rankings: CoCoSo, GRA, TODIM.

use crate::matrix::normalize::{self, extremes, safe_div};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::MethodScores;

const COCOSO_LAMBDA: f64 = 0.5;

/// Combined compromise solution from weighted sum and power-weighted sequences.
pub fn cocoso(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::range(matrix, 0.0);
    let weights = matrix.weights();
    let sum: Vec<f64> = normalized
        .iter()
        .map(|row| row.iter().zip(&weights).map(|(r, w)| r * w).sum())
        .collect();
    let power: Vec<f64> = normalized
        .iter()
        .map(|row| row.iter().zip(&weights).map(|(r, w)| r.powf(*w)).sum())
        .collect();

    let (s_min, s_max) = extremes(&sum);
    let (p_min, p_max) = extremes(&power);
    let total: f64 = sum.iter().zip(&power).map(|(s, p)| s + p).sum();
    let divisor = |min: f64| if min > 0.0 { min } else { 1.0 };
    let reference = COCOSO_LAMBDA * s_max + (1.0 - COCOSO_LAMBDA) * p_max;

    let m = matrix.alternative_count();
    let mut ka = Vec::with_capacity(m);
    let mut kb = Vec::with_capacity(m);
    let mut kc = Vec::with_capacity(m);
    let mut scores = Vec::with_capacity(m);
    for (s, p) in sum.iter().zip(&power) {
        let a = safe_div(s + p, total);
        let b = s / divisor(s_min) + p / divisor(p_min);
        let c = safe_div(COCOSO_LAMBDA * s + (1.0 - COCOSO_LAMBDA) * p, reference);
        ka.push(a);
        kb.push(b);
        kc.push(c);
        scores.push((a * b * c).cbrt() + (a + b + c) / 3.0);
    }

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("weightedSum", &alternatives, &sum);
    metrics.vector("weightedPower", &alternatives, &power);
    metrics.vector("ka", &alternatives, &ka);
    metrics.vector("kb", &alternatives, &kb);
    metrics.vector("kc", &alternatives, &kc);
    MethodScores { scores, metrics }
}

/// Grey relational grade against the ideal sequence of ones.
pub fn gra(matrix: &DecisionMatrix, zeta: f64) -> MethodScores {
    let normalized = normalize::range(matrix, 0.0);
    let deviations: Vec<Vec<f64>> = normalized
        .iter()
        .map(|row| row.iter().map(|r| (1.0 - r).abs()).collect())
        .collect();
    let flat: Vec<f64> = deviations.iter().flatten().copied().collect();
    let (d_min, d_max) = extremes(&flat);

    let coefficients: Vec<Vec<f64>> = deviations
        .iter()
        .map(|row| {
            row.iter()
                .map(|d| {
                    let denominator = d + zeta * d_max;
                    if denominator > 0.0 {
                        (d_min + zeta * d_max) / denominator
                    } else {
                        1.0
                    }
                })
                .collect()
        })
        .collect();
    let weights = matrix.weights();
    let scores: Vec<f64> = coefficients
        .iter()
        .map(|row| row.iter().zip(&weights).map(|(c, w)| c * w).sum())
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("deviationSequence", &alternatives, &criteria, &deviations);
    metrics.table("greyRelationalCoefficients", &alternatives, &criteria, &coefficients);
    metrics.scalar("zeta", zeta);
    MethodScores { scores, metrics }
}

/// Pairwise dominance with loss attenuation `theta`, rescaled onto `[0, 1]`.
pub fn todim(matrix: &DecisionMatrix, theta: f64) -> MethodScores {
    let normalized = normalize::range(matrix, 0.0);
    let weights = matrix.weights();
    let w_max = extremes(&weights).1;
    let relative: Vec<f64> = weights.iter().map(|w| safe_div(*w, w_max)).collect();
    let relative_sum: f64 = relative.iter().sum();

    let m = matrix.alternative_count();
    let mut dominance = vec![vec![0.0; m]; m];
    for i in 0..m {
        for k in 0..m {
            if i == k {
                continue;
            }
            dominance[i][k] = normalized[i]
                .iter()
                .zip(&normalized[k])
                .zip(&relative)
                .map(|((a, b), wr)| {
                    let diff = a - b;
                    if diff > 0.0 && relative_sum > 0.0 {
                        (wr * diff / relative_sum).sqrt()
                    } else if diff < 0.0 && *wr > 0.0 {
                        -(1.0 / theta) * (relative_sum * -diff / wr).sqrt()
                    } else {
                        0.0
                    }
                })
                .sum();
        }
    }
    let global: Vec<f64> = dominance.iter().map(|row| row.iter().sum()).collect();
    let (g_min, g_max) = extremes(&global);
    let scores: Vec<f64> = global
        .iter()
        .map(|g| if g_max > g_min { (g - g_min) / (g_max - g_min) } else { 0.0 })
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("relativeWeights", &criteria, &relative);
    metrics.table("dominanceMatrix", &alternatives, &alternatives, &dominance);
    metrics.vector("globalDominance", &alternatives, &global);
    metrics.scalar("theta", theta);
    MethodScores { scores, metrics }
}
