//! Ratio-based rankings: COPRAS, MOORA, MULTIMOORA, MOOSRA, ARAS.

use crate::matrix::normalize::{self, extremes, safe_div, share, EPSILON};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::{positions, Direction, MethodScores};

/// Per-alternative sums of the beneficial and non-beneficial columns.
fn split_sums(matrix: &DecisionMatrix, weighted: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    weighted
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0.0, 0.0), |(plus, minus), (j, v)| {
                    if matrix.is_beneficial(j) {
                        (plus + v, minus)
                    } else {
                        (plus, minus + v)
                    }
                })
        })
        .unzip()
}

pub fn copras(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::proportion(matrix);
    let weighted = normalize::weighted(&normalized, &matrix.weights());
    let (s_plus, s_minus) = split_sums(matrix, &weighted);

    let has_cost = (0..matrix.criterion_count()).any(|j| !matrix.is_beneficial(j));
    let scores: Vec<f64> = if has_cost {
        let floored: Vec<f64> = s_minus.iter().map(|s| s.max(EPSILON)).collect();
        let min = extremes(&floored).0;
        let total: f64 = floored.iter().sum();
        let inverse_total: f64 = floored.iter().map(|s| min / s).sum();
        s_plus
            .iter()
            .zip(&floored)
            .map(|(plus, minus)| plus + safe_div(min * total, minus * inverse_total))
            .collect()
    } else {
        s_plus.clone()
    };
    let q_max = extremes(&scores).1;
    let utility: Vec<f64> = scores.iter().map(|q| 100.0 * safe_div(*q, q_max)).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    metrics.vector("sPlus", &alternatives, &s_plus);
    metrics.vector("sMinus", &alternatives, &s_minus);
    metrics.vector("relativeSignificance", &alternatives, &scores);
    metrics.vector("utilityDegree", &alternatives, &utility);
    MethodScores { scores, metrics }
}

/// Ratio system: beneficial sum minus non-beneficial sum of the weighted vector-normalized matrix.
pub fn moora(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::vector(matrix);
    let weighted = normalize::weighted(&normalized, &matrix.weights());
    let (plus, minus) = split_sums(matrix, &weighted);
    let scores: Vec<f64> = plus.iter().zip(&minus).map(|(p, c)| p - c).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    metrics.vector("beneficialSum", &alternatives, &plus);
    metrics.vector("nonBeneficialSum", &alternatives, &minus);
    MethodScores { scores, metrics }
}

/// Final score is the mean of the ratio system, reference point and full
/// multiplicative form ranks. Lower is better.
pub fn multimoora(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::vector(matrix);
    let weighted = normalize::weighted(&normalized, &matrix.weights());
    let (plus, minus) = split_sums(matrix, &weighted);
    let ratio_system: Vec<f64> = plus.iter().zip(&minus).map(|(p, c)| p - c).collect();

    let reference_point: Vec<f64> = (0..matrix.criterion_count())
        .map(|j| {
            let (min, max) = extremes(&normalize::column(&weighted, j));
            if matrix.is_beneficial(j) {
                max
            } else {
                min
            }
        })
        .collect();
    let reference_distance: Vec<f64> = weighted
        .iter()
        .map(|row| {
            row.iter()
                .zip(&reference_point)
                .map(|(v, r)| (v - r).abs())
                .fold(0.0, f64::max)
        })
        .collect();

    let multiplicative: Vec<f64> = weighted
        .iter()
        .map(|row| {
            let (benefit, cost) =
                row.iter()
                    .enumerate()
                    .fold((1.0, 1.0), |(b, c), (j, v)| {
                        if matrix.is_beneficial(j) {
                            (b * v.max(EPSILON), c)
                        } else {
                            (b, c * v.max(EPSILON))
                        }
                    });
            benefit / cost
        })
        .collect();

    let rs_ranks = positions(&ratio_system, Direction::HigherIsBetter);
    let rp_ranks = positions(&reference_distance, Direction::LowerIsBetter);
    let fmf_ranks = positions(&multiplicative, Direction::HigherIsBetter);
    let scores: Vec<f64> = (0..matrix.alternative_count())
        .map(|i| (rs_ranks[i] + rp_ranks[i] + fmf_ranks[i]) / 3.0)
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    metrics.vector("referencePoint", &criteria, &reference_point);
    metrics.vector("ratioSystemScores", &alternatives, &ratio_system);
    metrics.vector("referencePointScores", &alternatives, &reference_distance);
    metrics.vector("fullMultiplicativeScores", &alternatives, &multiplicative);
    metrics.vector("ratioSystemRanking", &alternatives, &rs_ranks);
    metrics.vector("referencePointRanking", &alternatives, &rp_ranks);
    metrics.vector("fullMultiplicativeRanking", &alternatives, &fmf_ranks);
    MethodScores { scores, metrics }
}

/// Beneficial sum over non-beneficial sum; the denominator is floored.
pub fn moosra(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::vector(matrix);
    let weighted = normalize::weighted(&normalized, &matrix.weights());
    let (plus, minus) = split_sums(matrix, &weighted);
    let scores: Vec<f64> = plus
        .iter()
        .zip(&minus)
        .map(|(p, c)| p / c.max(EPSILON))
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.vector("beneficialSum", &alternatives, &plus);
    metrics.vector("nonBeneficialSum", &alternatives, &minus);
    MethodScores { scores, metrics }
}

/// Additive ratio assessment against a synthetic optimal alternative.
pub fn aras(matrix: &DecisionMatrix) -> MethodScores {
    let m = matrix.alternative_count();
    let n = matrix.criterion_count();
    let weights = matrix.weights();

    let mut optimal = Vec::with_capacity(n);
    // row 0 is the optimal alternative
    let mut normalized = vec![vec![0.0; n]; m + 1];
    for j in 0..n {
        let column = matrix.column(j);
        let (min, max) = extremes(&column);
        let best = if matrix.is_beneficial(j) { max } else { min };
        optimal.push(best);

        let mut extended = Vec::with_capacity(m + 1);
        extended.push(best);
        extended.extend(column);
        if !matrix.is_beneficial(j) {
            for x in extended.iter_mut() {
                *x = if *x > 0.0 { 1.0 / *x } else { 0.0 };
            }
        }
        for (i, value) in share(&extended).into_iter().enumerate() {
            normalized[i][j] = value;
        }
    }
    let optimality: Vec<f64> = normalized
        .iter()
        .map(|row| row.iter().zip(&weights).map(|(r, w)| r * w).sum())
        .collect();
    let s0 = optimality[0];
    let scores: Vec<f64> = optimality[1..].iter().map(|s| safe_div(*s, s0)).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.vector("optimalValues", &criteria, &optimal);
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized[1..]);
    metrics.vector("optimalityFunction", &alternatives, &optimality[1..]);
    metrics.scalar("optimalOptimalityFunction", s0);
    metrics.vector("utilityDegree", &alternatives, &scores);
    MethodScores { scores, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::{matrix, suppliers};
    use crate::matrix::CriterionType::{Beneficial as B, NonBeneficial as N};

    fn sample() -> DecisionMatrix {
        matrix(&[&[9.0, 1.0], &[5.0, 4.0], &[1.0, 9.0]], &[B, N], &[0.5, 0.5])
    }

    #[test]
    fn copras_without_cost_criteria_is_weighted_share() {
        let m = matrix(&[&[1.0, 3.0], &[3.0, 1.0]], &[B, B], &[0.75, 0.25]);
        let out = copras(&m);
        assert!((out.scores[0] - (0.75 * 0.25 + 0.25 * 0.75)).abs() < 1e-12);
        assert!((out.scores[1] - (0.75 * 0.75 + 0.25 * 0.25)).abs() < 1e-12);
        assert_eq!(out.metrics.vector_value("utilityDegree", "A2"), Some(100.0));
    }

    #[test]
    fn copras_rewards_low_cost() {
        let out = copras(&sample());
        assert!(out.scores[0] > out.scores[1]);
        assert!(out.scores[1] > out.scores[2]);
    }

    #[test]
    fn multimoora_exposes_sub_rankings() {
        let out = multimoora(&sample());
        for name in [
            "ratioSystemRanking",
            "referencePointRanking",
            "fullMultiplicativeRanking",
        ] {
            assert_eq!(out.metrics.vector_value(name, "A1"), Some(1.0), "{name}");
            assert_eq!(out.metrics.vector_value(name, "A3"), Some(3.0), "{name}");
        }
        assert_eq!(out.scores, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn moora_and_moosra_agree_on_dominance() {
        let m = sample();
        let moora_out = moora(&m);
        let moosra_out = moosra(&m);
        assert!(moora_out.scores[0] > moora_out.scores[2]);
        assert!(moosra_out.scores[0] > moosra_out.scores[2]);
    }

    #[test]
    fn aras_utility_is_relative_to_optimal() {
        let out = aras(&suppliers());
        assert!(out.scores.iter().all(|k| *k > 0.0 && *k <= 1.0 + 1e-12));
        let dominant = aras(&sample());
        assert!((dominant.scores[0] - 1.0).abs() < 1e-12);
    }
}
