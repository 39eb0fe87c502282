//! Rankings by distance from reference solutions: TOPSIS, VIKOR, CODAS, EDAS.

use crate::matrix::normalize::{self, extremes, safe_div};
use crate::matrix::stats::mean;
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::MethodScores;

/// Best and worst value of each column in the direction of its criterion.
fn ideals(matrix: &DecisionMatrix, rows: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    (0..matrix.criterion_count())
        .map(|j| {
            let (min, max) = extremes(&normalize::column(rows, j));
            if matrix.is_beneficial(j) {
                (max, min)
            } else {
                (min, max)
            }
        })
        .unzip()
}

pub fn topsis(matrix: &DecisionMatrix) -> MethodScores {
    let normalized = normalize::vector(matrix);
    let weighted = normalize::weighted(&normalized, &matrix.weights());
    let (best, worst) = ideals(matrix, &weighted);

    let distance = |row: &[f64], reference: &[f64]| -> f64 {
        row.iter()
            .zip(reference)
            .map(|(v, r)| (v - r).powi(2))
            .sum::<f64>()
            .sqrt()
    };
    let to_best: Vec<f64> = weighted.iter().map(|row| distance(row, &best)).collect();
    let to_worst: Vec<f64> = weighted.iter().map(|row| distance(row, &worst)).collect();
    let scores: Vec<f64> = to_best
        .iter()
        .zip(&to_worst)
        .map(|(plus, minus)| safe_div(*minus, plus + minus))
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    metrics.vector("idealBest", &criteria, &best);
    metrics.vector("idealWorst", &criteria, &worst);
    metrics.vector("distanceToBest", &alternatives, &to_best);
    metrics.vector("distanceToWorst", &alternatives, &to_worst);
    metrics.vector("closenessCoefficients", &alternatives, &scores);
    MethodScores { scores, metrics }
}

/// Compromise index `Q`; `v` trades group utility against individual regret. Lower is better.
pub fn vikor(matrix: &DecisionMatrix, v: f64) -> MethodScores {
    let weights = matrix.weights();
    let (best, worst) = ideals(matrix, matrix.rows());

    let m = matrix.alternative_count();
    let mut utility = Vec::with_capacity(m);
    let mut regret = Vec::with_capacity(m);
    for row in matrix.rows() {
        let terms: Vec<f64> = row
            .iter()
            .enumerate()
            .map(|(j, x)| {
                let span = best[j] - worst[j];
                if span == 0.0 {
                    0.0
                } else {
                    weights[j] * (best[j] - x) / span
                }
            })
            .collect();
        utility.push(terms.iter().sum::<f64>());
        regret.push(terms.iter().copied().fold(0.0, f64::max));
    }

    let (s_best, s_worst) = extremes(&utility);
    let (r_best, r_worst) = extremes(&regret);
    let scaled = |value: f64, lo: f64, hi: f64| {
        if hi > lo {
            (value - lo) / (hi - lo)
        } else {
            0.0
        }
    };
    let scores: Vec<f64> = utility
        .iter()
        .zip(&regret)
        .map(|(s, r)| v * scaled(*s, s_best, s_worst) + (1.0 - v) * scaled(*r, r_best, r_worst))
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.vector("bestValues", &criteria, &best);
    metrics.vector("worstValues", &criteria, &worst);
    metrics.vector("sValues", &alternatives, &utility);
    metrics.vector("rValues", &alternatives, &regret);
    metrics.vector("qValues", &alternatives, &scores);
    metrics.scalar("v", v);
    MethodScores { scores, metrics }
}

/// Relative assessment against the negative ideal solution.
///
/// `RA_i = sum_k (E_i - E_k) + tau * psi(E_i - E_k) * (T_i - T_k)` with `psi(x) = 1`
/// when `|x| >= tau`, else 0.
pub fn codas(matrix: &DecisionMatrix, tau: f64) -> MethodScores {
    let normalized = normalize::linear(matrix);
    let weighted = normalize::weighted(&normalized, &matrix.weights());
    let negative_ideal: Vec<f64> = (0..matrix.criterion_count())
        .map(|j| extremes(&normalize::column(&weighted, j)).0)
        .collect();

    let euclidean: Vec<f64> = weighted
        .iter()
        .map(|row| {
            row.iter()
                .zip(&negative_ideal)
                .map(|(v, ns)| (v - ns).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .collect();
    let taxicab: Vec<f64> = weighted
        .iter()
        .map(|row| {
            row.iter()
                .zip(&negative_ideal)
                .map(|(v, ns)| (v - ns).abs())
                .sum()
        })
        .collect();

    let m = matrix.alternative_count();
    let mut assessment = vec![vec![0.0; m]; m];
    let mut scores = vec![0.0; m];
    for i in 0..m {
        for k in 0..m {
            let diff = euclidean[i] - euclidean[k];
            let psi = if diff.abs() >= tau { 1.0 } else { 0.0 };
            let h = diff + tau * psi * (taxicab[i] - taxicab[k]);
            assessment[i][k] = h;
            scores[i] += h;
        }
    }

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("weightedMatrix", &alternatives, &criteria, &weighted);
    metrics.vector("negativeIdealSolution", &criteria, &negative_ideal);
    metrics.vector("euclideanDistances", &alternatives, &euclidean);
    metrics.vector("taxicabDistances", &alternatives, &taxicab);
    metrics.table("relativeAssessmentMatrix", &alternatives, &alternatives, &assessment);
    metrics.scalar("tau", tau);
    MethodScores { scores, metrics }
}

/// Appraisal score from positive and negative distances to the column averages.
pub fn edas(matrix: &DecisionMatrix) -> MethodScores {
    let weights = matrix.weights();
    let averages: Vec<f64> = matrix.columns().iter().map(|c| mean(c)).collect();

    let m = matrix.alternative_count();
    let n = matrix.criterion_count();
    let mut positive = vec![vec![0.0; n]; m];
    let mut negative = vec![vec![0.0; n]; m];
    for (i, row) in matrix.rows().iter().enumerate() {
        for (j, x) in row.iter().enumerate() {
            let diff = safe_div(x - averages[j], averages[j]);
            let diff = if matrix.is_beneficial(j) { diff } else { -diff };
            positive[i][j] = diff.max(0.0);
            negative[i][j] = (-diff).max(0.0);
        }
    }

    let weighted_sum = |rows: &[Vec<f64>]| -> Vec<f64> {
        rows.iter()
            .map(|row| row.iter().zip(&weights).map(|(d, w)| d * w).sum())
            .collect()
    };
    let sp = weighted_sum(&positive);
    let sn = weighted_sum(&negative);
    let sp_max = extremes(&sp).1;
    let sn_max = extremes(&sn).1;
    let nsp: Vec<f64> = sp.iter().map(|s| safe_div(*s, sp_max)).collect();
    let nsn: Vec<f64> = sn.iter().map(|s| 1.0 - safe_div(*s, sn_max)).collect();
    let scores: Vec<f64> = nsp.iter().zip(&nsn).map(|(p, q)| (p + q) / 2.0).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.vector("averageSolution", &criteria, &averages);
    metrics.table("positiveDistance", &alternatives, &criteria, &positive);
    metrics.table("negativeDistance", &alternatives, &criteria, &negative);
    metrics.vector("weightedPositive", &alternatives, &sp);
    metrics.vector("weightedNegative", &alternatives, &sn);
    metrics.vector("normalizedPositive", &alternatives, &nsp);
    metrics.vector("normalizedNegative", &alternatives, &nsn);
    MethodScores { scores, metrics }
}
