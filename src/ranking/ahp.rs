//! AHP used as a ranking method: local priorities per criterion, synthesized with the
//! criterion weights.

use crate::matrix::normalize::EPSILON;
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::MethodScores;
use crate::weighting::ahp::{pairwise_from_priorities, priority_vector};

pub fn ahp(matrix: &DecisionMatrix) -> MethodScores {
    let m = matrix.alternative_count();
    let n = matrix.criterion_count();
    let weights = matrix.weights();

    let mut local = vec![vec![0.0; n]; m];
    let mut consistency = Vec::with_capacity(n);
    for j in 0..n {
        let adjusted: Vec<f64> = matrix
            .column(j)
            .into_iter()
            .map(|x| {
                if matrix.is_beneficial(j) {
                    x
                } else if x > 0.0 {
                    1.0 / x
                } else {
                    0.0
                }
            })
            .collect();
        // a column with no positive entry carries no preference
        let adjusted: Vec<f64> = if adjusted.iter().all(|x| *x <= 0.0) {
            vec![1.0; m]
        } else {
            adjusted.into_iter().map(|x| x.max(EPSILON)).collect()
        };
        let priorities = priority_vector(&pairwise_from_priorities(&adjusted));
        for (i, p) in priorities.priorities.iter().enumerate() {
            local[i][j] = *p;
        }
        consistency.push(priorities.consistency_ratio);
    }

    let scores: Vec<f64> = local
        .iter()
        .map(|row| row.iter().zip(&weights).map(|(p, w)| p * w).sum())
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("localPriorities", &alternatives, &criteria, &local);
    metrics.vector("consistencyRatios", &criteria, &consistency);
    metrics.vector("globalPriorities", &alternatives, &scores);
    MethodScores { scores, metrics }
}
