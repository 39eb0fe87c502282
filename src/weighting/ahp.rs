//! Analytic Hierarchy Process priority vectors and consistency checks.

use crate::error::McdmError;
use crate::matrix::normalize::safe_div;
use crate::matrix::stats::normalize_or_equal;
use crate::matrix::{Criterion, Diagnostics};
use crate::weighting::{criterion_ids, per_criterion, MethodWeights, WeightMethod, WeightParams};

/// Saaty's random consistency index for matrices of order 1..=15.
pub const RANDOM_INDEX: [f64; 15] = [
    0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

/// Judgements are considered acceptable up to this ratio.
pub const CONSISTENCY_THRESHOLD: f64 = 0.1;

pub fn random_index(order: usize) -> f64 {
    if order == 0 {
        return 0.0;
    }
    RANDOM_INDEX[order.min(RANDOM_INDEX.len()) - 1]
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriorityVector {
    pub priorities: Vec<f64>,
    pub normalized: Vec<Vec<f64>>,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub random_index: f64,
    pub consistency_ratio: f64,
}

impl PriorityVector {
    pub fn is_consistent(&self) -> bool {
        self.consistency_ratio <= CONSISTENCY_THRESHOLD
    }
}

/// Column-normalize, average rows, then estimate lambda max from `A w`.
pub fn priority_vector(pairwise: &[Vec<f64>]) -> PriorityVector {
    let n = pairwise.len();
    let column_sums: Vec<f64> = (0..n)
        .map(|j| pairwise.iter().map(|row| row[j]).sum())
        .collect();
    let normalized: Vec<Vec<f64>> = pairwise
        .iter()
        .map(|row| {
            row.iter()
                .zip(&column_sums)
                .map(|(a, s)| safe_div(*a, *s))
                .collect()
        })
        .collect();
    let priorities: Vec<f64> = normalized
        .iter()
        .map(|row| row.iter().sum::<f64>() / n as f64)
        .collect();

    let ratios: Vec<f64> = pairwise
        .iter()
        .zip(&priorities)
        .filter(|(_, w)| **w > 0.0)
        .map(|(row, w)| row.iter().zip(&priorities).map(|(a, p)| a * p).sum::<f64>() / w)
        .collect();
    let lambda_max = if ratios.is_empty() {
        n as f64
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    };
    let consistency_index = if n > 1 {
        ((lambda_max - n as f64) / (n as f64 - 1.0)).max(0.0)
    } else {
        0.0
    };
    let random_index = random_index(n);
    let consistency_ratio = safe_div(consistency_index, random_index);

    PriorityVector {
        priorities,
        normalized,
        lambda_max,
        consistency_index,
        random_index,
        consistency_ratio,
    }
}

/// Perfectly consistent matrix `a_ij = p_i / p_j`.
pub fn pairwise_from_priorities(priorities: &[f64]) -> Vec<Vec<f64>> {
    priorities
        .iter()
        .map(|pi| priorities.iter().map(|pj| pi / pj).collect())
        .collect()
}

pub fn validate_pairwise(name: &str, matrix: &[Vec<f64>], order: usize) -> Result<(), McdmError> {
    let cols = matrix.iter().map(Vec::len).find(|len| *len != order);
    if matrix.len() != order || cols.is_some() {
        return Err(McdmError::DimensionMismatch {
            name: name.to_string(),
            expected: order,
            rows: matrix.len(),
            cols: cols.unwrap_or(order),
        });
    }
    if let Some(bad) = matrix.iter().flatten().find(|v| !v.is_finite() || **v <= 0.0) {
        return Err(McdmError::invalid_parameter(
            name,
            format!("entries must be positive, got {bad}"),
        ));
    }
    Ok(())
}

pub fn ahp(criteria: &[Criterion], params: &WeightParams) -> Result<MethodWeights, McdmError> {
    let n = criteria.len();
    let pairwise = match &params.pairwise_matrix {
        Some(matrix) => {
            validate_pairwise("pairwiseMatrix", matrix, n)?;
            matrix.clone()
        }
        None => {
            let priorities = match &params.priorities {
                Some(map) => per_criterion(WeightMethod::Ahp, "priorities", Some(map), criteria)?,
                None => criteria.iter().map(|c| c.weight).collect(),
            };
            if priorities.iter().all(|p| *p == 0.0) {
                vec![vec![1.0; n]; n]
            } else {
                if let Some(bad) = priorities.iter().find(|p| !p.is_finite() || **p <= 0.0) {
                    return Err(McdmError::invalid_parameter(
                        "priorities",
                        format!("priorities must be positive, got {bad}"),
                    ));
                }
                pairwise_from_priorities(&priorities)
            }
        }
    };

    let vector = priority_vector(&pairwise);
    let weights = normalize_or_equal(&vector.priorities);

    let ids = criterion_ids(criteria);
    let mut metrics = Diagnostics::new();
    metrics.table("pairwiseMatrix", &ids, &ids, &pairwise);
    metrics.table("normalizedPairwiseMatrix", &ids, &ids, &vector.normalized);
    metrics.scalar("lambdaMax", vector.lambda_max);
    metrics.scalar("consistencyIndex", vector.consistency_index);
    metrics.scalar("randomIndex", vector.random_index);
    metrics.scalar("consistencyRatio", vector.consistency_ratio);
    metrics.scalar("consistent", if vector.is_consistent() { 1.0 } else { 0.0 });
    Ok(MethodWeights { weights, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::criteria;
    use crate::matrix::CriterionType::Beneficial as B;

    fn with_pairwise(matrix: Vec<Vec<f64>>) -> WeightParams {
        WeightParams {
            pairwise_matrix: Some(matrix),
            ..WeightParams::default()
        }
    }

    #[test]
    fn consistent_matrix_has_zero_ratio() {
        let crits = criteria(&[B, B, B], &[0.0; 3]);
        let params = with_pairwise(vec![
            vec![1.0, 2.0, 4.0],
            vec![0.5, 1.0, 2.0],
            vec![0.25, 0.5, 1.0],
        ]);
        let out = ahp(&crits, &params).expect("ahp");
        assert!((out.weights[0] - 4.0 / 7.0).abs() < 1e-9);
        assert!((out.weights[1] - 2.0 / 7.0).abs() < 1e-9);
        assert!((out.weights[2] - 1.0 / 7.0).abs() < 1e-9);
        let cr = out.metrics.scalar_value("consistencyRatio").expect("cr");
        assert!(cr.abs() < 1e-9);
        assert_eq!(out.metrics.scalar_value("consistent"), Some(1.0));
    }

    #[test]
    fn cyclic_judgements_are_inconsistent() {
        let crits = criteria(&[B, B, B], &[0.0; 3]);
        let params = with_pairwise(vec![
            vec![1.0, 9.0, 1.0 / 9.0],
            vec![1.0 / 9.0, 1.0, 9.0],
            vec![9.0, 1.0 / 9.0, 1.0],
        ]);
        let out = ahp(&crits, &params).expect("ahp");
        let cr = out.metrics.scalar_value("consistencyRatio").expect("cr");
        assert!(cr > CONSISTENCY_THRESHOLD);
        assert!((cr - 6.13).abs() < 0.1, "cr = {cr}");
        assert_eq!(out.metrics.scalar_value("consistent"), Some(0.0));
        for w in &out.weights {
            assert!((w - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn builds_matrix_from_criterion_weights() {
        let crits = criteria(&[B, B], &[3.0, 1.0]);
        let out = ahp(&crits, &WeightParams::default()).expect("ahp");
        assert!((out.weights[0] - 0.75).abs() < 1e-9);
        assert!((out.weights[1] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn rejects_wrong_shape_and_non_positive_entries() {
        let crits = criteria(&[B, B, B], &[0.0; 3]);
        let err = ahp(&crits, &with_pairwise(vec![vec![1.0, 2.0], vec![0.5, 1.0]]))
            .expect_err("2x2 for three criteria");
        assert!(matches!(err, McdmError::DimensionMismatch { expected: 3, .. }));

        let err = ahp(
            &crits,
            &with_pairwise(vec![
                vec![1.0, 0.0, 1.0],
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 1.0],
            ]),
        )
        .expect_err("zero entry");
        assert!(matches!(err, McdmError::InvalidParameter { .. }));
    }

    #[test]
    fn random_index_saturates() {
        assert_eq!(random_index(3), 0.58);
        assert_eq!(random_index(40), 1.59);
    }
}
