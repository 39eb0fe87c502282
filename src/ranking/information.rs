//! Information-content rankings over the sum-normalized matrix. Lower totals are better.

use crate::error::McdmError;
use crate::matrix::normalize::{self, EPSILON};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::{MethodScores, RankMethod};

/// SWEI: `sum_j log2(1 / r_ij) ^ w_j`.
pub fn swei(matrix: &DecisionMatrix) -> Result<MethodScores, McdmError> {
    let (normalized, information) = information(RankMethod::Swei, matrix)?;
    let weights = matrix.weights();
    let scores = information
        .iter()
        .map(|row| row.iter().zip(&weights).map(|(info, w)| info.powf(*w)).sum())
        .collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("informationMatrix", &alternatives, &criteria, &information);
    Ok(MethodScores { scores, metrics })
}

/// SWI: `sum_j w_j log2(1 / r_ij)`.
pub fn swi(matrix: &DecisionMatrix) -> Result<MethodScores, McdmError> {
    let (normalized, information) = information(RankMethod::Swi, matrix)?;
    let weighted = normalize::weighted(&information, &matrix.weights());
    let scores = weighted.iter().map(|row| row.iter().sum()).collect();

    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &normalized);
    metrics.table("informationMatrix", &alternatives, &criteria, &information);
    metrics.table("weightedInformationMatrix", &alternatives, &criteria, &weighted);
    Ok(MethodScores { scores, metrics })
}

fn information(
    method: RankMethod,
    matrix: &DecisionMatrix,
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), McdmError> {
    let mut invalid_cells = Vec::new();
    for (i, alternative) in matrix.alternatives().iter().enumerate() {
        for (j, criterion) in matrix.criteria().iter().enumerate() {
            if matrix.value(i, j) <= 0.0 {
                invalid_cells.push(format!("{} - {}", alternative.name, criterion.name));
            }
        }
    }
    if !invalid_cells.is_empty() {
        return Err(McdmError::NonPositiveScore {
            method: method.to_string(),
            invalid_cells,
        });
    }

    let normalized = normalize::sum(matrix);
    // a single alternative holds the whole column and carries no information
    let information = if matrix.alternative_count() == 1 {
        vec![vec![0.0; matrix.criterion_count()]]
    } else {
        normalized
            .iter()
            .map(|row| row.iter().map(|r| (1.0 / (r + EPSILON)).log2()).collect())
            .collect()
    };
    Ok((normalized, information))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::matrix;
    use crate::matrix::CriterionType::{Beneficial as B, NonBeneficial as N};

    #[test]
    fn zero_scores_are_rejected_with_cells_listed() {
        let m = matrix(&[&[1.0, 0.0], &[2.0, 3.0]], &[B, N], &[0.5, 0.5]);
        for result in [swei(&m), swi(&m)] {
            let err = result.expect_err("zero score");
            let message = err.to_string();
            assert!(message.contains("greater than zero"), "{message}");
            assert!(message.contains("A1 - Criterion 2"), "{message}");
        }
    }

    #[test]
    fn swi_sums_weighted_bits() {
        // shares 0.5/0.5 carry one bit each
        let m = matrix(&[&[1.0, 4.0], &[1.0, 4.0]], &[B, N], &[0.3, 0.7]);
        let out = swi(&m).expect("swi");
        assert!((out.scores[0] - 1.0).abs() < 1e-9);
        let swei_out = swei(&m).expect("swei");
        assert!((swei_out.scores[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_alternative_scores_zero() {
        let m = matrix(&[&[4.0, 7.0]], &[B, N], &[0.4, 0.6]);
        for out in [swei(&m).expect("swei"), swi(&m).expect("swi")] {
            assert_eq!(out.scores, vec![0.0]);
            assert_eq!(out.metrics.table_value("informationMatrix", "A1", "C2"), Some(0.0));
        }
    }

    #[test]
    fn dominant_alternative_scores_lower() {
        let m = matrix(&[&[9.0, 1.0], &[3.0, 5.0]], &[B, N], &[0.5, 0.5]);
        let out = swi(&m).expect("swi");
        assert!(out.scores[0] < out.scores[1]);
    }
}
