use nalgebra::DMatrix;

use crate::error::McdmError;
use crate::matrix::normalize::{self, range};
use crate::matrix::stats::{correlation_matrix, normalize_or_equal};
use crate::matrix::{Criterion, DecisionMatrix, Diagnostics};
use crate::weighting::{criterion_ids, MethodWeights};

/// `I - X` is treated as singular when its smallest LU pivot falls below this
/// fraction of the largest one.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Correlation-derived influence is symmetric, so every row sum can equal the
/// maximum and `X` would reach spectral radius 1. Scaling by the maximum row or
/// column sum times `1 + DATA_SCALE_MARGIN` keeps `I - X` invertible.
const DATA_SCALE_MARGIN: f64 = 0.01;

/// DEMATEL on an expert direct-influence matrix.
pub fn from_influence(
    criteria: &[Criterion],
    direct: &[Vec<f64>],
) -> Result<MethodWeights, McdmError> {
    let n = criteria.len();
    let cols = direct.iter().map(Vec::len).find(|len| *len != n);
    if direct.len() != n || cols.is_some() {
        return Err(McdmError::DimensionMismatch {
            name: "influenceMatrix".to_string(),
            expected: n,
            rows: direct.len(),
            cols: cols.unwrap_or(n),
        });
    }
    if let Some(bad) = direct.iter().flatten().find(|v| !v.is_finite() || **v < 0.0) {
        return Err(McdmError::invalid_parameter(
            "influenceMatrix",
            format!("entries must be finite and non-negative, got {bad}"),
        ));
    }
    total_relation(criteria, direct.to_vec(), 0.0)
}

/// DEMATEL with direct influence taken from absolute criterion correlations.
pub fn from_data(matrix: &DecisionMatrix) -> Result<MethodWeights, McdmError> {
    let normalized = range(matrix, 0.0);
    let columns: Vec<Vec<f64>> = (0..matrix.criterion_count())
        .map(|j| normalize::column(&normalized, j))
        .collect();
    let direct = correlation_matrix(&columns)
        .into_iter()
        .enumerate()
        .map(|(j, row)| {
            row.into_iter()
                .enumerate()
                .map(|(k, r)| if j == k { 0.0 } else { r.abs() })
                .collect()
        })
        .collect();
    total_relation(matrix.criteria(), direct, DATA_SCALE_MARGIN)
}

fn total_relation(
    criteria: &[Criterion],
    direct: Vec<Vec<f64>>,
    margin: f64,
) -> Result<MethodWeights, McdmError> {
    let n = criteria.len();
    let max_row = direct
        .iter()
        .map(|row| row.iter().sum::<f64>())
        .fold(0.0, f64::max);
    let max_sum = if margin > 0.0 {
        let max_col = (0..n)
            .map(|j| direct.iter().map(|row| row[j]).sum::<f64>())
            .fold(0.0, f64::max);
        max_row.max(max_col) * (1.0 + margin)
    } else {
        max_row
    };
    let scale = if max_sum > 0.0 { 1.0 / max_sum } else { 0.0 };

    let x = DMatrix::<f64>::from_fn(n, n, |r, c| direct[r][c] * scale);
    let lu = (DMatrix::<f64>::identity(n, n) - &x).lu();
    let pivots = lu.u().diagonal();
    let largest = pivots.amax();
    if largest <= 0.0 || pivots.amin() / largest < PIVOT_TOLERANCE {
        return Err(McdmError::SingularMatrix {
            method: "DEMATEL".to_string(),
        });
    }
    let inverse = lu.try_inverse().ok_or_else(|| McdmError::SingularMatrix {
        method: "DEMATEL".to_string(),
    })?;
    let total = &x * inverse;

    let influence: Vec<f64> = (0..n).map(|i| total.row(i).sum()).collect();
    let dependence: Vec<f64> = (0..n).map(|j| total.column(j).sum()).collect();
    let prominence: Vec<f64> = influence.iter().zip(&dependence).map(|(d, r)| d + r).collect();
    let relation: Vec<f64> = influence.iter().zip(&dependence).map(|(d, r)| d - r).collect();
    let weights = normalize_or_equal(&prominence);

    let ids = criterion_ids(criteria);
    let rows = |m: &DMatrix<f64>| -> Vec<Vec<f64>> {
        (0..n).map(|i| (0..n).map(|j| m[(i, j)]).collect()).collect()
    };
    let mut metrics = Diagnostics::new();
    metrics.table("directRelationMatrix", &ids, &ids, &direct);
    metrics.table("normalizedDirectRelationMatrix", &ids, &ids, &rows(&x));
    metrics.table("totalRelationMatrix", &ids, &ids, &rows(&total));
    metrics.vector("influence", &ids, &influence);
    metrics.vector("dependence", &ids, &dependence);
    metrics.vector("prominence", &ids, &prominence);
    metrics.vector("relation", &ids, &relation);
    Ok(MethodWeights { weights, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::{criteria, matrix, suppliers};
    use crate::matrix::CriterionType::Beneficial as B;

    #[test]
    fn mutual_full_influence_is_singular() {
        let crits = criteria(&[B, B], &[0.5, 0.5]);
        let err = from_influence(&crits, &[vec![0.0, 1.0], vec![1.0, 0.0]]).expect_err("singular");
        assert_eq!(
            err,
            McdmError::SingularMatrix {
                method: "DEMATEL".to_string()
            }
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn total_relation_follows_series_expansion() {
        // X = [[0, 1], [0, 0]] is nilpotent so T = X
        let crits = criteria(&[B, B], &[0.5, 0.5]);
        let out = from_influence(&crits, &[vec![0.0, 2.0], vec![0.0, 0.0]]).expect("dematel");
        let t = out
            .metrics
            .table_value("totalRelationMatrix", "C1", "C2")
            .expect("t12");
        assert!((t - 1.0).abs() < 1e-12);
        let relation = out.metrics.vector_value("relation", "C1").expect("relation");
        assert!((relation - 1.0).abs() < 1e-12);
        assert!((out.weights[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_wrong_shape() {
        let crits = criteria(&[B, B, B], &[0.0; 3]);
        assert!(matches!(
            from_influence(&crits, &[vec![0.0, 1.0], vec![1.0, 0.0]]),
            Err(McdmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn data_driven_two_criteria_is_invertible() {
        let m = matrix(&[&[1.0, 2.0], &[2.0, 1.0], &[3.0, 5.0]], &[B, B], &[0.5, 0.5]);
        let out = from_data(&m).expect("dematel");
        assert!((out.weights[0] - 0.5).abs() < 1e-9);
        assert!((out.weights[1] - 0.5).abs() < 1e-9);
        let x = out
            .metrics
            .table_value("normalizedDirectRelationMatrix", "C1", "C2")
            .expect("x12");
        assert!((x - 1.0 / 1.01).abs() < 1e-12);
    }

    #[test]
    fn tiny_determinant_with_even_pivots_is_accepted() {
        // I - X is upper bidiagonal with 0.05 on the diagonal, det = 0.05^10
        let crits = criteria(&[B; 10], &[0.1; 10]);
        let direct: Vec<Vec<f64>> = (0..10)
            .map(|i| {
                (0..10)
                    .map(|j| match j {
                        _ if j == i => 0.95,
                        _ if j == i + 1 => 0.05,
                        _ => 0.0,
                    })
                    .collect()
            })
            .collect();
        let out = from_influence(&crits, &direct).expect("dematel");
        let total: f64 = out.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(out.weights.iter().all(|w| w.is_finite() && *w > 0.0));
    }

    #[test]
    fn data_driven_variant_produces_weights() {
        let out = from_data(&suppliers()).expect("dematel");
        let total: f64 = out.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
