use crate::error::McdmError;
use crate::matrix::{Criterion, Diagnostics};
use crate::weighting::{criterion_ids, per_criterion, MethodWeights, WeightMethod, WeightParams};

/// Exactly `1/n` for every criterion.
pub fn equal(criteria: &[Criterion]) -> MethodWeights {
    let n = criteria.len();
    MethodWeights {
        weights: vec![1.0 / n as f64; n],
        metrics: Diagnostics::new(),
    }
}

/// Rank order centroid: `w_r = (1/n) sum_{k=r..n} 1/k`, tied ranks share the same value.
pub fn roc(criteria: &[Criterion], params: &WeightParams) -> Result<MethodWeights, McdmError> {
    let ranks = ranks(WeightMethod::Roc, criteria, params)?;
    let n = criteria.len();
    let raw: Vec<f64> = ranks
        .iter()
        .map(|r| {
            let start = (*r as usize).min(n);
            (start..=n).map(|k| 1.0 / k as f64).sum::<f64>() / n as f64
        })
        .collect();
    Ok(from_raw(criteria, &ranks, raw))
}

/// Rank reciprocal: `w_r` proportional to `1/r`.
pub fn rr(criteria: &[Criterion], params: &WeightParams) -> Result<MethodWeights, McdmError> {
    let ranks = ranks(WeightMethod::Rr, criteria, params)?;
    let raw = ranks.iter().map(|r| 1.0 / f64::from(*r)).collect();
    Ok(from_raw(criteria, &ranks, raw))
}

pub fn custom(criteria: &[Criterion], params: &WeightParams) -> Result<MethodWeights, McdmError> {
    let values = per_criterion(
        WeightMethod::Custom,
        "customWeights",
        params.custom_weights.as_ref(),
        criteria,
    )?;
    for (criterion, value) in criteria.iter().zip(&values) {
        if !value.is_finite() || *value < 0.0 {
            return Err(McdmError::invalid_parameter(
                format!("customWeights.{}", criterion.id),
                format!("weights must be finite and non-negative, got {value}"),
            ));
        }
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return Err(McdmError::AllZeroWeights {
            method: WeightMethod::Custom.to_string(),
        });
    }

    let ids = criterion_ids(criteria);
    let mut metrics = Diagnostics::new();
    metrics.vector("rawWeights", &ids, &values);
    Ok(MethodWeights {
        weights: values.iter().map(|v| v / total).collect(),
        metrics,
    })
}

fn ranks(
    method: WeightMethod,
    criteria: &[Criterion],
    params: &WeightParams,
) -> Result<Vec<u32>, McdmError> {
    let ranks = per_criterion(method, "ranks", params.ranks.as_ref(), criteria)?;
    for (criterion, rank) in criteria.iter().zip(&ranks) {
        if *rank == 0 {
            return Err(McdmError::invalid_parameter(
                format!("ranks.{}", criterion.id),
                "ranks start at 1",
            ));
        }
    }
    Ok(ranks)
}

fn from_raw(criteria: &[Criterion], ranks: &[u32], raw: Vec<f64>) -> MethodWeights {
    let total: f64 = raw.iter().sum();
    let ids = criterion_ids(criteria);
    let rank_values: Vec<f64> = ranks.iter().map(|r| f64::from(*r)).collect();
    let mut metrics = Diagnostics::new();
    metrics.vector("ranks", &ids, &rank_values);
    metrics.vector("rawWeights", &ids, &raw);
    MethodWeights {
        weights: raw.iter().map(|v| v / total).collect(),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::matrix::testing::criteria;
    use crate::matrix::CriterionType::Beneficial as B;

    fn ranked(ranks: &[u32]) -> WeightParams {
        WeightParams {
            ranks: Some(
                ranks
                    .iter()
                    .enumerate()
                    .map(|(j, r)| (format!("C{}", j + 1), *r))
                    .collect::<BTreeMap<_, _>>(),
            ),
            ..WeightParams::default()
        }
    }

    #[test]
    fn equal_is_exact() {
        let out = equal(&criteria(&[B, B, B], &[0.0; 3]));
        assert_eq!(out.weights, vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn roc_matches_closed_form() {
        let crits = criteria(&[B, B, B], &[0.0; 3]);
        let out = roc(&crits, &ranked(&[1, 2, 3])).expect("roc");
        assert!((out.weights[0] - 11.0 / 18.0).abs() < 1e-12);
        assert!((out.weights[1] - 5.0 / 18.0).abs() < 1e-12);
        assert!((out.weights[2] - 2.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn rank_reciprocal_handles_ties() {
        let crits = criteria(&[B, B, B], &[0.0; 3]);
        let out = rr(&crits, &ranked(&[1, 2, 2])).expect("rr");
        assert!((out.weights[0] - 0.5).abs() < 1e-12);
        assert!((out.weights[1] - 0.25).abs() < 1e-12);
        assert_eq!(out.weights[1], out.weights[2]);
    }

    #[test]
    fn rejects_zero_rank_and_missing_entries() {
        let crits = criteria(&[B, B], &[0.0; 2]);
        assert!(matches!(
            roc(&crits, &ranked(&[0, 1])),
            Err(McdmError::InvalidParameter { .. })
        ));
        assert!(matches!(
            rr(&crits, &ranked(&[1])),
            Err(McdmError::MissingParameter { .. })
        ));
    }

    #[test]
    fn custom_normalizes_and_rejects_bad_input() {
        let crits = criteria(&[B, B], &[0.0; 2]);
        let params = |a: f64, b: f64| WeightParams {
            custom_weights: Some(BTreeMap::from([("C1".to_string(), a), ("C2".to_string(), b)])),
            ..WeightParams::default()
        };
        let out = custom(&crits, &params(3.0, 1.0)).expect("custom");
        assert_eq!(out.weights, vec![0.75, 0.25]);
        assert!(matches!(
            custom(&crits, &params(-1.0, 2.0)),
            Err(McdmError::InvalidParameter { .. })
        ));
        assert!(matches!(
            custom(&crits, &params(0.0, 0.0)),
            Err(McdmError::AllZeroWeights { .. })
        ));
    }
}
