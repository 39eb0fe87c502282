//! Step-wise ratio methods over criteria in their listed order (SWARA, PIPRECIA).

use crate::error::McdmError;
use crate::matrix::{Criterion, Diagnostics};
use crate::weighting::{criterion_ids, MethodWeights, WeightMethod, WeightParams};

/// SWARA: `k_j = 1 + s_j`, `q_j = q_{j-1} / k_j`.
pub fn swara(criteria: &[Criterion], params: &WeightParams) -> Result<MethodWeights, McdmError> {
    let coefficients = coefficients(WeightMethod::Swara, criteria, params)?;
    for (criterion, s) in criteria.iter().zip(&coefficients).skip(1) {
        if !s.is_finite() || *s < 0.0 {
            return Err(McdmError::invalid_parameter(
                format!("coefficients.{}", criterion.id),
                format!("SWARA comparative importance must be non-negative, got {s}"),
            ));
        }
    }
    let factors: Vec<f64> = coefficients
        .iter()
        .enumerate()
        .map(|(j, s)| if j == 0 { 1.0 } else { 1.0 + s })
        .collect();
    Ok(chain(criteria, &coefficients, &factors))
}

/// PIPRECIA: `k_j = 2 - s_j` with `s_j` in `[0, 2)`.
pub fn piprecia(criteria: &[Criterion], params: &WeightParams) -> Result<MethodWeights, McdmError> {
    let coefficients = coefficients(WeightMethod::Piprecia, criteria, params)?;
    for (criterion, s) in criteria.iter().zip(&coefficients).skip(1) {
        if !s.is_finite() || !(0.0..2.0).contains(s) {
            return Err(McdmError::invalid_parameter(
                format!("coefficients.{}", criterion.id),
                format!("PIPRECIA relative importance must be in [0, 2), got {s}"),
            ));
        }
    }
    let factors: Vec<f64> = coefficients
        .iter()
        .enumerate()
        .map(|(j, s)| if j == 0 { 1.0 } else { 2.0 - s })
        .collect();
    Ok(chain(criteria, &coefficients, &factors))
}

/// The first criterion's coefficient is ignored and may be omitted.
fn coefficients(
    method: WeightMethod,
    criteria: &[Criterion],
    params: &WeightParams,
) -> Result<Vec<f64>, McdmError> {
    let Some(map) = &params.coefficients else {
        return Err(McdmError::missing_parameter(method.to_string(), "coefficients"));
    };
    criteria
        .iter()
        .enumerate()
        .map(|(j, c)| match map.get(&c.id) {
            _ if j == 0 => Ok(0.0),
            Some(value) => Ok(*value),
            None => Err(McdmError::missing_parameter(
                method.to_string(),
                format!("coefficients.{}", c.id),
            )),
        })
        .collect()
}

fn chain(criteria: &[Criterion], coefficients: &[f64], factors: &[f64]) -> MethodWeights {
    let mut preliminary = Vec::with_capacity(factors.len());
    let mut previous = 1.0;
    for (j, k) in factors.iter().enumerate() {
        let q = if j == 0 { 1.0 } else { previous / k };
        preliminary.push(q);
        previous = q;
    }
    let total: f64 = preliminary.iter().sum();
    let weights = preliminary.iter().map(|q| q / total).collect();

    let ids = criterion_ids(criteria);
    let mut metrics = Diagnostics::new();
    metrics.vector("coefficients", &ids, coefficients);
    metrics.vector("stepFactors", &ids, factors);
    metrics.vector("preliminaryWeights", &ids, &preliminary);
    MethodWeights { weights, metrics }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::matrix::testing::criteria;
    use crate::matrix::CriterionType::Beneficial as B;

    fn params(pairs: &[(&str, f64)]) -> WeightParams {
        WeightParams {
            coefficients: Some(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect::<BTreeMap<_, _>>(),
            ),
            ..WeightParams::default()
        }
    }

    #[test]
    fn swara_decreases_along_the_chain() {
        let crits = criteria(&[B, B, B], &[0.0; 3]);
        let out = swara(&crits, &params(&[("C2", 0.25), ("C3", 0.6)])).expect("swara");
        // q = 1, 0.8, 0.5
        assert!((out.weights[0] - 1.0 / 2.3).abs() < 1e-12);
        assert!((out.weights[1] - 0.8 / 2.3).abs() < 1e-12);
        assert!((out.weights[2] - 0.5 / 2.3).abs() < 1e-12);
    }

    #[test]
    fn piprecia_can_increase_weight() {
        let crits = criteria(&[B, B], &[0.0; 2]);
        let out = piprecia(&crits, &params(&[("C1", 9.0), ("C2", 1.5)])).expect("piprecia");
        // k2 = 0.5 so q2 = 2
        assert!((out.weights[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((out.weights[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_coefficients() {
        let crits = criteria(&[B, B], &[0.0; 2]);
        assert!(matches!(
            piprecia(&crits, &params(&[("C2", 2.0)])),
            Err(McdmError::InvalidParameter { .. })
        ));
        assert!(matches!(
            swara(&crits, &params(&[("C2", -0.1)])),
            Err(McdmError::InvalidParameter { .. })
        ));
        assert!(matches!(
            swara(&crits, &WeightParams::default()),
            Err(McdmError::MissingParameter { .. })
        ));
        assert!(matches!(
            swara(&criteria(&[B, B, B], &[0.0; 3]), &params(&[("C2", 0.1)])),
            Err(McdmError::MissingParameter { .. })
        ));
    }
}
