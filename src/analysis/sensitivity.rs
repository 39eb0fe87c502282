use std::collections::BTreeMap;

use tracing::debug;

use crate::analysis::{CriterionSensitivity, SensitivityPoint, SensitivityReport};
use crate::error::McdmError;
use crate::matrix::DecisionMatrix;
use crate::ranking::{self, RankMethod, RankingParams};

pub const DEFAULT_VARIATIONS: [f64; 7] = [-30.0, -20.0, -10.0, 0.0, 10.0, 20.0, 30.0];

/// Re-ranks after scaling one criterion weight at a time by `1 + v / 100` and
/// renormalizing all weights.
pub fn sensitivity(
    method: RankMethod,
    matrix: &DecisionMatrix,
    params: &RankingParams,
    variations: &[f64],
) -> Result<SensitivityReport, McdmError> {
    if variations.is_empty() {
        return Err(McdmError::invalid_parameter(
            "variations",
            "at least one variation is required",
        ));
    }
    if let Some(bad) = variations.iter().find(|v| !v.is_finite() || **v <= -100.0) {
        return Err(McdmError::invalid_parameter(
            "variations",
            format!("percentages must be greater than -100, got {bad}"),
        ));
    }

    let baseline = ranking::rank(method, matrix, params)?;
    let base_weights = matrix.weights();
    debug!(
        method = %method,
        criteria = base_weights.len(),
        points = variations.len(),
        "running weight sensitivity"
    );

    let mut criteria = Vec::with_capacity(base_weights.len());
    for (j, criterion) in matrix.criteria().iter().enumerate() {
        let mut points = Vec::with_capacity(variations.len());
        for variation in variations {
            let weights = varied_weights(method, &base_weights, j, *variation)?;
            let varied = matrix.with_weights(&weights)?;
            let result = ranking::rank(method, &varied, params)?;
            points.push(SensitivityPoint {
                variation: *variation,
                weights: matrix
                    .criterion_ids()
                    .into_iter()
                    .map(str::to_string)
                    .zip(weights)
                    .collect::<BTreeMap<_, _>>(),
                best: result.best().map(|e| e.alternative_id.clone()),
                ranking: result.ranking,
            });
        }

        let mut best_alternatives: Vec<String> = Vec::new();
        for best in points.iter().filter_map(|p| p.best.as_ref()) {
            if !best_alternatives.contains(best) {
                best_alternatives.push(best.clone());
            }
        }
        criteria.push(CriterionSensitivity {
            criterion_id: criterion.id.clone(),
            criterion_name: criterion.name.clone(),
            stable: best_alternatives.len() <= 1,
            best_alternatives,
            points,
        });
    }

    Ok(SensitivityReport {
        method,
        variations: variations.to_vec(),
        baseline,
        criteria,
    })
}

fn varied_weights(
    method: RankMethod,
    base: &[f64],
    criterion: usize,
    variation: f64,
) -> Result<Vec<f64>, McdmError> {
    let scaled: Vec<f64> = base
        .iter()
        .enumerate()
        .map(|(j, w)| if j == criterion { w * (1.0 + variation / 100.0) } else { *w })
        .collect();
    let total: f64 = scaled.iter().sum();
    if total <= 0.0 {
        return Err(McdmError::AllZeroWeights {
            method: method.to_string(),
        });
    }
    Ok(scaled.iter().map(|w| w / total).collect())
}
