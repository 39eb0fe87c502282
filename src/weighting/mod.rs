pub mod ahp;
pub mod critic;
pub mod dematel;
pub mod dispersion;
pub mod distance;
pub mod entropy;
pub mod lopcow;
pub mod merec;
pub mod sequential;
pub mod subjective;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::McdmError;
use crate::matrix::{
    finite_or_zero, validate_criteria, Alternative, Criterion, DecisionMatrix, Diagnostics,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WeightMethod {
    Entropy,
    Critic,
    Ahp,
    Piprecia,
    Merec,
    Swara,
    Wenslo,
    Lopcow,
    Dematel,
    Sd,
    Variance,
    Mad,
    Dbw,
    Svp,
    Mdm,
    Lsw,
    Gpow,
    Lpwm,
    Pcwm,
    Roc,
    Rr,
    Equal,
    Custom,
}

impl WeightMethod {
    pub const ALL: [WeightMethod; 23] = [
        WeightMethod::Entropy,
        WeightMethod::Critic,
        WeightMethod::Ahp,
        WeightMethod::Piprecia,
        WeightMethod::Merec,
        WeightMethod::Swara,
        WeightMethod::Wenslo,
        WeightMethod::Lopcow,
        WeightMethod::Dematel,
        WeightMethod::Sd,
        WeightMethod::Variance,
        WeightMethod::Mad,
        WeightMethod::Dbw,
        WeightMethod::Svp,
        WeightMethod::Mdm,
        WeightMethod::Lsw,
        WeightMethod::Gpow,
        WeightMethod::Lpwm,
        WeightMethod::Pcwm,
        WeightMethod::Roc,
        WeightMethod::Rr,
        WeightMethod::Equal,
        WeightMethod::Custom,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Entropy => "entropy",
            Self::Critic => "critic",
            Self::Ahp => "ahp",
            Self::Piprecia => "piprecia",
            Self::Merec => "merec",
            Self::Swara => "swara",
            Self::Wenslo => "wenslo",
            Self::Lopcow => "lopcow",
            Self::Dematel => "dematel",
            Self::Sd => "sd",
            Self::Variance => "variance",
            Self::Mad => "mad",
            Self::Dbw => "dbw",
            Self::Svp => "svp",
            Self::Mdm => "mdm",
            Self::Lsw => "lsw",
            Self::Gpow => "gpow",
            Self::Lpwm => "lpwm",
            Self::Pcwm => "pcwm",
            Self::Roc => "roc",
            Self::Rr => "rr",
            Self::Equal => "equal",
            Self::Custom => "custom",
        }
    }

    /// Methods driven by decision-maker input rather than by the score table.
    pub fn is_subjective(&self) -> bool {
        matches!(
            self,
            Self::Ahp
                | Self::Piprecia
                | Self::Swara
                | Self::Roc
                | Self::Rr
                | Self::Equal
                | Self::Custom
        )
    }
}

impl Display for WeightMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Entropy => "Entropy",
            Self::Critic => "CRITIC",
            Self::Ahp => "AHP",
            Self::Piprecia => "PIPRECIA",
            Self::Merec => "MEREC",
            Self::Swara => "SWARA",
            Self::Wenslo => "WENSLO",
            Self::Lopcow => "LOPCOW",
            Self::Dematel => "DEMATEL",
            Self::Sd => "SD",
            Self::Variance => "Variance",
            Self::Mad => "MAD",
            Self::Dbw => "DBW",
            Self::Svp => "SVP",
            Self::Mdm => "MDM",
            Self::Lsw => "LSW",
            Self::Gpow => "GPOW",
            Self::Lpwm => "LPWM",
            Self::Pcwm => "PCWM",
            Self::Roc => "ROC",
            Self::Rr => "RR",
            Self::Equal => "Equal",
            Self::Custom => "Custom",
        };
        write!(f, "{display}")
    }
}

impl FromStr for WeightMethod {
    type Err = McdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_suffix("-weights")
            .or_else(|| normalized.strip_suffix("_weights"))
            .unwrap_or(&normalized);
        match normalized {
            "entropy" => Ok(Self::Entropy),
            "critic" => Ok(Self::Critic),
            "ahp" => Ok(Self::Ahp),
            "piprecia" => Ok(Self::Piprecia),
            "merec" => Ok(Self::Merec),
            "swara" => Ok(Self::Swara),
            "wenslo" => Ok(Self::Wenslo),
            "lopcow" => Ok(Self::Lopcow),
            "dematel" => Ok(Self::Dematel),
            "sd" | "std" | "standard-deviation" => Ok(Self::Sd),
            "variance" => Ok(Self::Variance),
            "mad" | "mean-absolute-deviation" => Ok(Self::Mad),
            "dbw" => Ok(Self::Dbw),
            "svp" => Ok(Self::Svp),
            "mdm" => Ok(Self::Mdm),
            "lsw" => Ok(Self::Lsw),
            "gpow" => Ok(Self::Gpow),
            "lpwm" => Ok(Self::Lpwm),
            "pcwm" => Ok(Self::Pcwm),
            "roc" | "rank-order-centroid" => Ok(Self::Roc),
            "rr" | "rank-reciprocal" => Ok(Self::Rr),
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            _ => Err(McdmError::UnsupportedMethod {
                kind: "weighting",
                name: s.to_string(),
            }),
        }
    }
}

/// Decision-maker inputs; maps are keyed by criterion id, matrices follow criteria order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairwise_matrix: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorities: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranks: Option<BTreeMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_weights: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub influence_matrix: Option<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightResult {
    pub method: WeightMethod,
    pub weights: BTreeMap<String, f64>,
    pub metrics: Diagnostics,
}

impl WeightResult {
    /// Weights in the order of `criteria`; unknown ids get 0.
    pub fn weight_vector(&self, criteria: &[Criterion]) -> Vec<f64> {
        criteria
            .iter()
            .map(|c| self.weights.get(&c.id).copied().unwrap_or(0.0))
            .collect()
    }

    pub fn apply(&self, criteria: &mut [Criterion]) {
        for criterion in criteria.iter_mut() {
            if let Some(weight) = self.weights.get(&criterion.id) {
                criterion.weight = *weight;
            }
        }
    }
}

/// Output of a single weighting engine, weights in criteria order.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodWeights {
    pub weights: Vec<f64>,
    pub metrics: Diagnostics,
}

pub fn calculate_weights(
    method: WeightMethod,
    alternatives: &[Alternative],
    criteria: &[Criterion],
    params: &WeightParams,
) -> Result<WeightResult, McdmError> {
    validate_criteria(criteria)?;
    if criteria.len() < 2 {
        return Err(McdmError::InsufficientData {
            method: method.to_string(),
            min_alternatives: if method.is_subjective() { 0 } else { 2 },
            min_criteria: 2,
            alternatives: alternatives.len(),
            criteria: criteria.len(),
        });
    }
    debug!(
        method = %method,
        alternatives = alternatives.len(),
        criteria = criteria.len(),
        "calculating weights"
    );

    let data = || -> Result<DecisionMatrix, McdmError> {
        let matrix = DecisionMatrix::new(alternatives.to_vec(), criteria.to_vec())?;
        matrix.require(&method.to_string(), 2, 2)?;
        Ok(matrix)
    };

    let output = match method {
        WeightMethod::Entropy => entropy::entropy(&data()?),
        WeightMethod::Critic => critic::critic(&data()?),
        WeightMethod::Ahp => ahp::ahp(criteria, params)?,
        WeightMethod::Piprecia => sequential::piprecia(criteria, params)?,
        WeightMethod::Merec => merec::merec(&data()?),
        WeightMethod::Swara => sequential::swara(criteria, params)?,
        WeightMethod::Wenslo => dispersion::wenslo(&data()?),
        WeightMethod::Lopcow => lopcow::lopcow(&data()?),
        WeightMethod::Dematel => match &params.influence_matrix {
            Some(direct) => dematel::from_influence(criteria, direct)?,
            None => dematel::from_data(&data()?)?,
        },
        WeightMethod::Sd => dispersion::standard_deviation(&data()?),
        WeightMethod::Variance => dispersion::variance(&data()?),
        WeightMethod::Mad => dispersion::mean_absolute_deviation(&data()?),
        WeightMethod::Dbw => dispersion::distance_based(&data()?),
        WeightMethod::Svp => dispersion::statistical_variance(&data()?),
        WeightMethod::Mdm => distance::mdm(&data()?),
        WeightMethod::Lsw => distance::lsw(&data()?),
        WeightMethod::Gpow => distance::gpow(&data()?),
        WeightMethod::Lpwm => distance::lpwm(&data()?),
        WeightMethod::Pcwm => distance::pcwm(&data()?),
        WeightMethod::Roc => subjective::roc(criteria, params)?,
        WeightMethod::Rr => subjective::rr(criteria, params)?,
        WeightMethod::Equal => subjective::equal(criteria),
        WeightMethod::Custom => subjective::custom(criteria, params)?,
    };

    let weights = criteria
        .iter()
        .zip(&output.weights)
        .map(|(c, w)| (c.id.clone(), finite_or_zero(*w)))
        .collect();
    Ok(WeightResult {
        method,
        weights,
        metrics: output.metrics,
    })
}

/// Weights for an already validated matrix, returned as a re-weighted copy.
pub fn reweight(
    method: WeightMethod,
    matrix: &DecisionMatrix,
    params: &WeightParams,
) -> Result<(DecisionMatrix, WeightResult), McdmError> {
    let result = calculate_weights(method, matrix.alternatives(), matrix.criteria(), params)?;
    let weighted = matrix.with_weights(&result.weight_vector(matrix.criteria()))?;
    Ok((weighted, result))
}

/// Looks up one entry per criterion in an id-keyed parameter map.
pub(crate) fn per_criterion<T: Copy>(
    method: WeightMethod,
    name: &str,
    map: Option<&BTreeMap<String, T>>,
    criteria: &[Criterion],
) -> Result<Vec<T>, McdmError> {
    let Some(map) = map else {
        return Err(McdmError::missing_parameter(method.to_string(), name));
    };
    criteria
        .iter()
        .map(|c| {
            map.get(&c.id).copied().ok_or_else(|| {
                McdmError::missing_parameter(method.to_string(), format!("{name}.{}", c.id))
            })
        })
        .collect()
}

pub(crate) fn criterion_ids(criteria: &[Criterion]) -> Vec<&str> {
    criteria.iter().map(|c| c.id.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::suppliers;

    fn params_for(matrix: &DecisionMatrix) -> WeightParams {
        let ids = matrix.criterion_ids();
        let keyed = |values: &[f64]| -> BTreeMap<String, f64> {
            ids.iter().map(|id| id.to_string()).zip(values.iter().copied()).collect()
        };
        WeightParams {
            pairwise_matrix: None,
            priorities: Some(keyed(&[4.0, 3.0, 2.0, 1.0])),
            coefficients: Some(keyed(&[0.0, 0.3, 0.2, 0.1])),
            ranks: Some(ids.iter().map(|id| id.to_string()).zip([1, 2, 2, 4]).collect()),
            custom_weights: Some(keyed(&[5.0, 3.0, 1.0, 1.0])),
            influence_matrix: Some(vec![
                vec![0.0, 3.0, 2.0, 1.0],
                vec![1.0, 0.0, 1.0, 2.0],
                vec![2.0, 1.0, 0.0, 1.0],
                vec![1.0, 2.0, 1.0, 0.0],
            ]),
        }
    }

    #[test]
    fn every_method_yields_weights_summing_to_one() {
        let matrix = suppliers();
        let params = params_for(&matrix);
        for method in WeightMethod::ALL {
            let result = calculate_weights(method, matrix.alternatives(), matrix.criteria(), &params)
                .unwrap_or_else(|e| panic!("{method} failed: {e}"));
            let total: f64 = result.weights.values().sum();
            assert!((total - 1.0).abs() < 1e-9, "{method} sums to {total}");
            assert!(
                result.weights.values().all(|w| w.is_finite() && *w >= 0.0),
                "{method} produced {:?}",
                result.weights
            );
        }
    }

    #[test]
    fn every_method_is_deterministic() {
        let matrix = suppliers();
        let params = params_for(&matrix);
        for method in WeightMethod::ALL {
            let first = calculate_weights(method, matrix.alternatives(), matrix.criteria(), &params)
                .expect("first run");
            let second = calculate_weights(method, matrix.alternatives(), matrix.criteria(), &params)
                .expect("second run");
            assert_eq!(first, second, "{method} is not reproducible");
        }
    }

    #[test]
    fn rejects_single_criterion_and_single_alternative() {
        let matrix = suppliers();
        let params = WeightParams::default();
        let err = calculate_weights(
            WeightMethod::Equal,
            matrix.alternatives(),
            &matrix.criteria()[..1],
            &params,
        )
        .expect_err("one criterion");
        assert!(matches!(err, McdmError::InsufficientData { .. }));

        let err = calculate_weights(
            WeightMethod::Critic,
            &matrix.alternatives()[..1],
            matrix.criteria(),
            &params,
        )
        .expect_err("one alternative");
        assert!(matches!(err, McdmError::InsufficientData { .. }));

        // subjective methods do not need a score table
        let equal = calculate_weights(WeightMethod::Equal, &[], matrix.criteria(), &params)
            .expect("equal without alternatives");
        assert_eq!(equal.weights.len(), 4);
    }

    #[test]
    fn parses_method_names_and_aliases() {
        assert_eq!("CRITIC".parse::<WeightMethod>(), Ok(WeightMethod::Critic));
        assert_eq!(
            "entropy-weights".parse::<WeightMethod>(),
            Ok(WeightMethod::Entropy)
        );
        assert_eq!(" std ".parse::<WeightMethod>(), Ok(WeightMethod::Sd));
        for method in WeightMethod::ALL {
            assert_eq!(method.as_slug().parse::<WeightMethod>(), Ok(method));
        }
        assert!(matches!(
            "bogus".parse::<WeightMethod>(),
            Err(McdmError::UnsupportedMethod { kind: "weighting", .. })
        ));
    }

    #[test]
    fn reweight_applies_result_to_matrix() {
        let matrix = suppliers();
        let (weighted, result) =
            reweight(WeightMethod::Equal, &matrix, &WeightParams::default()).expect("equal");
        assert_eq!(weighted.weights(), vec![0.25; 4]);
        assert_eq!(result.weight_vector(matrix.criteria()), vec![0.25; 4]);
    }
}
