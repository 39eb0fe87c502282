use serde::{Deserialize, Serialize};

use crate::error::McdmError;
use crate::matrix::{Alternative, Criterion, DecisionMatrix};
use crate::ranking::{Direction, ParamOverrides, RankMethod};
use crate::weighting::{calculate_weights, reweight, WeightMethod, WeightParams, WeightResult};

/// A decision problem as read from an input file or a request body:
/// `{ alternatives, criteria, ...weighting inputs, ...ranking parameters }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(flatten)]
    pub weighting: WeightParams,
    #[serde(flatten)]
    pub ranking: ParamOverrides,
}

impl Problem {
    pub fn matrix(&self) -> Result<DecisionMatrix, McdmError> {
        DecisionMatrix::new(self.alternatives.clone(), self.criteria.clone())
    }

    pub fn weights(&self, method: WeightMethod) -> Result<WeightResult, McdmError> {
        calculate_weights(method, &self.alternatives, &self.criteria, &self.weighting)
    }

    /// Validated matrix, re-weighted first when a weighting method is given.
    pub fn prepare(
        &self,
        weighting: Option<WeightMethod>,
    ) -> Result<(DecisionMatrix, Option<WeightResult>), McdmError> {
        let matrix = self.matrix()?;
        match weighting {
            Some(method) => {
                let (weighted, result) = reweight(method, &matrix, &self.weighting)?;
                Ok((weighted, Some(result)))
            }
            None => Ok((matrix, None)),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeightMethodInfo {
    pub slug: &'static str,
    pub name: String,
    pub subjective: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankMethodInfo {
    pub slug: &'static str,
    pub name: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MethodCatalog {
    pub weighting: Vec<WeightMethodInfo>,
    pub ranking: Vec<RankMethodInfo>,
}

pub fn catalog() -> MethodCatalog {
    MethodCatalog {
        weighting: WeightMethod::ALL
            .iter()
            .map(|m| WeightMethodInfo {
                slug: m.as_slug(),
                name: m.to_string(),
                subjective: m.is_subjective(),
            })
            .collect(),
        ranking: RankMethod::ALL
            .iter()
            .map(|m| RankMethodInfo {
                slug: m.as_slug(),
                name: m.to_string(),
                direction: m.direction(),
            })
            .collect(),
    }
}
