pub mod compare;
pub mod sensitivity;

pub use compare::compare;
pub use sensitivity::{sensitivity, DEFAULT_VARIATIONS};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matrix::Diagnostics;
use crate::ranking::{RankMethod, RankingEntry, RankingResult};

/// Rank of one alternative under every compared method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeRanks {
    pub alternative_id: String,
    pub alternative_name: String,
    pub ranks: BTreeMap<String, usize>,
    pub mean_rank: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub methods: Vec<RankMethod>,
    pub results: Vec<RankingResult>,
    pub rank_table: Vec<AlternativeRanks>,
    /// Spearman coefficient for every ordered pair of methods, keyed by method slug.
    pub correlations: Diagnostics,
    /// Alternatives ordered by mean rank; `score` holds the mean rank.
    pub consensus: Vec<RankingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub variation: f64,
    pub weights: BTreeMap<String, f64>,
    pub ranking: Vec<RankingEntry>,
    pub best: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CriterionSensitivity {
    pub criterion_id: String,
    pub criterion_name: String,
    pub points: Vec<SensitivityPoint>,
    /// The best alternative never changed across this criterion's variations.
    pub stable: bool,
    pub best_alternatives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityReport {
    pub method: RankMethod,
    pub variations: Vec<f64>,
    pub baseline: RankingResult,
    pub criteria: Vec<CriterionSensitivity>,
}

impl SensitivityReport {
    pub fn is_stable(&self) -> bool {
        self.criteria.iter().all(|c| c.stable)
    }

    pub fn unstable_criteria(&self) -> Vec<&str> {
        self.criteria
            .iter()
            .filter(|c| !c.stable)
            .map(|c| c.criterion_id.as_str())
            .collect()
    }
}
