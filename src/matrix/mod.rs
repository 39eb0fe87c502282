pub mod diagnostics;
pub mod normalize;
pub mod stats;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::McdmError;

pub use diagnostics::{finite_or_zero, Diagnostic, Diagnostics};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CriterionType {
    #[serde(rename = "beneficial", alias = "benefit", alias = "max")]
    Beneficial,
    #[serde(
        rename = "non-beneficial",
        alias = "non_beneficial",
        alias = "cost",
        alias = "min"
    )]
    NonBeneficial,
}

impl CriterionType {
    pub fn is_beneficial(self) -> bool {
        matches!(self, Self::Beneficial)
    }
}

impl Display for CriterionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Beneficial => "beneficial",
            Self::NonBeneficial => "non-beneficial",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CriterionType,
    #[serde(default)]
    pub weight: f64,
}

impl Criterion {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: CriterionType,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alternative {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl Alternative {
    pub fn new<K: Into<String>>(
        id: impl Into<String>,
        name: impl Into<String>,
        scores: impl IntoIterator<Item = (K, f64)>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scores: scores.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Alternatives x criteria table with every score present, finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMatrix {
    alternatives: Vec<Alternative>,
    criteria: Vec<Criterion>,
    values: Vec<Vec<f64>>,
}

impl DecisionMatrix {
    pub fn new(alternatives: Vec<Alternative>, criteria: Vec<Criterion>) -> Result<Self, McdmError> {
        if alternatives.is_empty() {
            return Err(McdmError::EmptyAlternatives);
        }
        validate_criteria(&criteria)?;
        ensure_unique("alternative", alternatives.iter().map(|a| a.id.as_str()))?;

        let mut values = Vec::with_capacity(alternatives.len());
        for alternative in &alternatives {
            let mut row = Vec::with_capacity(criteria.len());
            for criterion in &criteria {
                let Some(value) = alternative.scores.get(&criterion.id).copied() else {
                    return Err(McdmError::MissingScore {
                        alternative: alternative.id.clone(),
                        criterion: criterion.id.clone(),
                    });
                };
                if !value.is_finite() || value < 0.0 {
                    return Err(McdmError::InvalidScore {
                        alternative: alternative.id.clone(),
                        criterion: criterion.id.clone(),
                        value,
                    });
                }
                row.push(value);
            }
            values.push(row);
        }

        Ok(Self {
            alternatives,
            criteria,
            values,
        })
    }

    /// Builds a matrix from bare rows, naming alternatives `A1..Am`.
    pub fn from_rows(rows: Vec<Vec<f64>>, criteria: Vec<Criterion>) -> Result<Self, McdmError> {
        let alternatives = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let id = format!("A{}", i + 1);
                let scores = criteria
                    .iter()
                    .zip(row)
                    .map(|(c, v)| (c.id.clone(), v))
                    .collect::<Vec<_>>();
                Alternative::new(id.clone(), id, scores)
            })
            .collect();
        Self::new(alternatives, criteria)
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    pub fn value(&self, alternative: usize, criterion: usize) -> f64 {
        self.values[alternative][criterion]
    }

    pub fn column(&self, criterion: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[criterion]).collect()
    }

    pub fn columns(&self) -> Vec<Vec<f64>> {
        (0..self.criterion_count()).map(|j| self.column(j)).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.criteria.iter().map(|c| c.weight).collect()
    }

    pub fn is_beneficial(&self, criterion: usize) -> bool {
        self.criteria[criterion].kind.is_beneficial()
    }

    pub fn alternative_ids(&self) -> Vec<&str> {
        self.alternatives.iter().map(|a| a.id.as_str()).collect()
    }

    pub fn criterion_ids(&self) -> Vec<&str> {
        self.criteria.iter().map(|c| c.id.as_str()).collect()
    }

    /// Same scores, criteria re-weighted in criteria order.
    pub fn with_weights(&self, weights: &[f64]) -> Result<Self, McdmError> {
        if weights.len() != self.criteria.len() {
            return Err(McdmError::invalid_parameter(
                "weights",
                format!(
                    "expected {} weights, got {}",
                    self.criteria.len(),
                    weights.len()
                ),
            ));
        }
        let mut next = self.clone();
        for (criterion, weight) in next.criteria.iter_mut().zip(weights) {
            criterion.weight = *weight;
        }
        validate_criteria(&next.criteria)?;
        Ok(next)
    }

    pub fn require(
        &self,
        method: &str,
        min_alternatives: usize,
        min_criteria: usize,
    ) -> Result<(), McdmError> {
        if self.alternative_count() < min_alternatives || self.criterion_count() < min_criteria {
            return Err(McdmError::InsufficientData {
                method: method.to_string(),
                min_alternatives,
                min_criteria,
                alternatives: self.alternative_count(),
                criteria: self.criterion_count(),
            });
        }
        Ok(())
    }
}

pub fn validate_criteria(criteria: &[Criterion]) -> Result<(), McdmError> {
    if criteria.is_empty() {
        return Err(McdmError::EmptyCriteria);
    }
    ensure_unique("criterion", criteria.iter().map(|c| c.id.as_str()))?;
    for criterion in criteria {
        if !criterion.weight.is_finite() || criterion.weight < 0.0 {
            return Err(McdmError::InvalidWeight {
                criterion: criterion.id.clone(),
                value: criterion.weight,
            });
        }
    }
    Ok(())
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), McdmError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(McdmError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Criterion, CriterionType, DecisionMatrix};

    pub fn criteria(kinds: &[CriterionType], weights: &[f64]) -> Vec<Criterion> {
        kinds
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(j, (kind, weight))| {
                Criterion::new(format!("C{}", j + 1), format!("Criterion {}", j + 1), *kind, *weight)
            })
            .collect()
    }

    pub fn matrix(rows: &[&[f64]], kinds: &[CriterionType], weights: &[f64]) -> DecisionMatrix {
        DecisionMatrix::from_rows(
            rows.iter().map(|r| r.to_vec()).collect(),
            criteria(kinds, weights),
        )
        .expect("valid test matrix")
    }

    /// Four suppliers: price (cost), quality, delivery days (cost), capacity.
    pub fn suppliers() -> DecisionMatrix {
        use CriterionType::{Beneficial as B, NonBeneficial as N};
        matrix(
            &[
                &[250.0, 16.0, 12.0, 5.0],
                &[200.0, 16.0, 8.0, 3.0],
                &[300.0, 32.0, 16.0, 4.0],
                &[275.0, 32.0, 8.0, 4.0],
            ],
            &[N, B, N, B],
            &[0.3, 0.3, 0.2, 0.2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{criteria, suppliers};
    use super::*;
    use crate::error::McdmError;

    #[test]
    fn rejects_missing_scores() {
        let crits = criteria(&[CriterionType::Beneficial, CriterionType::Beneficial], &[0.5, 0.5]);
        let alt = Alternative::new("a", "A", [("C1", 1.0)]);
        let err = DecisionMatrix::new(vec![alt], crits).expect_err("missing C2");
        assert_eq!(
            err,
            McdmError::MissingScore {
                alternative: "a".to_string(),
                criterion: "C2".to_string()
            }
        );
    }

    #[test]
    fn rejects_negative_and_non_finite_scores() {
        let crits = criteria(&[CriterionType::Beneficial], &[1.0]);
        let negative = Alternative::new("a", "A", [("C1", -1.0)]);
        assert!(matches!(
            DecisionMatrix::new(vec![negative], crits.clone()),
            Err(McdmError::InvalidScore { .. })
        ));
        let nan = Alternative::new("a", "A", [("C1", f64::NAN)]);
        assert!(matches!(
            DecisionMatrix::new(vec![nan], crits),
            Err(McdmError::InvalidScore { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_ids_and_bad_weights() {
        let mut crits = criteria(&[CriterionType::Beneficial, CriterionType::Beneficial], &[0.5, 0.5]);
        crits[1].id = "C1".to_string();
        let alt = Alternative::new("a", "A", [("C1", 1.0)]);
        assert!(matches!(
            DecisionMatrix::new(vec![alt.clone()], crits),
            Err(McdmError::DuplicateId { kind: "criterion", .. })
        ));
        let crits = criteria(&[CriterionType::Beneficial], &[-0.2]);
        assert!(matches!(
            DecisionMatrix::new(vec![alt], crits),
            Err(McdmError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn with_weights_replaces_weights_in_order() {
        let matrix = suppliers();
        let reweighted = matrix
            .with_weights(&[0.1, 0.2, 0.3, 0.4])
            .expect("valid weights");
        assert_eq!(reweighted.weights(), vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(reweighted.rows(), matrix.rows());
        assert!(matrix.with_weights(&[0.5, 0.5]).is_err());
    }

    #[test]
    fn parses_criterion_type_aliases() {
        let json = r#"[{"id":"c1","name":"Cost","type":"cost"},{"id":"c2","name":"Q","type":"beneficial","weight":0.4}]"#;
        let parsed: Vec<Criterion> = serde_json::from_str(json).expect("criteria json");
        assert_eq!(parsed[0].kind, CriterionType::NonBeneficial);
        assert_eq!(parsed[0].weight, 0.0);
        assert_eq!(parsed[1].kind, CriterionType::Beneficial);
    }
}
