pub mod additive;
pub mod ahp;
pub mod border;
pub mod compromise;
pub mod information;
pub mod outranking;
pub mod ratio;
pub mod reference;

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::McdmError;
use crate::matrix::{finite_or_zero, DecisionMatrix, Diagnostics};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RankMethod {
    Wsm,
    Wpm,
    Swei,
    Swi,
    Topsis,
    Waspas,
    Vikor,
    Edas,
    Copras,
    Moora,
    Multimoora,
    Todim,
    Codas,
    Moosra,
    Mairca,
    Mabac,
    Marcos,
    Ahp,
    Promethee,
    Promethee1,
    Promethee2,
    Electre,
    Electre1,
    Electre2,
    Cocoso,
    Gra,
    Aras,
}

impl RankMethod {
    pub const ALL: [RankMethod; 27] = [
        RankMethod::Wsm,
        RankMethod::Wpm,
        RankMethod::Swei,
        RankMethod::Swi,
        RankMethod::Topsis,
        RankMethod::Waspas,
        RankMethod::Vikor,
        RankMethod::Edas,
        RankMethod::Copras,
        RankMethod::Moora,
        RankMethod::Multimoora,
        RankMethod::Todim,
        RankMethod::Codas,
        RankMethod::Moosra,
        RankMethod::Mairca,
        RankMethod::Mabac,
        RankMethod::Marcos,
        RankMethod::Ahp,
        RankMethod::Promethee,
        RankMethod::Promethee1,
        RankMethod::Promethee2,
        RankMethod::Electre,
        RankMethod::Electre1,
        RankMethod::Electre2,
        RankMethod::Cocoso,
        RankMethod::Gra,
        RankMethod::Aras,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Wsm => "wsm",
            Self::Wpm => "wpm",
            Self::Swei => "swei",
            Self::Swi => "swi",
            Self::Topsis => "topsis",
            Self::Waspas => "waspas",
            Self::Vikor => "vikor",
            Self::Edas => "edas",
            Self::Copras => "copras",
            Self::Moora => "moora",
            Self::Multimoora => "multimoora",
            Self::Todim => "todim",
            Self::Codas => "codas",
            Self::Moosra => "moosra",
            Self::Mairca => "mairca",
            Self::Mabac => "mabac",
            Self::Marcos => "marcos",
            Self::Ahp => "ahp",
            Self::Promethee => "promethee",
            Self::Promethee1 => "promethee1",
            Self::Promethee2 => "promethee2",
            Self::Electre => "electre",
            Self::Electre1 => "electre1",
            Self::Electre2 => "electre2",
            Self::Cocoso => "cocoso",
            Self::Gra => "gra",
            Self::Aras => "aras",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Swei | Self::Swi | Self::Vikor | Self::Mairca | Self::Multimoora => {
                Direction::LowerIsBetter
            }
            _ => Direction::HigherIsBetter,
        }
    }
}

impl Display for RankMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Promethee1 => "PROMETHEE I",
            Self::Promethee2 => "PROMETHEE II",
            Self::Electre1 => "ELECTRE I",
            Self::Electre2 => "ELECTRE II",
            Self::Cocoso => "CoCoSo",
            other => return write!(f, "{}", other.as_slug().to_ascii_uppercase()),
        };
        write!(f, "{display}")
    }
}

impl FromStr for RankMethod {
    type Err = McdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        let alias = match normalized.as_str() {
            "prometheei" => "promethee1",
            "prometheeii" => "promethee2",
            "electrei" => "electre1",
            "electreii" => "electre2",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|m| m.as_slug() == alias)
            .ok_or_else(|| McdmError::UnsupportedMethod {
                kind: "ranking",
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Tunable method parameters; each only affects its own method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RankingParams {
    #[serde(alias = "vikorVValue")]
    pub vikor_v: f64,
    #[serde(alias = "waspasLambdaValue")]
    pub waspas_lambda: f64,
    #[serde(alias = "codasTauValue")]
    pub codas_tau: f64,
    pub gra_zeta: f64,
    pub todim_theta: f64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            vikor_v: 0.5,
            waspas_lambda: 0.5,
            codas_tau: 0.02,
            gra_zeta: 0.5,
            todim_theta: 1.0,
        }
    }
}

impl RankingParams {
    pub fn validate(&self) -> Result<(), McdmError> {
        let unit = |name: &str, value: f64| {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(McdmError::invalid_parameter(
                    name,
                    format!("must be within [0, 1], got {value}"),
                ))
            }
        };
        unit("vikorV", self.vikor_v)?;
        unit("waspasLambda", self.waspas_lambda)?;
        if !self.codas_tau.is_finite() || self.codas_tau < 0.0 {
            return Err(McdmError::invalid_parameter(
                "codasTau",
                format!("must be non-negative, got {}", self.codas_tau),
            ));
        }
        if !self.gra_zeta.is_finite() || self.gra_zeta <= 0.0 || self.gra_zeta > 1.0 {
            return Err(McdmError::invalid_parameter(
                "graZeta",
                format!("must be within (0, 1], got {}", self.gra_zeta),
            ));
        }
        if !self.todim_theta.is_finite() || self.todim_theta <= 0.0 {
            return Err(McdmError::invalid_parameter(
                "todimTheta",
                format!("must be positive, got {}", self.todim_theta),
            ));
        }
        Ok(())
    }

    pub fn with_overrides(mut self, overrides: &ParamOverrides) -> Self {
        if let Some(v) = overrides.vikor_v {
            self.vikor_v = v;
        }
        if let Some(v) = overrides.waspas_lambda {
            self.waspas_lambda = v;
        }
        if let Some(v) = overrides.codas_tau {
            self.codas_tau = v;
        }
        if let Some(v) = overrides.gra_zeta {
            self.gra_zeta = v;
        }
        if let Some(v) = overrides.todim_theta {
            self.todim_theta = v;
        }
        self
    }
}

/// Per-request parameter values; absent fields keep the configured defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParamOverrides {
    #[serde(default, alias = "vikorVValue", skip_serializing_if = "Option::is_none")]
    pub vikor_v: Option<f64>,
    #[serde(default, alias = "waspasLambdaValue", skip_serializing_if = "Option::is_none")]
    pub waspas_lambda: Option<f64>,
    #[serde(default, alias = "codasTauValue", skip_serializing_if = "Option::is_none")]
    pub codas_tau: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gra_zeta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todim_theta: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub alternative_id: String,
    pub alternative_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingResult {
    pub method: RankMethod,
    pub direction: Direction,
    pub ranking: Vec<RankingEntry>,
    pub metrics: Diagnostics,
}

impl RankingResult {
    pub fn best(&self) -> Option<&RankingEntry> {
        self.ranking.first()
    }

    pub fn rank_of(&self, alternative_id: &str) -> Option<usize> {
        self.ranking
            .iter()
            .find(|e| e.alternative_id == alternative_id)
            .map(|e| e.rank)
    }

    pub fn order(&self) -> Vec<&str> {
        self.ranking.iter().map(|e| e.alternative_id.as_str()).collect()
    }
}

/// Raw per-alternative scores of one engine, in alternative order.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodScores {
    pub scores: Vec<f64>,
    pub metrics: Diagnostics,
}

pub fn rank(
    method: RankMethod,
    matrix: &DecisionMatrix,
    params: &RankingParams,
) -> Result<RankingResult, McdmError> {
    params.validate()?;
    matrix.require(&method.to_string(), 1, 1)?;
    debug!(
        method = %method,
        alternatives = matrix.alternative_count(),
        criteria = matrix.criterion_count(),
        "ranking alternatives"
    );

    let output = match method {
        RankMethod::Wsm => additive::wsm(matrix),
        RankMethod::Wpm => additive::wpm(matrix),
        RankMethod::Swei => information::swei(matrix)?,
        RankMethod::Swi => information::swi(matrix)?,
        RankMethod::Topsis => reference::topsis(matrix),
        RankMethod::Waspas => additive::waspas(matrix, params.waspas_lambda),
        RankMethod::Vikor => reference::vikor(matrix, params.vikor_v),
        RankMethod::Edas => reference::edas(matrix),
        RankMethod::Copras => ratio::copras(matrix),
        RankMethod::Moora => ratio::moora(matrix),
        RankMethod::Multimoora => ratio::multimoora(matrix),
        RankMethod::Todim => compromise::todim(matrix, params.todim_theta),
        RankMethod::Codas => reference::codas(matrix, params.codas_tau),
        RankMethod::Moosra => ratio::moosra(matrix),
        RankMethod::Mairca => border::mairca(matrix),
        RankMethod::Mabac => border::mabac(matrix),
        RankMethod::Marcos => border::marcos(matrix),
        RankMethod::Ahp => ahp::ahp(matrix),
        RankMethod::Promethee => outranking::promethee(matrix),
        RankMethod::Promethee1 => outranking::promethee1(matrix),
        RankMethod::Promethee2 => outranking::promethee2(matrix),
        RankMethod::Electre => outranking::electre(matrix),
        RankMethod::Electre1 => outranking::electre1(matrix),
        RankMethod::Electre2 => outranking::electre2(matrix),
        RankMethod::Cocoso => compromise::cocoso(matrix),
        RankMethod::Gra => compromise::gra(matrix, params.gra_zeta),
        RankMethod::Aras => ratio::aras(matrix),
    };

    Ok(build_ranking(method, matrix, output))
}

pub fn rank_by_name(
    name: &str,
    matrix: &DecisionMatrix,
    params: &RankingParams,
) -> Result<RankingResult, McdmError> {
    let method: RankMethod = name.parse()?;
    rank(method, matrix, params)
}

fn build_ranking(method: RankMethod, matrix: &DecisionMatrix, output: MethodScores) -> RankingResult {
    let direction = method.direction();
    let scores: Vec<f64> = output.scores.iter().map(|s| finite_or_zero(*s)).collect();
    let ranking = sorted_order(&scores, direction)
        .into_iter()
        .enumerate()
        .map(|(position, i)| {
            let alternative = &matrix.alternatives()[i];
            RankingEntry {
                rank: position + 1,
                alternative_id: alternative.id.clone(),
                alternative_name: alternative.name.clone(),
                score: scores[i],
            }
        })
        .collect();
    RankingResult {
        method,
        direction,
        ranking,
        metrics: output.metrics,
    }
}

/// Indices ordered best first; equal scores keep input order.
pub(crate) fn sorted_order(scores: &[f64], direction: Direction) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| {
        let ord = scores[*a].partial_cmp(&scores[*b]).unwrap_or(Ordering::Equal);
        match direction {
            Direction::HigherIsBetter => ord.reverse(),
            Direction::LowerIsBetter => ord,
        }
    });
    order
}

/// 1-based position of each alternative, in alternative order.
pub(crate) fn positions(scores: &[f64], direction: Direction) -> Vec<f64> {
    let mut out = vec![0.0; scores.len()];
    for (position, i) in sorted_order(scores, direction).into_iter().enumerate() {
        out[i] = (position + 1) as f64;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::{matrix, suppliers};
    use crate::matrix::CriterionType::{Beneficial as B, NonBeneficial as N};

    fn scaled_suppliers(column: usize, factor: f64) -> DecisionMatrix {
        let base = suppliers();
        let rows: Vec<Vec<f64>> = base
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, v)| if j == column { v * factor } else { *v })
                    .collect()
            })
            .collect();
        DecisionMatrix::from_rows(rows, base.criteria().to_vec()).expect("scaled matrix")
    }

    #[test]
    fn every_method_returns_dense_finite_ranking() {
        let m = suppliers();
        let params = RankingParams::default();
        for method in RankMethod::ALL {
            let result = rank(method, &m, &params).unwrap_or_else(|e| panic!("{method}: {e}"));
            let ranks: Vec<usize> = result.ranking.iter().map(|e| e.rank).collect();
            assert_eq!(ranks, vec![1, 2, 3, 4], "{method}");
            assert!(result.ranking.iter().all(|e| e.score.is_finite()), "{method}");
            for pair in result.ranking.windows(2) {
                match result.direction {
                    Direction::HigherIsBetter => assert!(pair[0].score >= pair[1].score, "{method}"),
                    Direction::LowerIsBetter => assert!(pair[0].score <= pair[1].score, "{method}"),
                }
            }
        }
    }

    #[test]
    fn every_method_is_idempotent() {
        let m = suppliers();
        let params = RankingParams::default();
        for method in RankMethod::ALL {
            let first = rank(method, &m, &params).expect("first");
            let second = rank(method, &m, &params).expect("second");
            assert_eq!(first, second, "{method}");
        }
    }

    #[test]
    fn normalizing_methods_ignore_column_scale() {
        let base = suppliers();
        let scaled = scaled_suppliers(0, 1000.0);
        let params = RankingParams::default();
        for method in [
            RankMethod::Topsis,
            RankMethod::Vikor,
            RankMethod::Copras,
            RankMethod::Wsm,
            RankMethod::Moora,
            RankMethod::Edas,
            RankMethod::Mabac,
            RankMethod::Promethee2,
        ] {
            let a = rank(method, &base, &params).expect("base");
            let b = rank(method, &scaled, &params).expect("scaled");
            assert_eq!(a.order(), b.order(), "{method}");
        }
    }

    #[test]
    fn single_alternative_ranks_first_everywhere() {
        let m = matrix(&[&[3.0, 4.0]], &[B, N], &[0.5, 0.5]);
        for method in RankMethod::ALL {
            let result = rank(method, &m, &RankingParams::default()).expect("single");
            assert_eq!(result.ranking.len(), 1);
            assert_eq!(result.ranking[0].rank, 1);
            assert!(result.ranking[0].score.is_finite());
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let m = matrix(&[&[2.0, 2.0], &[2.0, 2.0], &[2.0, 2.0]], &[B, B], &[0.5, 0.5]);
        let result = rank(RankMethod::Wsm, &m, &RankingParams::default()).expect("wsm");
        assert_eq!(result.order(), vec!["A1", "A2", "A3"]);
        assert_eq!(
            result.ranking.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = rank_by_name("best-guess", &suppliers(), &RankingParams::default())
            .expect_err("unknown");
        assert_eq!(
            err,
            McdmError::UnsupportedMethod {
                kind: "ranking",
                name: "best-guess".to_string()
            }
        );
    }

    #[test]
    fn parses_roman_numeral_variants() {
        assert_eq!("PROMETHEE II".parse::<RankMethod>(), Ok(RankMethod::Promethee2));
        assert_eq!("electre-i".parse::<RankMethod>(), Ok(RankMethod::Electre1));
        assert_eq!("CoCoSo".parse::<RankMethod>(), Ok(RankMethod::Cocoso));
        for method in RankMethod::ALL {
            assert_eq!(method.as_slug().parse::<RankMethod>(), Ok(method));
        }
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let m = suppliers();
        for params in [
            RankingParams { vikor_v: 1.5, ..RankingParams::default() },
            RankingParams { waspas_lambda: -0.1, ..RankingParams::default() },
            RankingParams { codas_tau: f64::NAN, ..RankingParams::default() },
            RankingParams { gra_zeta: 0.0, ..RankingParams::default() },
            RankingParams { todim_theta: 0.0, ..RankingParams::default() },
        ] {
            assert!(matches!(
                rank(RankMethod::Topsis, &m, &params),
                Err(McdmError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn params_accept_request_field_names() {
        let params: RankingParams =
            serde_json::from_str(r#"{"vikorVValue":0.2,"codasTauValue":0.05}"#).expect("params");
        assert_eq!(params.vikor_v, 0.2);
        assert_eq!(params.codas_tau, 0.05);
        assert_eq!(params.waspas_lambda, 0.5);

        let overrides: ParamOverrides =
            serde_json::from_str(r#"{"waspasLambdaValue":0.9}"#).expect("overrides");
        let merged = RankingParams::default().with_overrides(&overrides);
        assert_eq!(merged.waspas_lambda, 0.9);
        assert_eq!(merged.vikor_v, 0.5);
    }

    #[test]
    fn positions_follow_direction() {
        assert_eq!(positions(&[0.2, 0.9, 0.5], Direction::HigherIsBetter), vec![3.0, 1.0, 2.0]);
        assert_eq!(positions(&[0.2, 0.9, 0.5], Direction::LowerIsBetter), vec![1.0, 3.0, 2.0]);
    }
}
