use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::analysis::{AlternativeRanks, Comparison};
use crate::error::McdmError;
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::{self, sorted_order, Direction, RankMethod, RankingEntry, RankingParams, RankingResult};

/// Ranks `matrix` with every method in `methods` on the blocking pool and aggregates the
/// results. Duplicate methods are compared once; result order follows `methods`.
pub async fn compare(
    matrix: &DecisionMatrix,
    methods: &[RankMethod],
    params: &RankingParams,
) -> Result<Comparison, McdmError> {
    let mut selected: Vec<RankMethod> = Vec::with_capacity(methods.len());
    for method in methods {
        if !selected.contains(method) {
            selected.push(*method);
        }
    }
    if selected.is_empty() {
        return Err(McdmError::invalid_parameter(
            "methods",
            "at least one ranking method is required",
        ));
    }
    params.validate()?;
    debug!(methods = selected.len(), "comparing ranking methods");

    let shared = Arc::new(matrix.clone());
    let mut tasks = JoinSet::new();
    for (index, method) in selected.iter().copied().enumerate() {
        let matrix = Arc::clone(&shared);
        let params = *params;
        tasks.spawn_blocking(move || (index, method, ranking::rank(method, &matrix, &params)));
    }

    let mut slots: Vec<Option<RankingResult>> = vec![None; selected.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, _, result) = joined.map_err(|err| McdmError::TaskFailed {
            method: "comparison".to_string(),
            reason: err.to_string(),
        })?;
        slots[index] = Some(result?);
    }
    let results: Vec<RankingResult> = slots
        .into_iter()
        .zip(&selected)
        .map(|(slot, method)| {
            slot.ok_or_else(|| McdmError::TaskFailed {
                method: method.to_string(),
                reason: "no result returned".to_string(),
            })
        })
        .collect::<Result<_, _>>()?;

    let rank_table = rank_table(matrix, &results);
    let correlations = correlations(matrix, &results);
    let consensus = consensus(&rank_table);
    Ok(Comparison {
        methods: selected,
        results,
        rank_table,
        correlations,
        consensus,
    })
}

fn rank_table(matrix: &DecisionMatrix, results: &[RankingResult]) -> Vec<AlternativeRanks> {
    matrix
        .alternatives()
        .iter()
        .map(|alternative| {
            let ranks: BTreeMap<String, usize> = results
                .iter()
                .filter_map(|r| {
                    r.rank_of(&alternative.id)
                        .map(|rank| (r.method.as_slug().to_string(), rank))
                })
                .collect();
            let mean_rank = if ranks.is_empty() {
                0.0
            } else {
                ranks.values().sum::<usize>() as f64 / ranks.len() as f64
            };
            AlternativeRanks {
                alternative_id: alternative.id.clone(),
                alternative_name: alternative.name.clone(),
                ranks,
                mean_rank,
            }
        })
        .collect()
}

/// Spearman's rho over rank positions: `1 - 6 sum d^2 / (n (n^2 - 1))`.
pub fn spearman(a: &[usize], b: &[usize]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 1.0;
    }
    let squared: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (*x as f64 - *y as f64).powi(2))
        .sum();
    let n = n as f64;
    1.0 - 6.0 * squared / (n * (n * n - 1.0))
}

fn correlations(matrix: &DecisionMatrix, results: &[RankingResult]) -> Diagnostics {
    let ranks: Vec<Vec<usize>> = results
        .iter()
        .map(|r| {
            matrix
                .alternatives()
                .iter()
                .map(|a| r.rank_of(&a.id).unwrap_or(0))
                .collect()
        })
        .collect();
    let table: Vec<Vec<f64>> = ranks
        .iter()
        .map(|a| ranks.iter().map(|b| spearman(a, b)).collect())
        .collect();
    let labels: Vec<&str> = results.iter().map(|r| r.method.as_slug()).collect();
    let mut metrics = Diagnostics::new();
    metrics.table("spearman", &labels, &labels, &table);
    metrics
}

fn consensus(table: &[AlternativeRanks]) -> Vec<RankingEntry> {
    let means: Vec<f64> = table.iter().map(|row| row.mean_rank).collect();
    sorted_order(&means, Direction::LowerIsBetter)
        .into_iter()
        .enumerate()
        .map(|(position, i)| RankingEntry {
            rank: position + 1,
            alternative_id: table[i].alternative_id.clone(),
            alternative_name: table[i].alternative_name.clone(),
            score: means[i],
        })
        .collect()
}
