//! Outranking families: PROMETHEE preference flows and ELECTRE concordance/discordance.

use crate::matrix::normalize::{self, extremes, safe_div};
use crate::matrix::{DecisionMatrix, Diagnostics};
use crate::ranking::MethodScores;

/// Signed advantage of `a` over `b` on criterion `j`, positive when `a` is better.
fn advantage(matrix: &DecisionMatrix, j: usize, a: f64, b: f64) -> f64 {
    if matrix.is_beneficial(j) {
        a - b
    } else {
        b - a
    }
}

struct Flows {
    normalized: Vec<Vec<f64>>,
    preference: Vec<Vec<f64>>,
    positive: Vec<f64>,
    negative: Vec<f64>,
    net: Vec<f64>,
}

/// Aggregated linear preferences `pi(a, b) = sum_j w_j min(1, d_j / range_j)` and the
/// leaving, entering and net flows, each averaged over the `m - 1` opponents.
fn flows(matrix: &DecisionMatrix) -> Flows {
    let normalized = normalize::vector(matrix);
    let weights = matrix.weights();
    let ranges: Vec<f64> = (0..matrix.criterion_count())
        .map(|j| {
            let (min, max) = extremes(&normalize::column(&normalized, j));
            max - min
        })
        .collect();

    let m = matrix.alternative_count();
    let mut preference = vec![vec![0.0; m]; m];
    for a in 0..m {
        for b in 0..m {
            if a == b {
                continue;
            }
            preference[a][b] = (0..matrix.criterion_count())
                .map(|j| {
                    let d = advantage(matrix, j, normalized[a][j], normalized[b][j]);
                    if d > 0.0 {
                        weights[j] * safe_div(d, ranges[j]).min(1.0)
                    } else {
                        0.0
                    }
                })
                .sum();
        }
    }

    let opponents = m.saturating_sub(1) as f64;
    let positive: Vec<f64> = (0..m)
        .map(|a| safe_div(preference[a].iter().sum(), opponents))
        .collect();
    let negative: Vec<f64> = (0..m)
        .map(|a| safe_div(preference.iter().map(|row| row[a]).sum(), opponents))
        .collect();
    let net = positive.iter().zip(&negative).map(|(p, n)| p - n).collect();

    Flows {
        normalized,
        preference,
        positive,
        negative,
        net,
    }
}

fn flow_metrics(matrix: &DecisionMatrix, flows: &Flows) -> Diagnostics {
    let alternatives = matrix.alternative_ids();
    let mut metrics = Diagnostics::new();
    metrics.vector("positiveFlow", &alternatives, &flows.positive);
    metrics.vector("negativeFlow", &alternatives, &flows.negative);
    metrics.vector("netFlow", &alternatives, &flows.net);
    metrics
}

/// Net preference flow.
pub fn promethee(matrix: &DecisionMatrix) -> MethodScores {
    let flows = flows(matrix);
    let metrics = flow_metrics(matrix, &flows);
    MethodScores {
        scores: flows.net,
        metrics,
    }
}

/// Partial preorder: `a` outranks `b` when its leaving flow is at least as large and its
/// entering flow at most as large (and the pair is not identical on both). The score is the
/// number of alternatives outranked minus the number outranking.
pub fn promethee1(matrix: &DecisionMatrix) -> MethodScores {
    let flows = flows(matrix);
    let m = matrix.alternative_count();
    let mut outranking = vec![vec![0.0; m]; m];
    for a in 0..m {
        for b in 0..m {
            let identical =
                flows.positive[a] == flows.positive[b] && flows.negative[a] == flows.negative[b];
            if a != b
                && !identical
                && flows.positive[a] >= flows.positive[b]
                && flows.negative[a] <= flows.negative[b]
            {
                outranking[a][b] = 1.0;
            }
        }
    }
    let scores = dominance_balance(&outranking);

    let alternatives = matrix.alternative_ids();
    let mut metrics = flow_metrics(matrix, &flows);
    metrics.table("outrankingMatrix", &alternatives, &alternatives, &outranking);
    MethodScores { scores, metrics }
}

/// Complete preorder by net flow, with the full preference structure reported.
pub fn promethee2(matrix: &DecisionMatrix) -> MethodScores {
    let flows = flows(matrix);
    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = flow_metrics(matrix, &flows);
    metrics.table("normalizedMatrix", &alternatives, &criteria, &flows.normalized);
    metrics.table(
        "aggregatedPreferenceMatrix",
        &alternatives,
        &alternatives,
        &flows.preference,
    );
    MethodScores {
        scores: flows.net,
        metrics,
    }
}

struct Indices {
    normalized: Vec<Vec<f64>>,
    concordance: Vec<Vec<f64>>,
    discordance: Vec<Vec<f64>>,
}

/// Concordance sums the weights where `a` is at least as good as `b`; discordance is the
/// largest range-scaled shortfall of `a` against `b`.
fn indices(matrix: &DecisionMatrix) -> Indices {
    let normalized = normalize::vector(matrix);
    let weights = matrix.weights();
    let n = matrix.criterion_count();
    let ranges: Vec<f64> = (0..n)
        .map(|j| {
            let (min, max) = extremes(&normalize::column(&normalized, j));
            max - min
        })
        .collect();

    let m = matrix.alternative_count();
    let mut concordance = vec![vec![1.0; m]; m];
    let mut discordance = vec![vec![0.0; m]; m];
    for a in 0..m {
        for b in 0..m {
            if a == b {
                continue;
            }
            let mut agree = 0.0;
            let mut worst: f64 = 0.0;
            for j in 0..n {
                let d = advantage(matrix, j, normalized[a][j], normalized[b][j]);
                if d >= 0.0 {
                    agree += weights[j];
                } else {
                    worst = worst.max(safe_div(-d, ranges[j]));
                }
            }
            concordance[a][b] = agree;
            discordance[a][b] = worst;
        }
    }
    Indices {
        normalized,
        concordance,
        discordance,
    }
}

fn outranking(indices: &Indices, c_min: f64, d_max: f64) -> Vec<Vec<f64>> {
    let m = indices.concordance.len();
    (0..m)
        .map(|a| {
            (0..m)
                .map(|b| {
                    let holds = a != b
                        && indices.concordance[a][b] >= c_min
                        && indices.discordance[a][b] <= d_max;
                    if holds {
                        1.0
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

/// Row total minus column total of a 0/1 relation.
fn dominance_balance(relation: &[Vec<f64>]) -> Vec<f64> {
    (0..relation.len())
        .map(|a| {
            let outranks: f64 = relation[a].iter().sum();
            let outranked: f64 = relation.iter().map(|row| row[a]).sum();
            outranks - outranked
        })
        .collect()
}

fn index_metrics(matrix: &DecisionMatrix, indices: &Indices) -> Diagnostics {
    let alternatives = matrix.alternative_ids();
    let criteria = matrix.criterion_ids();
    let mut metrics = Diagnostics::new();
    metrics.table("normalizedMatrix", &alternatives, &criteria, &indices.normalized);
    metrics.table("concordanceMatrix", &alternatives, &alternatives, &indices.concordance);
    metrics.table("discordanceMatrix", &alternatives, &alternatives, &indices.discordance);
    metrics
}

const CONCORDANCE_THRESHOLD: f64 = 0.5;
const DISCORDANCE_THRESHOLD: f64 = 0.5;

pub fn electre(matrix: &DecisionMatrix) -> MethodScores {
    let indices = indices(matrix);
    let relation = outranking(&indices, CONCORDANCE_THRESHOLD, DISCORDANCE_THRESHOLD);
    let scores = dominance_balance(&relation);

    let alternatives = matrix.alternative_ids();
    let mut metrics = index_metrics(matrix, &indices);
    metrics.table("outrankingMatrix", &alternatives, &alternatives, &relation);
    MethodScores { scores, metrics }
}

/// ELECTRE I also marks the kernel: alternatives no other alternative outranks.
pub fn electre1(matrix: &DecisionMatrix) -> MethodScores {
    let indices = indices(matrix);
    let relation = outranking(&indices, CONCORDANCE_THRESHOLD, DISCORDANCE_THRESHOLD);
    let scores = dominance_balance(&relation);
    let kernel: Vec<f64> = (0..relation.len())
        .map(|a| {
            if relation.iter().all(|row| row[a] == 0.0) {
                1.0
            } else {
                0.0
            }
        })
        .collect();

    let alternatives = matrix.alternative_ids();
    let mut metrics = index_metrics(matrix, &indices);
    metrics.table("outrankingMatrix", &alternatives, &alternatives, &relation);
    metrics.vector("kernel", &alternatives, &kernel);
    MethodScores { scores, metrics }
}

const STRONG_CONCORDANCE: f64 = 0.6;
const STRONG_DISCORDANCE: f64 = 0.4;

/// Strong relation balance decides; the weak balance, scaled below one step, breaks ties.
pub fn electre2(matrix: &DecisionMatrix) -> MethodScores {
    let indices = indices(matrix);
    let strong = outranking(&indices, STRONG_CONCORDANCE, STRONG_DISCORDANCE);
    let weak = outranking(&indices, CONCORDANCE_THRESHOLD, DISCORDANCE_THRESHOLD);
    let strong_net = dominance_balance(&strong);
    let weak_net = dominance_balance(&weak);
    let m = matrix.alternative_count() as f64;
    let scores = strong_net
        .iter()
        .zip(&weak_net)
        .map(|(s, w)| s + w / m)
        .collect();

    let alternatives = matrix.alternative_ids();
    let mut metrics = index_metrics(matrix, &indices);
    metrics.table("strongOutrankingMatrix", &alternatives, &alternatives, &strong);
    metrics.table("weakOutrankingMatrix", &alternatives, &alternatives, &weak);
    metrics.vector("strongNetDominance", &alternatives, &strong_net);
    metrics.vector("weakNetDominance", &alternatives, &weak_net);
    MethodScores { scores, metrics }
}
