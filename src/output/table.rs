use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::analysis::{Comparison, SensitivityReport};
use crate::matrix::Criterion;
use crate::output::fixed;
use crate::ranking::{Direction, RankingResult};
use crate::types::MethodCatalog;
use crate::weighting::WeightResult;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_methods_table(catalog: &MethodCatalog) -> String {
    let mut table = new_table();
    table.set_header(vec!["Kind", "Method", "Name", "Notes"]);
    for m in &catalog.weighting {
        let notes = if m.subjective { "decision-maker input" } else { "data-driven" };
        table.add_row(vec!["weighting", m.slug, m.name.as_str(), notes]);
    }
    for m in &catalog.ranking {
        let notes = match m.direction {
            Direction::HigherIsBetter => "higher score is better",
            Direction::LowerIsBetter => "lower score is better",
        };
        table.add_row(vec!["ranking", m.slug, m.name.as_str(), notes]);
    }
    table.to_string()
}

pub fn render_weights_table(result: &WeightResult, criteria: &[Criterion], decimals: usize) -> String {
    let mut table = new_table();
    table.set_header(vec!["Criterion", "Name", "Type", "Weight"]);
    for criterion in criteria {
        let weight = result.weights.get(&criterion.id).copied().unwrap_or(0.0);
        table.add_row(vec![
            criterion.id.clone(),
            criterion.name.clone(),
            criterion.kind.to_string(),
            fixed(weight, decimals),
        ]);
    }
    let mut out = format!("{} weights\n", result.method);
    out.push_str(&table.to_string());
    out
}

pub fn render_ranking_table(result: &RankingResult, decimals: usize) -> String {
    let mut table = new_table();
    table.set_header(vec!["Rank", "Alternative", "Name", "Score"]);
    for entry in &result.ranking {
        let rank = if entry.rank == 1 {
            Cell::new(entry.rank).fg(Color::Green)
        } else {
            Cell::new(entry.rank)
        };
        table.add_row(Row::from(vec![
            rank,
            Cell::new(&entry.alternative_id),
            Cell::new(&entry.alternative_name),
            Cell::new(fixed(entry.score, decimals)),
        ]));
    }
    let direction = match result.direction {
        Direction::HigherIsBetter => "higher is better",
        Direction::LowerIsBetter => "lower is better",
    };
    let mut out = format!("{} ({direction})\n", result.method);
    out.push_str(&table.to_string());
    out
}

pub fn render_comparison_table(comparison: &Comparison, decimals: usize) -> String {
    let slugs: Vec<&str> = comparison.methods.iter().map(|m| m.as_slug()).collect();

    let mut ranks = new_table();
    let mut header = vec!["Alternative".to_string()];
    header.extend(slugs.iter().map(|s| s.to_string()));
    header.push("Mean rank".to_string());
    ranks.set_header(header);
    for row in &comparison.rank_table {
        let mut cells = vec![row.alternative_id.clone()];
        cells.extend(slugs.iter().map(|slug| {
            row.ranks
                .get(*slug)
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string())
        }));
        cells.push(fixed(row.mean_rank, decimals));
        ranks.add_row(cells);
    }

    let mut correlations = new_table();
    let mut header = vec!["Spearman".to_string()];
    header.extend(slugs.iter().map(|s| s.to_string()));
    correlations.set_header(header);
    for a in &slugs {
        let mut cells = vec![a.to_string()];
        cells.extend(slugs.iter().map(|b| {
            comparison
                .correlations
                .table_value("spearman", a, b)
                .map(|rho| fixed(rho, decimals))
                .unwrap_or_else(|| "-".to_string())
        }));
        correlations.add_row(cells);
    }

    let consensus = comparison
        .consensus
        .iter()
        .map(|e| e.alternative_id.as_str())
        .collect::<Vec<_>>()
        .join(" > ");
    format!("{ranks}\n{correlations}\nConsensus: {consensus}")
}

pub fn render_sensitivity_table(report: &SensitivityReport, decimals: usize) -> String {
    let mut table = new_table();
    let mut header = vec!["Criterion".to_string()];
    header.extend(report.variations.iter().map(|v| format!("{v:+}%")));
    header.push("Stable".to_string());
    table.set_header(header);
    for criterion in &report.criteria {
        let mut cells = vec![Cell::new(&criterion.criterion_id)];
        cells.extend(criterion.points.iter().map(|p| {
            let weight = p.weights.get(&criterion.criterion_id).copied().unwrap_or(0.0);
            let best = p.best.as_deref().unwrap_or("-");
            Cell::new(format!("{best} (w={})", fixed(weight, decimals)))
        }));
        cells.push(if criterion.stable {
            Cell::new("YES").fg(Color::Green)
        } else {
            Cell::new("NO").fg(Color::Red)
        });
        table.add_row(Row::from(cells));
    }
    let baseline = report
        .baseline
        .best()
        .map(|e| e.alternative_id.as_str())
        .unwrap_or("-");
    format!(
        "{} sensitivity, baseline best: {baseline}\n{table}",
        report.method
    )
}
