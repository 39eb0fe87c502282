use anyhow::Result;

use crate::analysis::Comparison;
use crate::matrix::Criterion;
use crate::output::fixed;
use crate::ranking::RankingResult;
use crate::weighting::WeightResult;

pub fn weights_to_csv(result: &WeightResult, criteria: &[Criterion], decimals: usize) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["criterion", "name", "type", "weight"])?;
    for criterion in criteria {
        let weight = result.weights.get(&criterion.id).copied().unwrap_or(0.0);
        writer.write_record([
            criterion.id.clone(),
            criterion.name.clone(),
            criterion.kind.to_string(),
            fixed(weight, decimals),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn ranking_to_csv(result: &RankingResult, decimals: usize) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["rank", "alternative", "name", "score"])?;
    for entry in &result.ranking {
        writer.write_record([
            entry.rank.to_string(),
            entry.alternative_id.clone(),
            entry.alternative_name.clone(),
            fixed(entry.score, decimals),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

/// One row per alternative: its rank under each method, then the mean rank.
pub fn comparison_to_csv(comparison: &Comparison, decimals: usize) -> Result<String> {
    let slugs: Vec<&str> = comparison.methods.iter().map(|m| m.as_slug()).collect();
    let mut writer = csv::Writer::from_writer(vec![]);
    let mut header = vec!["alternative"];
    header.extend(slugs.iter().copied());
    header.push("mean_rank");
    writer.write_record(&header)?;
    for row in &comparison.rank_table {
        let mut record = vec![row.alternative_id.clone()];
        record.extend(
            slugs
                .iter()
                .map(|slug| row.ranks.get(*slug).map(|r| r.to_string()).unwrap_or_default()),
        );
        record.push(fixed(row.mean_rank, decimals));
        writer.write_record(&record)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::testing::suppliers;
    use crate::ranking::{rank, RankMethod, RankingParams};

    #[test]
    fn ranking_csv_has_one_row_per_alternative() {
        let result = rank(RankMethod::Wsm, &suppliers(), &RankingParams::default()).expect("wsm");
        let csv = ranking_to_csv(&result, 3).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "rank,alternative,name,score");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("1,"));
    }

    #[test]
    fn comparison_csv_columns_follow_methods() {
        let m = suppliers();
        let comparison = tokio_test::block_on(crate::analysis::compare(
            &m,
            &[RankMethod::Wsm, RankMethod::Topsis],
            &RankingParams::default(),
        ))
        .expect("comparison");
        let csv = comparison_to_csv(&comparison, 2).expect("csv");
        assert!(csv.starts_with("alternative,wsm,topsis,mean_rank"));
    }
}
