pub mod analysis;
pub mod config;
pub mod error;
pub mod matrix;
pub mod output;
pub mod ranking;
pub mod server;
pub mod types;
pub mod weighting;

pub use error::McdmError;
pub use matrix::{Alternative, Criterion, CriterionType, DecisionMatrix, Diagnostics};
pub use ranking::{rank, RankMethod, RankingParams, RankingResult};
pub use types::Problem;
pub use weighting::{calculate_weights, WeightMethod, WeightParams, WeightResult};
