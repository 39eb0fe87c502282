pub mod csv;
pub mod table;

use anyhow::Result;
use serde::Serialize;

/// Full-precision JSON; rounding is left to the table and CSV renderers.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}
