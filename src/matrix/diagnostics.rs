use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diagnostic {
    Scalar(f64),
    Vector(BTreeMap<String, f64>),
    Table(BTreeMap<String, BTreeMap<String, f64>>),
}

/// Named intermediate values of a computation, keyed by alternative or criterion id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(BTreeMap<String, Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(&mut self, name: &str, value: f64) {
        self.0
            .insert(name.to_string(), Diagnostic::Scalar(finite_or_zero(value)));
    }

    pub fn vector(&mut self, name: &str, labels: &[&str], values: &[f64]) {
        let entries = labels
            .iter()
            .zip(values)
            .map(|(label, value)| (label.to_string(), finite_or_zero(*value)))
            .collect();
        self.0.insert(name.to_string(), Diagnostic::Vector(entries));
    }

    pub fn table(&mut self, name: &str, rows: &[&str], cols: &[&str], data: &[Vec<f64>]) {
        let entries = rows
            .iter()
            .zip(data)
            .map(|(row, values)| {
                let inner = cols
                    .iter()
                    .zip(values)
                    .map(|(col, value)| (col.to_string(), finite_or_zero(*value)))
                    .collect();
                (row.to_string(), inner)
            })
            .collect();
        self.0.insert(name.to_string(), Diagnostic::Table(entries));
    }

    pub fn get(&self, name: &str) -> Option<&Diagnostic> {
        self.0.get(name)
    }

    pub fn scalar_value(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            Diagnostic::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn vector_value(&self, name: &str, label: &str) -> Option<f64> {
        match self.0.get(name)? {
            Diagnostic::Vector(values) => values.get(label).copied(),
            _ => None,
        }
    }

    pub fn table_value(&self, name: &str, row: &str, col: &str) -> Option<f64> {
        match self.0.get(name)? {
            Diagnostic::Table(rows) => rows.get(row)?.get(col).copied(),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Maps NaN and infinities to 0 and normalizes -0.0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value + 0.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_values_are_zeroed() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.scalar("ratio", f64::NAN);
        diagnostics.vector("flows", &["a", "b"], &[f64::INFINITY, 0.25]);
        assert_eq!(diagnostics.scalar_value("ratio"), Some(0.0));
        assert_eq!(diagnostics.vector_value("flows", "a"), Some(0.0));
        assert_eq!(diagnostics.vector_value("flows", "b"), Some(0.25));
    }

    #[test]
    fn serializes_as_plain_maps() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.table("matrix", &["a1"], &["c1", "c2"], &[vec![0.5, 1.0]]);
        diagnostics.scalar("lambdaMax", 3.0);
        let json = serde_json::to_value(&diagnostics).expect("serialize");
        assert_eq!(json["matrix"]["a1"]["c2"], 1.0);
        assert_eq!(json["lambdaMax"], 3.0);
        let back: Diagnostics = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back.table_value("matrix", "a1", "c1"), Some(0.5));
    }
}
