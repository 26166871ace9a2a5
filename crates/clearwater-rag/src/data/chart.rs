//! Summary statistics for charting
//!
//! Mirrors a dataframe `describe()`: one entry per numeric column with count, mean,
//! sample standard deviation, extremes and the quartiles (linear interpolation).

use super::inventory::Record;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Descriptive statistics of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; undefined below two values
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Describe a set of values; empty input yields a zero count and no statistics
    pub fn describe(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|mean| {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        });

        Self {
            count,
            mean,
            std,
            min: sorted.first().copied(),
            p25: percentile(&sorted, 0.25),
            p50: percentile(&sorted, 0.5),
            p75: percentile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Summaries for every numeric column of `records`
///
/// A column is numeric when every non-empty cell holds a number and at least one does.
pub fn summarize(records: &[Record]) -> BTreeMap<String, ColumnSummary> {
    let mut columns: BTreeMap<&str, Option<Vec<f64>>> = BTreeMap::new();

    for record in records {
        for (name, cell) in record {
            let slot = columns.entry(name.as_str()).or_insert_with(|| Some(Vec::new()));
            match cell {
                Value::Null => {}
                Value::Number(n) => {
                    if let (Some(values), Some(v)) = (slot.as_mut(), n.as_f64()) {
                        values.push(v);
                    }
                }
                _ => *slot = None,
            }
        }
    }

    columns
        .into_iter()
        .filter_map(|(name, values)| {
            let values = values.filter(|v| !v.is_empty())?;
            Some((name.to_string(), ColumnSummary::describe(&values)))
        })
        .collect()
}

fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::inventory::parse_records;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_describe() {
        let summary = ColumnSummary::describe(&[4.0, 1.0, 3.0, 2.0]);

        assert_eq!(summary.count, 4);
        assert!(close(summary.mean, 2.5));
        assert!(close(summary.std, 1.2909944487358056));
        assert!(close(summary.min, 1.0));
        assert!(close(summary.p25, 1.75));
        assert!(close(summary.p50, 2.5));
        assert!(close(summary.p75, 3.25));
        assert!(close(summary.max, 4.0));
    }

    #[test]
    fn test_single_value_has_no_std() {
        let summary = ColumnSummary::describe(&[7.0]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std, None);
        assert!(close(summary.p75, 7.0));
    }

    #[test]
    fn test_summarize_numeric_columns_only() {
        let records = parse_records(
            b"Item Name,Quantity,Unit Price\nBolt,30,0.5\nNut,12,\nTie,0,1.5\n",
        )
        .unwrap();
        let summary = summarize(&records);

        assert_eq!(
            summary.keys().collect::<Vec<_>>(),
            vec!["Quantity", "Unit Price"]
        );
        assert_eq!(summary["Quantity"].count, 3);
        assert!(close(summary["Quantity"].mean, 14.0));
        // empty cells are skipped, not counted
        assert_eq!(summary["Unit Price"].count, 2);
    }

    #[test]
    fn test_wire_keys() {
        let value = serde_json::to_value(ColumnSummary::describe(&[1.0, 2.0])).unwrap();
        assert!(value.get("25%").is_some());
        assert!(value.get("std").is_some());
    }
}
