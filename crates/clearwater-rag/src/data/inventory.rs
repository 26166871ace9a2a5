//! Inventory CSV accessor

use crate::error::{RagError, RagResult};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One CSV row keyed by column header
pub type Record = Map<String, Value>;

pub const ITEM_ID: &str = "Item ID";
pub const ITEM_NAME: &str = "Item Name";
pub const CATEGORY: &str = "Category";
pub const QUANTITY: &str = "Quantity";
pub const UNIT_PRICE: &str = "Unit Price";

/// Headline figures for the inventory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryAnalytics {
    pub total_unique_items: usize,
    pub total_quantity: f64,
    pub total_value: f64,
    pub quantity_by_category: BTreeMap<String, f64>,
}

/// Read access to the inventory CSV file
#[derive(Debug, Clone)]
pub struct InventoryStore {
    path: PathBuf,
}

impl InventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows with typed cells
    pub async fn records(&self) -> RagResult<Vec<Record>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RagError::not_found("inventory file", self.path.display().to_string())
            } else {
                RagError::storage("read inventory", e)
            }
        })?;
        let records = parse_records(&bytes)?;
        debug!(path = %self.path.display(), rows = records.len(), "Loaded inventory");
        Ok(records)
    }

    /// Rows whose item name or category contains `query`, ignoring case, sorted by item name
    ///
    /// An empty query matches every row.
    pub async fn search(&self, query: &str) -> RagResult<Vec<Record>> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<Record> = self
            .records()
            .await?
            .into_iter()
            .filter(|record| {
                [ITEM_NAME, CATEGORY].iter().any(|column| {
                    text_cell(record, column)
                        .is_some_and(|value| value.to_lowercase().contains(&needle))
                })
            })
            .collect();
        matches.sort_by(|a, b| text_cell(a, ITEM_NAME).cmp(&text_cell(b, ITEM_NAME)));
        Ok(matches)
    }

    /// Unique items, stock totals and quantity per category
    pub async fn analytics(&self) -> RagResult<InventoryAnalytics> {
        Ok(analyze(&self.records().await?))
    }
}

/// Parse CSV bytes into typed records
pub fn parse_records(bytes: &[u8]) -> RagResult<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        // short rows are padded with nulls, extra trailing cells are dropped
        let record = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cell = row.get(i).map_or(Value::Null, parse_cell);
                (header.to_string(), cell)
            })
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Type a raw CSV cell: empty is null, then bool, integer, float, and finally text
pub fn parse_cell(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Null;
    }
    match raw {
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

fn analyze(records: &[Record]) -> InventoryAnalytics {
    let mut ids = HashSet::new();
    let mut total_quantity = 0.0;
    let mut total_value = 0.0;
    let mut quantity_by_category = BTreeMap::new();

    for record in records {
        if let Some(id) = record.get(ITEM_ID).filter(|v| !v.is_null()) {
            ids.insert(id.to_string());
        }
        let quantity = number_cell(record, QUANTITY).unwrap_or(0.0);
        let price = number_cell(record, UNIT_PRICE).unwrap_or(0.0);
        total_quantity += quantity;
        total_value += quantity * price;
        if let Some(category) = text_cell(record, CATEGORY) {
            *quantity_by_category.entry(category.to_string()).or_insert(0.0) += quantity;
        }
    }

    InventoryAnalytics {
        total_unique_items: ids.len(),
        total_quantity,
        total_value,
        quantity_by_category,
    }
}

fn text_cell<'a>(record: &'a Record, column: &str) -> Option<&'a str> {
    record.get(column).and_then(Value::as_str)
}

fn number_cell(record: &Record, column: &str) -> Option<f64> {
    record.get(column).and_then(Value::as_f64)
}
