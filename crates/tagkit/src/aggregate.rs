//! Group-by aggregation over resource snapshots.
//!
//! Groups are computed over normalized values: a missing value forms its
//! own group labeled [`MISSING_LABEL`](crate::types::MISSING_LABEL)
//! rather than being dropped, so costs cannot silently disappear from a
//! total. Group emission order is first-seen order, which makes every
//! tie-break deterministic for a given input order.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{Field, Resource};

/// What to reduce per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Sum of `MonthlyCostUSD`
    CostSum,
    /// Number of records
    Count,
}

impl Metric {
    fn measure(&self, resource: &Resource) -> f64 {
        match self {
            Metric::CostSum => resource.monthly_cost_usd,
            Metric::Count => 1.0,
        }
    }
}

/// One group in an aggregation result.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    /// Group labels, one per group key, in key order
    pub labels: Vec<String>,
    /// Reduced value for this group
    pub value: f64,
}

/// Result of a group-by aggregation.
///
/// Rows are kept in first-seen order of their group key tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// The group keys this aggregation was computed over
    pub group_keys: Vec<Field>,
    /// Grouped rows, in first-seen order
    pub rows: Vec<GroupRow>,
}

impl Aggregation {
    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no groups were produced (degenerate input).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up the value for an exact group label tuple.
    pub fn get(&self, labels: &[&str]) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.labels.iter().map(String::as_str).eq(labels.iter().copied()))
            .map(|row| row.value)
    }

    /// Return a copy sorted by value.
    ///
    /// The sort is stable: ties keep first-seen emission order.
    pub fn sorted_by_value(&self, ascending: bool) -> Aggregation {
        let mut sorted = self.clone();
        if ascending {
            sorted.rows.sort_by(|a, b| a.value.total_cmp(&b.value));
        } else {
            sorted.rows.sort_by(|a, b| b.value.total_cmp(&a.value));
        }
        sorted
    }

    /// Return a copy keeping only the first `n` rows.
    pub fn top(&self, n: usize) -> Aggregation {
        Aggregation {
            group_keys: self.group_keys.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

/// Group records by the given keys and reduce each group with `metric`.
///
/// Every key must be groupable; using the cost measure as a key is
/// rejected at the boundary.
pub fn aggregate(records: &[Resource], group_keys: &[Field], metric: Metric) -> Result<Aggregation> {
    for key in group_keys {
        if !key.is_groupable() {
            return Err(Error::NotGroupable { field: *key });
        }
    }

    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut rows: Vec<GroupRow> = Vec::new();

    for resource in records {
        let labels: Vec<String> = group_keys
            .iter()
            .map(|key| key.group_label(resource).to_string())
            .collect();

        match index.get(&labels) {
            Some(&at) => rows[at].value += metric.measure(resource),
            None => {
                index.insert(labels.clone(), rows.len());
                rows.push(GroupRow {
                    labels,
                    value: metric.measure(resource),
                });
            }
        }
    }

    Ok(Aggregation {
        group_keys: group_keys.to_vec(),
        rows,
    })
}

/// Reduce all records with `metric`, ignoring grouping.
pub fn total(records: &[Resource], metric: Metric) -> f64 {
    records.iter().map(|r| metric.measure(r)).sum()
}

/// Percentage of `part` over `whole`.
///
/// A zero whole yields `0.0` rather than an error or NaN, so empty
/// slices of the data never propagate undefined values into reports.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Round to two decimal places, for presentation only.
///
/// Internal comparison math always uses full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A two-dimensional row-by-column aggregation.
#[derive(Debug, Clone)]
pub struct Pivot {
    /// Field supplying row labels
    pub row_key: Field,
    /// Field supplying column labels
    pub col_key: Field,
    /// Distinct row labels, in first-seen order
    pub rows: Vec<String>,
    /// Distinct column labels, in first-seen order
    pub cols: Vec<String>,
    cells: HashMap<(String, String), f64>,
}

impl Pivot {
    /// Value at a (row, col) combination; absent combinations are `0.0`,
    /// never missing.
    pub fn get(&self, row: &str, col: &str) -> f64 {
        self.cells
            .get(&(row.to_string(), col.to_string()))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Pivot records into a row-by-column mapping reduced with `metric`.
pub fn pivot(records: &[Resource], row_key: Field, col_key: Field, metric: Metric) -> Result<Pivot> {
    for key in [row_key, col_key] {
        if !key.is_groupable() {
            return Err(Error::NotGroupable { field: key });
        }
    }

    let mut rows: Vec<String> = Vec::new();
    let mut cols: Vec<String> = Vec::new();
    let mut cells: HashMap<(String, String), f64> = HashMap::new();

    for resource in records {
        let row = row_key.group_label(resource).to_string();
        let col = col_key.group_label(resource).to_string();

        if !rows.contains(&row) {
            rows.push(row.clone());
        }
        if !cols.contains(&col) {
            cols.push(col.clone());
        }

        *cells.entry((row, col)).or_insert(0.0) += metric.measure(resource);
    }

    Ok(Pivot {
        row_key,
        col_key,
        rows,
        cols,
        cells,
    })
}
