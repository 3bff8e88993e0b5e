//! Before/after comparison of snapshot compliance metrics.
//!
//! All metrics are carried at full precision; rounding to two decimal
//! places happens only at presentation time, so deltas never compound
//! rounding error.

use serde::Serialize;

use crate::aggregate::percentage;
use crate::types::Inventory;

/// Summary compliance metrics for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapshotMetrics {
    /// Total resource count
    pub total_resources: usize,
    /// Resources with the flag set to Yes
    pub tagged_resources: usize,
    /// Resources with the flag set to No
    pub untagged_resources: usize,
    /// Untagged share of the resource count, full precision
    pub untagged_pct: f64,
    /// Total monthly cost
    pub total_cost: f64,
    /// Monthly cost of tagged resources
    pub tagged_cost: f64,
    /// Monthly cost of untagged resources
    pub untagged_cost: f64,
    /// Untagged share of total cost, full precision
    pub untagged_cost_pct: f64,
}

impl SnapshotMetrics {
    /// Compute metrics for a snapshot.
    ///
    /// An empty snapshot yields all-zero metrics; zero totals never
    /// produce NaN percentages.
    pub fn collect(inventory: &Inventory) -> Self {
        let total_resources = inventory.len();
        let tagged_resources = inventory.tagged_count();
        let untagged_resources = inventory.untagged_count();

        let mut tagged_cost = 0.0;
        let mut untagged_cost = 0.0;
        for resource in inventory {
            if resource.is_tagged() {
                tagged_cost += resource.monthly_cost_usd;
            } else {
                untagged_cost += resource.monthly_cost_usd;
            }
        }
        let total_cost = tagged_cost + untagged_cost;

        Self {
            total_resources,
            tagged_resources,
            untagged_resources,
            untagged_pct: percentage(untagged_resources as f64, total_resources as f64),
            total_cost,
            tagged_cost,
            untagged_cost,
            untagged_cost_pct: percentage(untagged_cost, total_cost),
        }
    }
}

/// Structured before/after comparison report.
///
/// Deltas are signed, after minus before. `improvement` is the drop in
/// untagged percentage: positive means remediation helped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Metrics for the pre-remediation snapshot
    pub before: SnapshotMetrics,
    /// Metrics for the post-remediation snapshot
    pub after: SnapshotMetrics,
    /// Change in tagged resource count
    pub tagged_delta: i64,
    /// Change in untagged resource count
    pub untagged_delta: i64,
    /// Change in untagged percentage
    pub untagged_pct_delta: f64,
    /// Change in untagged cost
    pub untagged_cost_delta: f64,
    /// Change in untagged cost percentage
    pub untagged_cost_pct_delta: f64,
    /// `before.untagged_pct - after.untagged_pct`; positive is better
    pub improvement: f64,
}

/// Compare two snapshots and compute all metric deltas.
pub fn compare(before: &Inventory, after: &Inventory) -> ComparisonReport {
    let before = SnapshotMetrics::collect(before);
    let after = SnapshotMetrics::collect(after);

    ComparisonReport {
        before,
        after,
        tagged_delta: after.tagged_resources as i64 - before.tagged_resources as i64,
        untagged_delta: after.untagged_resources as i64 - before.untagged_resources as i64,
        untagged_pct_delta: after.untagged_pct - before.untagged_pct,
        untagged_cost_delta: after.untagged_cost - before.untagged_cost,
        untagged_cost_pct_delta: after.untagged_cost_pct - before.untagged_cost_pct,
        improvement: before.untagged_pct - after.untagged_pct,
    }
}
