//! # tagkit
//!
//! Pure Rust library for cloud resource tag compliance auditing.
//!
//! This crate provides functionality for:
//! - Loading resource inventories from the quoted-CSV ingestion format
//! - Grouping and aggregating cost and count metrics over a snapshot
//! - Scoring per-resource tag completeness
//! - Evaluating multi-valued inclusion filters with an "All" sentinel
//! - Simulating a remediation pass over the untagged subset
//! - Comparing before/after snapshots
//!
//! Every engine is a pure function over an immutable [`Inventory`]
//! snapshot: inputs are never mutated, results are plain structured
//! values, and re-running any computation on the same snapshot is
//! idempotent and side-effect-free.
//!
//! ## Example
//!
//! ```
//! use tagkit::{compare, dataset, remediate, EditSet, Field};
//!
//! let content = "\"ResourceID,AccountID,Service,Region,Department,Project,\
//! Environment,Owner,CostCenter,CreatedBy,MonthlyCostUSD,Tagged\"\n\
//! \"r-001,111,EC2,us-east-1,,,,,,console,120.00,No\"";
//!
//! let before = dataset::parse_string(content).expect("well-formed dataset");
//!
//! let mut edits = EditSet::new();
//! for (field, value) in Field::TAG_FIELDS
//!     .into_iter()
//!     .zip(["Finance", "Atlas", "Prod", "alice", "CC-100"])
//! {
//!     edits.set("r-001", field, value).expect("tag field");
//! }
//!
//! let outcome = remediate(&before, &edits);
//! let report = compare(&before, &outcome.after);
//! assert_eq!(report.tagged_delta, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregate;
pub mod compare;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod remediate;
pub mod score;
pub mod types;

pub use aggregate::{aggregate, percentage, pivot, round2, total, Aggregation, GroupRow, Metric, Pivot};
pub use compare::{compare, ComparisonReport, SnapshotMetrics};
pub use error::{Error, Result};
pub use filter::{FilterSet, ALL_SENTINEL};
pub use remediate::{remediate, EditPlan, EditSet, PlannedEdit, RemediationOutcome};
pub use score::{
    average_completeness, completeness_percentage, missing_field_frequency, rank_lowest, score,
    score_all, Scored,
};
pub use types::{normalize, Field, Inventory, Resource, TagStatus, MISSING_LABEL};
