//! Writer for exporting inventory snapshots as CSV.
//!
//! The export carries the same column set as ingestion, one row per
//! resource, and is used for both untagged-only and full remediated
//! exports. Missing values are written as empty cells.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::types::{Field, Inventory, Resource};

/// Write a snapshot to a file.
pub fn write_file(inventory: &Inventory, path: &Path) -> Result<()> {
    std::fs::write(path, write_string(inventory))?;
    log::debug!("wrote {} resources to {}", inventory.len(), path.display());
    Ok(())
}

/// Render a snapshot as CSV, header first, in snapshot order.
pub fn write_string(inventory: &Inventory) -> String {
    let mut output = String::new();

    let header: Vec<&str> = Field::ALL.iter().map(|f| f.column()).collect();
    let _ = writeln!(output, "{}", header.join(","));

    for resource in inventory {
        let _ = writeln!(output, "{}", render_row(resource));
    }

    output
}

fn render_row(resource: &Resource) -> String {
    Field::ALL
        .iter()
        .map(|field| match field {
            Field::MonthlyCostUsd => format!("{:.2}", resource.monthly_cost_usd),
            _ => field.value(resource).unwrap_or("").to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}
