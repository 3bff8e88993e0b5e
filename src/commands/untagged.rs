//! Untagged resource listing and export.

use anyhow::{Context as _, Result};

use tagkit::{dataset, Inventory, Resource, SnapshotMetrics};

use crate::cli::UntaggedArgs;
use crate::commands::{apply_filters, load_inventory};
use crate::ui;
use crate::Context;

pub fn run(_ctx: &Context, args: UntaggedArgs) -> Result<()> {
    let full = load_inventory(&args.query.input)?;
    let inventory = apply_filters(&full, &args.query.filter)?;

    // Most expensive untagged resources first; stable on equal cost.
    let mut untagged: Vec<&Resource> = inventory.iter().filter(|r| !r.is_tagged()).collect();
    untagged.sort_by(|a, b| b.monthly_cost_usd.total_cmp(&a.monthly_cost_usd));

    ui::header("Untagged Resources");
    let metrics = SnapshotMetrics::collect(&inventory);
    ui::kv("Untagged resources", &untagged.len().to_string());
    ui::kv("Untagged cost", &ui::format_money(metrics.untagged_cost));
    ui::kv(
        "Untagged cost share",
        &ui::format_pct(metrics.untagged_cost_pct),
    );

    if untagged.is_empty() {
        ui::success("every resource is tagged");
        return Ok(());
    }

    println!();
    println!(
        "  {:<16} {:<10} {:<12} {:<14} {:>12}",
        "ResourceID", "Service", "Region", "Department", "Cost"
    );
    for resource in &untagged {
        println!(
            "  {:<16} {:<10} {:<12} {:<14} {:>12}",
            resource.resource_id,
            resource.service.as_deref().unwrap_or("-"),
            resource.region.as_deref().unwrap_or("-"),
            resource.department.as_deref().unwrap_or("-"),
            ui::format_money(resource.monthly_cost_usd)
        );
    }

    if let Some(path) = &args.export {
        let export = Inventory::from_records(untagged.into_iter().cloned().collect())
            .context("untagged subset kept its unique ids")?;
        dataset::write_file(&export, path)
            .with_context(|| format!("failed to export to {}", path.display()))?;
        println!();
        ui::success(&format!(
            "exported {} untagged resources to {}",
            export.len(),
            path.display()
        ));
    }

    Ok(())
}
