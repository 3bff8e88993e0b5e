//! Snapshot overview: record counts, missing values, tagging split.

use anyhow::Result;

use tagkit::{missing_field_frequency, Field, SnapshotMetrics};

use crate::cli::QueryArgs;
use crate::commands::{apply_filters, load_inventory};
use crate::ui;
use crate::Context;

/// Fields that hold descriptive or tag text and can therefore be
/// missing; the id, cost and flag columns are always populated.
const TEXT_FIELDS: [Field; 9] = [
    Field::AccountId,
    Field::Service,
    Field::Region,
    Field::Department,
    Field::Project,
    Field::Environment,
    Field::Owner,
    Field::CostCenter,
    Field::CreatedBy,
];

pub fn run(ctx: &Context, args: QueryArgs) -> Result<()> {
    let full = load_inventory(&args.input)?;
    let inventory = apply_filters(&full, &args.filter)?;

    ui::header("Inventory Summary");
    if inventory.len() != full.len() {
        ui::kv(
            "Resources",
            &format!("{} (filtered from {})", inventory.len(), full.len()),
        );
    } else {
        ui::kv("Resources", &inventory.len().to_string());
    }

    let metrics = SnapshotMetrics::collect(&inventory);
    ui::kv("Tagged (Yes)", &metrics.tagged_resources.to_string());
    ui::kv("Untagged (No)", &metrics.untagged_resources.to_string());
    ui::kv("Untagged share", &ui::format_pct(metrics.untagged_pct));
    ui::kv("Total monthly cost", &ui::format_money(metrics.total_cost));

    ui::section("Missing values per column");
    let missing = missing_field_frequency(inventory.resources(), &TEXT_FIELDS);
    let any_missing = missing.iter().any(|(_, count)| *count > 0);
    if any_missing {
        for (field, count) in missing.iter().filter(|(_, count)| *count > 0) {
            println!("  {:<14} {count}", field.column());
        }
        if !ctx.quiet {
            let worst: Vec<&str> = missing
                .iter()
                .take_while(|(_, count)| *count == missing[0].1)
                .map(|(field, _)| field.column())
                .collect();
            ui::dim(&format!("most missing: {}", worst.join(", ")));
        }
    } else {
        ui::dim("no missing values");
    }

    Ok(())
}
