//! Cost visibility: tagged/untagged split and grouped breakdowns.

use anyhow::{Context as _, Result};

use tagkit::{aggregate, percentage, pivot, Field, Metric, SnapshotMetrics};

use crate::cli::CostsArgs;
use crate::commands::{apply_filters, load_inventory};
use crate::ui;
use crate::Context;

pub fn run(ctx: &Context, args: CostsArgs) -> Result<()> {
    let full = load_inventory(&args.query.input)?;
    let inventory = apply_filters(&full, &args.query.filter)?;

    let group_by = Field::lookup(&args.group_by)
        .with_context(|| format!("invalid --group-by '{}'", args.group_by))?;

    ui::header("Cost Visibility");

    let metrics = SnapshotMetrics::collect(&inventory);
    ui::kv("Total monthly cost", &ui::format_money(metrics.total_cost));
    ui::kv("Tagged cost", &ui::format_money(metrics.tagged_cost));
    ui::kv("Untagged cost", &ui::format_money(metrics.untagged_cost));
    ui::kv(
        "Untagged cost share",
        &ui::format_pct(metrics.untagged_cost_pct),
    );

    // Total cost by the grouping field, biggest consumers first.
    ui::section(&format!("Cost by {group_by}"));
    let by_group = aggregate(inventory.resources(), &[group_by], Metric::CostSum)?
        .sorted_by_value(false)
        .top(args.top);
    if by_group.is_empty() {
        ui::dim("no resources");
    } else {
        for row in &by_group.rows {
            println!("  {:<24} {:>14}", row.labels[0], ui::format_money(row.value));
        }
        if !ctx.quiet {
            let top = &by_group.rows[0];
            ui::dim(&format!(
                "highest spend: {} ({})",
                top.labels[0],
                ui::format_money(top.value)
            ));
        }
    }

    // Untagged spend only, attributed to the same grouping field.
    ui::section(&format!("Untagged cost by {group_by}"));
    let untagged = inventory.untagged_subset();
    let untagged_by_group = aggregate(untagged.resources(), &[group_by], Metric::CostSum)?
        .sorted_by_value(false)
        .top(args.top);
    if untagged_by_group.is_empty() {
        ui::dim("no untagged resources");
    } else {
        for row in &untagged_by_group.rows {
            println!("  {:<24} {:>14}", row.labels[0], ui::format_money(row.value));
        }
    }

    // Environment breakdown with per-environment tagging quality.
    ui::section("Cost by environment and tagging status");
    let env_pivot = pivot(
        inventory.resources(),
        Field::Environment,
        Field::Tagged,
        Metric::CostSum,
    )?;
    let counts = pivot(
        inventory.resources(),
        Field::Environment,
        Field::Tagged,
        Metric::Count,
    )?;
    if env_pivot.rows.is_empty() {
        ui::dim("no resources");
    } else {
        println!(
            "  {:<16} {:>14} {:>14} {:>10}",
            "Environment", "Tagged", "Untagged", "Tagged %"
        );
        for env in &env_pivot.rows {
            let tagged_count = counts.get(env, "Yes");
            let total_count = tagged_count + counts.get(env, "No");
            println!(
                "  {:<16} {:>14} {:>14} {:>10}",
                env,
                ui::format_money(env_pivot.get(env, "Yes")),
                ui::format_money(env_pivot.get(env, "No")),
                ui::format_pct(percentage(tagged_count, total_count))
            );
        }
    }

    Ok(())
}
