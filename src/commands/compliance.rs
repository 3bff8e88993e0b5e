//! Tag completeness scoring and missing-field analysis.

use anyhow::Result;

use tagkit::{average_completeness, missing_field_frequency, rank_lowest, Field};

use crate::cli::ComplianceArgs;
use crate::commands::{apply_filters, load_inventory};
use crate::ui;
use crate::Context;

pub fn run(ctx: &Context, args: ComplianceArgs) -> Result<()> {
    let full = load_inventory(&args.query.input)?;
    let inventory = apply_filters(&full, &args.query.filter)?;

    ui::header("Tag Compliance");
    ui::kv("Resources", &inventory.len().to_string());
    ui::kv(
        "Average completeness",
        &ui::format_pct(average_completeness(
            inventory.resources(),
            &Field::TAG_FIELDS,
        )),
    );

    ui::section(&format!("Lowest {} completeness scores", args.lowest));
    let lowest = rank_lowest(inventory.resources(), &Field::TAG_FIELDS, args.lowest);
    if lowest.is_empty() {
        ui::dim("no resources");
    } else {
        println!(
            "  {:<16} {:<12} {:>5}  {:>8} {:>12}",
            "ResourceID", "Service", "Score", "Percent", "Cost"
        );
        for scored in &lowest {
            let resource = scored.resource;
            println!(
                "  {:<16} {:<12} {:>2}/{}  {:>8} {:>12}",
                resource.resource_id,
                resource.service.as_deref().unwrap_or("-"),
                scored.score,
                Field::TAG_FIELDS.len(),
                ui::format_pct(scored.percentage),
                ui::format_money(resource.monthly_cost_usd)
            );
        }
    }

    ui::section("Missing tag fields");
    let missing = missing_field_frequency(inventory.resources(), &Field::TAG_FIELDS);
    for (field, count) in &missing {
        println!("  {:<14} {count}", field.column());
    }
    if !ctx.quiet {
        if let Some((field, count)) = missing.first().filter(|(_, count)| *count > 0) {
            ui::dim(&format!(
                "most frequently missing: {} ({count} resources)",
                field.column()
            ));
        }
    }

    Ok(())
}
