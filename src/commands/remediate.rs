//! Remediation workflow: apply an edit plan, compare before and after.

use anyhow::{Context as _, Result};
use chrono::Local;

use tagkit::{compare, dataset, remediate, ComparisonReport, EditPlan};

use crate::cli::RemediateArgs;
use crate::commands::load_inventory;
use crate::ui;
use crate::Context;

pub fn run(ctx: &Context, args: RemediateArgs) -> Result<()> {
    let before = load_inventory(&args.input)?;

    let edits = EditPlan::from_file(&args.edits)
        .with_context(|| format!("failed to load edit plan from {}", args.edits.display()))?
        .into_edit_set()
        .context("edit plan names an invalid field")?;

    ui::header("Tag Remediation");
    ui::kv("Resources", &before.len().to_string());
    ui::kv("Resources with edits", &edits.len().to_string());

    let outcome = remediate(&before, &edits);
    ui::kv("Edited", &outcome.edited.len().to_string());
    ui::kv("Newly compliant", &outcome.remediated.len().to_string());

    if !outcome.rejected.is_empty() {
        ui::warn(&format!(
            "rejected {} edit(s) targeting already-tagged resources: {}",
            outcome.rejected.len(),
            outcome.rejected.join(", ")
        ));
    }
    if !outcome.unknown.is_empty() {
        ui::warn(&format!(
            "edit plan names {} unknown resource(s): {}",
            outcome.unknown.len(),
            outcome.unknown.join(", ")
        ));
    }

    let report = compare(&before, &outcome.after);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.improvement > 0.0 {
        ui::success(&format!(
            "untagged share dropped by {}",
            ui::format_pct(report.improvement)
        ));
    } else if !ctx.quiet {
        ui::dim("no change in untagged share");
    }

    if let Some(path) = &args.output {
        dataset::write_file(&outcome.after, path)
            .with_context(|| format!("failed to write remediated dataset to {}", path.display()))?;
        ui::success(&format!("wrote remediated dataset to {}", path.display()));
    }
    if let Some(path) = &args.export_untagged {
        let remaining = outcome.after.untagged_subset();
        dataset::write_file(&remaining, path)
            .with_context(|| format!("failed to write untagged subset to {}", path.display()))?;
        ui::success(&format!(
            "wrote {} still-untagged resources to {}",
            remaining.len(),
            path.display()
        ));
    }
    if (args.output.is_some() || args.export_untagged.is_some()) && !ctx.quiet {
        ui::dim(&format!(
            "generated {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
    }

    Ok(())
}

/// Render the before/after comparison as an aligned table. Percentages
/// are rounded here, at presentation time only.
fn print_report(report: &ComparisonReport) {
    ui::section("Before vs after");
    println!(
        "  {:<22} {:>14} {:>14} {:>10}",
        "Metric", "Before", "After", "Delta"
    );
    println!(
        "  {:<22} {:>14} {:>14} {:>10}",
        "Tagged resources",
        report.before.tagged_resources,
        report.after.tagged_resources,
        format!("{:+}", report.tagged_delta)
    );
    println!(
        "  {:<22} {:>14} {:>14} {:>10}",
        "Untagged resources",
        report.before.untagged_resources,
        report.after.untagged_resources,
        format!("{:+}", report.untagged_delta)
    );
    println!(
        "  {:<22} {:>14} {:>14} {:>10}",
        "Untagged share",
        ui::format_pct(report.before.untagged_pct),
        ui::format_pct(report.after.untagged_pct),
        ui::format_delta(report.untagged_pct_delta)
    );
    println!(
        "  {:<22} {:>14} {:>14} {:>10}",
        "Untagged cost",
        ui::format_money(report.before.untagged_cost),
        ui::format_money(report.after.untagged_cost),
        ui::format_delta(report.untagged_cost_delta)
    );
    println!(
        "  {:<22} {:>14} {:>14} {:>10}",
        "Untagged cost share",
        ui::format_pct(report.before.untagged_cost_pct),
        ui::format_pct(report.after.untagged_cost_pct),
        ui::format_delta(report.untagged_cost_pct_delta)
    );
}
