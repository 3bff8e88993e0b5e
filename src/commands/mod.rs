//! Command implementations for the tagaudit CLI.

pub mod compliance;
pub mod costs;
pub mod remediate;
pub mod summary;
pub mod untagged;

use anyhow::{bail, Context as _, Result};
use std::path::Path;

use tagkit::{Field, FilterSet, Inventory};

use crate::progress;

/// Load an inventory snapshot from disk, with a spinner.
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let pb = progress::spinner("Loading inventory...");
    let inventory = tagkit::dataset::parse_file(path)
        .with_context(|| format!("failed to load inventory from {}", path.display()))?;
    progress::finish_clear(&pb);
    log::info!("loaded {} resources", inventory.len());
    Ok(inventory)
}

/// Parse `FIELD=V1,V2` filter specs into a filter set.
pub fn parse_filters(specs: &[String]) -> Result<FilterSet> {
    let mut filters = FilterSet::new();
    for spec in specs {
        let Some((name, values)) = spec.split_once('=') else {
            bail!("invalid filter '{spec}', expected FIELD=VALUE[,VALUE...]");
        };
        let field = Field::lookup(name).with_context(|| format!("in filter '{spec}'"))?;
        filters
            .select(field, values.split(',').map(str::trim).map(String::from))
            .with_context(|| format!("in filter '{spec}'"))?;
    }
    Ok(filters)
}

/// Apply filter specs to a snapshot, returning the (possibly reduced)
/// snapshot to query.
pub fn apply_filters(inventory: &Inventory, specs: &[String]) -> Result<Inventory> {
    let filters = parse_filters(specs)?;
    if filters.is_empty() {
        return Ok(inventory.clone());
    }
    let filtered = filters.apply(inventory);
    log::info!(
        "filters kept {} of {} resources",
        filtered.len(),
        inventory.len()
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagkit::{Resource, TagStatus};

    fn sample() -> Inventory {
        let mut r1 = Resource::new("r-1");
        r1.service = Some("EC2".into());
        r1.tagged = TagStatus::Yes;
        let mut r2 = Resource::new("r-2");
        r2.service = Some("S3".into());
        Inventory::from_records(vec![r1, r2]).unwrap()
    }

    #[test]
    fn test_parse_filters_rejects_bad_spec() {
        assert!(parse_filters(&["ServiceEC2".to_string()]).is_err());
        assert!(parse_filters(&["Nope=EC2".to_string()]).is_err());
        assert!(parse_filters(&["MonthlyCostUSD=5".to_string()]).is_err());
    }

    #[test]
    fn test_apply_filters() {
        let inventory = sample();

        let all = apply_filters(&inventory, &[]).unwrap();
        assert_eq!(all.len(), 2);

        let sentinel = apply_filters(&inventory, &["Service=All".to_string()]).unwrap();
        assert_eq!(sentinel.len(), 2);

        let ec2 = apply_filters(&inventory, &["Service=EC2".to_string()]).unwrap();
        assert_eq!(ec2.len(), 1);
        assert_eq!(ec2.resources()[0].resource_id, "r-1");
    }

    #[test]
    fn test_load_inventory_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        tagkit::dataset::write_file(&sample(), &path).unwrap();

        let loaded = load_inventory(&path).unwrap();
        assert_eq!(loaded, sample());

        assert!(load_inventory(&dir.path().join("missing.csv")).is_err());
    }
}
