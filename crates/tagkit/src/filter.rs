//! Multi-valued inclusion filters with an "All" sentinel.
//!
//! Per field: an empty selection, or one containing the sentinel,
//! imposes no restriction. Otherwise a record passes the field iff its
//! normalized value is a member of the selected set. The overall result
//! is the conjunction across fields.
//!
//! The sentinel rule is a deliberate usability policy: defaulting to
//! "show everything" rather than "show nothing". An empty selection is
//! equivalent to selecting "All", never to excluding everything.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::types::{Field, Inventory, Resource};

/// Selecting this value (any case) makes a field's filter inactive.
pub const ALL_SENTINEL: &str = "All";

/// A set of per-field value selections.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    selections: Vec<(Field, HashSet<String>)>,
}

impl FilterSet {
    /// Create an empty filter set (matches every record).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selection for a field.
    ///
    /// Only groupable fields can be filtered; the numeric cost measure
    /// is rejected at the boundary. Selecting values for the same field
    /// twice merges the selections.
    pub fn select<I, S>(&mut self, field: Field, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !field.is_groupable() {
            return Err(Error::NotGroupable { field });
        }
        let values = values.into_iter().map(Into::into);
        if let Some((_, existing)) = self.selections.iter_mut().find(|(f, _)| *f == field) {
            existing.extend(values);
        } else {
            self.selections.push((field, values.collect()));
        }
        Ok(())
    }

    /// Whether no field imposes a restriction.
    pub fn is_empty(&self) -> bool {
        !self.selections.iter().any(|(_, v)| Self::is_active(v))
    }

    fn is_active(values: &HashSet<String>) -> bool {
        !values.is_empty() && !values.iter().any(|v| v.eq_ignore_ascii_case(ALL_SENTINEL))
    }

    /// Whether a record passes every active field selection.
    pub fn matches(&self, resource: &Resource) -> bool {
        self.selections.iter().all(|(field, values)| {
            if Self::is_active(values) {
                values.contains(field.group_label(resource))
            } else {
                true
            }
        })
    }

    /// Apply the filters to a snapshot, producing a new snapshot with
    /// the passing records in original order.
    pub fn apply(&self, inventory: &Inventory) -> Inventory {
        Inventory {
            resources: inventory
                .iter()
                .filter(|r| self.matches(r))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MISSING_LABEL;

    fn sample() -> Inventory {
        let mut r1 = Resource::new("r-1");
        r1.service = Some("EC2".into());
        r1.region = Some("us-east-1".into());
        let mut r2 = Resource::new("r-2");
        r2.service = Some("S3".into());
        r2.region = Some("us-east-1".into());
        let mut r3 = Resource::new("r-3");
        r3.service = Some("EC2".into());
        r3.region = Some("eu-west-1".into());
        let r4 = Resource::new("r-4"); // service and region missing

        Inventory::from_records(vec![r1, r2, r3, r4]).unwrap()
    }

    fn ids(inventory: &Inventory) -> Vec<&str> {
        inventory.iter().map(|r| r.resource_id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let inventory = sample();
        let filters = FilterSet::new();
        assert!(filters.is_empty());
        assert_eq!(ids(&filters.apply(&inventory)), ["r-1", "r-2", "r-3", "r-4"]);
    }

    #[test]
    fn test_all_sentinel_equivalent_to_empty() {
        let inventory = sample();
        let mut filters = FilterSet::new();
        filters.select(Field::Service, ["All"]).unwrap();
        assert!(filters.is_empty());
        assert_eq!(ids(&filters.apply(&inventory)), ["r-1", "r-2", "r-3", "r-4"]);

        // Sentinel mixed into a real selection still deactivates the field.
        let mut filters = FilterSet::new();
        filters.select(Field::Service, ["EC2", "All"]).unwrap();
        assert_eq!(filters.apply(&inventory).len(), 4);
    }

    #[test]
    fn test_single_field_inclusion() {
        let inventory = sample();
        let mut filters = FilterSet::new();
        filters.select(Field::Service, ["EC2"]).unwrap();
        assert_eq!(ids(&filters.apply(&inventory)), ["r-1", "r-3"]);
    }

    #[test]
    fn test_conjunction_across_fields() {
        let inventory = sample();
        let mut filters = FilterSet::new();
        filters.select(Field::Service, ["EC2"]).unwrap();
        filters.select(Field::Region, ["us-east-1"]).unwrap();
        assert_eq!(ids(&filters.apply(&inventory)), ["r-1"]);
    }

    #[test]
    fn test_missing_label_is_selectable() {
        let inventory = sample();
        let mut filters = FilterSet::new();
        filters.select(Field::Service, [MISSING_LABEL]).unwrap();
        assert_eq!(ids(&filters.apply(&inventory)), ["r-4"]);
    }

    #[test]
    fn test_repeated_select_merges() {
        let inventory = sample();
        let mut filters = FilterSet::new();
        filters.select(Field::Service, ["EC2"]).unwrap();
        filters.select(Field::Service, ["S3"]).unwrap();
        assert_eq!(ids(&filters.apply(&inventory)), ["r-1", "r-2", "r-3"]);
    }

    #[test]
    fn test_cost_not_filterable() {
        let mut filters = FilterSet::new();
        let err = filters.select(Field::MonthlyCostUsd, ["100"]).unwrap_err();
        assert!(matches!(err, Error::NotGroupable { .. }));
    }
}
