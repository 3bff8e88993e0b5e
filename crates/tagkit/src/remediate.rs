//! Remediation: apply tag-field edits to the untagged subset of a
//! snapshot and derive a new snapshot with recomputed compliance.
//!
//! Per untagged resource the states are: **Untagged** (initial) →
//! **Edited** (one or more tag fields overwritten) → **Remediated**
//! (terminal, reached iff all five tag fields are present after edits,
//! at which point `tagged` flips to `Yes`). The gate is a strict AND
//! over all five fields: filling four of five keeps the resource
//! Edited with `tagged = No`, because partial tagging does not count
//! as compliant.
//!
//! Already-tagged resources are never processed; they pass through into
//! the new snapshot unchanged. The engine neither introduces nor drops
//! records, so the output snapshot always has the input's size.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{normalize, Field, Inventory, TagStatus};

/// A complete set of tag-field edits keyed by resource id.
///
/// Values are normalized at insertion: an empty or whitespace value
/// clears the field rather than storing empty text.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: BTreeMap<String, Vec<(Field, Option<String>)>>,
}

impl EditSet {
    /// Create an empty edit set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit to one tag field of one resource.
    ///
    /// Only the five tag fields are editable; anything else is rejected
    /// at the boundary.
    pub fn set(&mut self, resource_id: impl Into<String>, field: Field, value: &str) -> Result<()> {
        if !field.is_tag_field() {
            return Err(Error::NotATagField { field });
        }
        self.edits
            .entry(resource_id.into())
            .or_default()
            .push((field, normalize(value)));
        Ok(())
    }

    /// Number of resources with at least one edit.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether no edits are recorded.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Ids of all edited resources, in sorted order.
    pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
        self.edits.keys().map(String::as_str)
    }

    fn get(&self, resource_id: &str) -> Option<&[(Field, Option<String>)]> {
        self.edits.get(resource_id).map(Vec::as_slice)
    }
}

/// Serialized edit plan, as consumed from a JSON file.
///
/// ```json
/// {
///   "edits": [
///     { "resource": "r-001", "fields": { "Department": "Finance", "Owner": "alice" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditPlan {
    /// Planned edits, one entry per resource
    pub edits: Vec<PlannedEdit>,
}

/// One resource's worth of planned tag-field assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedEdit {
    /// Target resource id
    pub resource: String,
    /// Column name to new value
    pub fields: BTreeMap<String, String>,
}

impl EditPlan {
    /// Parse a plan from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a plan from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Resolve column names into the closed field enumeration.
    ///
    /// Unknown columns and non-tag fields are rejected here, before any
    /// edit touches a snapshot.
    pub fn into_edit_set(self) -> Result<EditSet> {
        let mut set = EditSet::new();
        for planned in self.edits {
            for (column, value) in &planned.fields {
                let field = Field::lookup(column)?;
                set.set(planned.resource.clone(), field, value)?;
            }
        }
        Ok(set)
    }
}

/// Result of one remediation pass.
#[derive(Debug, Clone)]
pub struct RemediationOutcome {
    /// The derived snapshot, same size and order as the input
    pub after: Inventory,
    /// Untagged resources that received at least one edit
    pub edited: Vec<String>,
    /// Edited resources whose five tag fields are now all present
    pub remediated: Vec<String>,
    /// Edits rejected because the target was already tagged
    pub rejected: Vec<String>,
    /// Edits naming a resource id not present in the snapshot
    pub unknown: Vec<String>,
}

/// Apply a complete edit set to a snapshot and derive the
/// post-remediation snapshot.
///
/// The input snapshot is never mutated. Edits targeting resources
/// outside the not-tagged partition violate the remediation guard: the
/// edit is rejected and the original record preserved unchanged. Guard
/// violations are reported in the outcome, not raised, so one bad edit
/// never aborts the pass.
pub fn remediate(before: &Inventory, edits: &EditSet) -> RemediationOutcome {
    let mut after = Vec::with_capacity(before.len());
    let mut edited = Vec::new();
    let mut remediated = Vec::new();
    let mut rejected = Vec::new();

    for resource in before {
        let Some(changes) = edits.get(&resource.resource_id) else {
            after.push(resource.clone());
            continue;
        };

        if resource.is_tagged() {
            log::warn!(
                "rejecting edit for {}: resource is already tagged",
                resource.resource_id
            );
            rejected.push(resource.resource_id.clone());
            after.push(resource.clone());
            continue;
        }

        let mut updated = resource.clone();
        for (field, value) in changes {
            updated.set_tag_field(*field, value.clone());
        }
        edited.push(updated.resource_id.clone());

        if updated.tags_complete() {
            updated.tagged = TagStatus::Yes;
            remediated.push(updated.resource_id.clone());
            log::debug!("{} remediated, all tag fields present", updated.resource_id);
        }
        after.push(updated);
    }

    let unknown: Vec<String> = edits
        .resource_ids()
        .filter(|id| before.get(id).is_none())
        .map(String::from)
        .collect();
    for id in &unknown {
        log::warn!("edit plan names unknown resource {id}");
    }

    RemediationOutcome {
        // Ids were unique before and edits never touch them.
        after: Inventory { resources: after },
        edited,
        remediated,
        rejected,
        unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Resource;

    fn untagged(id: &str) -> Resource {
        Resource::new(id)
    }

    fn tagged(id: &str) -> Resource {
        let mut r = Resource::new(id);
        r.department = Some("Finance".into());
        r.project = Some("Atlas".into());
        r.environment = Some("Prod".into());
        r.owner = Some("alice".into());
        r.cost_center = Some("CC-100".into());
        r.tagged = TagStatus::Yes;
        r
    }

    fn fill_all(edits: &mut EditSet, id: &str) {
        for (field, value) in Field::TAG_FIELDS
            .into_iter()
            .zip(["Retail", "Mercury", "Dev", "bob", "CC-200"])
        {
            edits.set(id, field, value).unwrap();
        }
    }

    #[test]
    fn test_full_fill_reaches_remediated() {
        let before = Inventory::from_records(vec![untagged("r-1")]).unwrap();
        let mut edits = EditSet::new();
        fill_all(&mut edits, "r-1");

        let outcome = remediate(&before, &edits);
        let updated = outcome.after.get("r-1").unwrap();
        assert_eq!(updated.tagged, TagStatus::Yes);
        assert_eq!(outcome.remediated, ["r-1"]);
        assert_eq!(outcome.edited, ["r-1"]);
    }

    #[test]
    fn test_partial_fill_stays_untagged() {
        let before = Inventory::from_records(vec![untagged("r-1")]).unwrap();
        let mut edits = EditSet::new();
        // Four of five fields: still not compliant.
        edits.set("r-1", Field::Department, "Retail").unwrap();
        edits.set("r-1", Field::Project, "Mercury").unwrap();
        edits.set("r-1", Field::Environment, "Dev").unwrap();
        edits.set("r-1", Field::Owner, "bob").unwrap();

        let outcome = remediate(&before, &edits);
        let updated = outcome.after.get("r-1").unwrap();
        assert_eq!(updated.tagged, TagStatus::No);
        assert_eq!(updated.department.as_deref(), Some("Retail"));
        assert!(outcome.remediated.is_empty());
        assert_eq!(outcome.edited, ["r-1"]);
    }

    #[test]
    fn test_empty_edit_value_does_not_count_as_present() {
        let before = Inventory::from_records(vec![untagged("r-1")]).unwrap();
        let mut edits = EditSet::new();
        fill_all(&mut edits, "r-1");
        edits.set("r-1", Field::Owner, "   ").unwrap();

        let outcome = remediate(&before, &edits);
        let updated = outcome.after.get("r-1").unwrap();
        assert_eq!(updated.owner, None);
        assert_eq!(updated.tagged, TagStatus::No);
    }

    #[test]
    fn test_guard_rejects_edit_on_tagged_resource() {
        let before = Inventory::from_records(vec![tagged("r-1")]).unwrap();
        let mut edits = EditSet::new();
        edits.set("r-1", Field::Owner, "mallory").unwrap();

        let outcome = remediate(&before, &edits);
        let kept = outcome.after.get("r-1").unwrap();
        assert_eq!(kept.owner.as_deref(), Some("alice"));
        assert_eq!(outcome.rejected, ["r-1"]);
        assert!(outcome.edited.is_empty());
    }

    #[test]
    fn test_unknown_resource_reported() {
        let before = Inventory::from_records(vec![untagged("r-1")]).unwrap();
        let mut edits = EditSet::new();
        edits.set("r-ghost", Field::Owner, "nobody").unwrap();

        let outcome = remediate(&before, &edits);
        assert_eq!(outcome.unknown, ["r-ghost"]);
        assert_eq!(outcome.after.len(), 1);
    }

    #[test]
    fn test_record_count_preserved() {
        let before = Inventory::from_records(vec![
            tagged("r-1"),
            untagged("r-2"),
            untagged("r-3"),
        ])
        .unwrap();
        let mut edits = EditSet::new();
        fill_all(&mut edits, "r-2");

        let outcome = remediate(&before, &edits);
        assert_eq!(outcome.after.len(), before.len());

        // Order preserved too.
        let ids: Vec<&str> = outcome.after.iter().map(|r| r.resource_id.as_str()).collect();
        assert_eq!(ids, ["r-1", "r-2", "r-3"]);
    }

    #[test]
    fn test_tagged_implies_all_fields_present() {
        let before = Inventory::from_records(vec![
            untagged("r-1"),
            untagged("r-2"),
            untagged("r-3"),
            untagged("r-4"),
        ])
        .unwrap();

        let mut edits = EditSet::new();
        fill_all(&mut edits, "r-1");
        fill_all(&mut edits, "r-2");
        fill_all(&mut edits, "r-3");
        // r-4 gets everything except Owner.
        edits.set("r-4", Field::Department, "Retail").unwrap();
        edits.set("r-4", Field::Project, "Mercury").unwrap();
        edits.set("r-4", Field::Environment, "Dev").unwrap();
        edits.set("r-4", Field::CostCenter, "CC-200").unwrap();

        let outcome = remediate(&before, &edits);
        assert_eq!(outcome.after.untagged_count(), 1);
        assert_eq!(outcome.remediated, ["r-1", "r-2", "r-3"]);
        for resource in &outcome.after {
            if resource.is_tagged() {
                assert!(resource.tags_complete());
            }
        }
    }

    #[test]
    fn test_edit_set_rejects_non_tag_field() {
        let mut edits = EditSet::new();
        let err = edits.set("r-1", Field::Service, "EC2").unwrap_err();
        assert!(matches!(err, Error::NotATagField { field: Field::Service }));
    }

    #[test]
    fn test_edit_plan_resolution() {
        let json = r#"{
            "edits": [
                { "resource": "r-1", "fields": { "Department": "Finance", "Owner": "alice" } }
            ]
        }"#;
        let plan = EditPlan::from_json(json).unwrap();
        let set = plan.into_edit_set().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.resource_ids().collect::<Vec<_>>(), ["r-1"]);
    }

    #[test]
    fn test_edit_plan_rejects_unknown_column() {
        let json = r#"{ "edits": [ { "resource": "r-1", "fields": { "Nope": "x" } } ] }"#;
        let err = EditPlan::from_json(json).unwrap().into_edit_set().unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_edit_plan_rejects_non_tag_column() {
        let json = r#"{ "edits": [ { "resource": "r-1", "fields": { "Service": "EC2" } } ] }"#;
        let err = EditPlan::from_json(json).unwrap().into_edit_set().unwrap_err();
        assert!(matches!(err, Error::NotATagField { .. }));
    }
}
