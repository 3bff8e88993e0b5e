//! Core types for tag compliance auditing.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};

/// Canonical label for a missing value when it participates in grouping
/// or filtering. Missing values form their own group so that costs never
/// silently disappear from a total.
pub const MISSING_LABEL: &str = "(missing)";

/// Normalize a raw cell value: trims whitespace and converts empty
/// strings to `None`.
///
/// The ingestion format can yield empty-string artifacts that are
/// semantically "missing", not "empty text". All completeness and filter
/// computations operate on normalized values.
pub fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The closed set of known resource fields.
///
/// Field access is always through this enumeration rather than raw
/// strings, so an invalid field name is rejected at the boundary instead
/// of silently producing an empty group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Unique resource identifier (primary key)
    #[serde(rename = "ResourceID")]
    ResourceId,
    /// Owning cloud account
    #[serde(rename = "AccountID")]
    AccountId,
    /// Cloud service (EC2, S3, ...)
    #[serde(rename = "Service")]
    Service,
    /// Deployment region
    #[serde(rename = "Region")]
    Region,
    /// Tag field: owning department
    #[serde(rename = "Department")]
    Department,
    /// Tag field: project the resource belongs to
    #[serde(rename = "Project")]
    Project,
    /// Tag field: environment (Prod, Dev, Test, ...)
    #[serde(rename = "Environment")]
    Environment,
    /// Tag field: responsible owner
    #[serde(rename = "Owner")]
    Owner,
    /// Tag field: cost center for chargeback
    #[serde(rename = "CostCenter")]
    CostCenter,
    /// Who created the resource
    #[serde(rename = "CreatedBy")]
    CreatedBy,
    /// Monthly cost in USD
    #[serde(rename = "MonthlyCostUSD")]
    MonthlyCostUsd,
    /// Asserted compliance flag
    #[serde(rename = "Tagged")]
    Tagged,
}

impl Field {
    /// All known fields, in ingestion column order.
    pub const ALL: [Field; 12] = [
        Field::ResourceId,
        Field::AccountId,
        Field::Service,
        Field::Region,
        Field::Department,
        Field::Project,
        Field::Environment,
        Field::Owner,
        Field::CostCenter,
        Field::CreatedBy,
        Field::MonthlyCostUsd,
        Field::Tagged,
    ];

    /// The five tag fields used to assess metadata completeness, in
    /// canonical order.
    pub const TAG_FIELDS: [Field; 5] = [
        Field::Department,
        Field::Project,
        Field::Environment,
        Field::Owner,
        Field::CostCenter,
    ];

    /// Get the ingestion column name for this field.
    pub fn column(&self) -> &'static str {
        match self {
            Field::ResourceId => "ResourceID",
            Field::AccountId => "AccountID",
            Field::Service => "Service",
            Field::Region => "Region",
            Field::Department => "Department",
            Field::Project => "Project",
            Field::Environment => "Environment",
            Field::Owner => "Owner",
            Field::CostCenter => "CostCenter",
            Field::CreatedBy => "CreatedBy",
            Field::MonthlyCostUsd => "MonthlyCostUSD",
            Field::Tagged => "Tagged",
        }
    }

    /// Parse a field from a column name (case-insensitive).
    pub fn from_column(name: &str) -> Option<Self> {
        let name = name.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.column().eq_ignore_ascii_case(name))
    }

    /// Look up a field by column name, rejecting unknown names.
    pub fn lookup(name: &str) -> Result<Self> {
        Field::from_column(name).ok_or_else(|| Error::UnknownField {
            name: name.trim().to_string(),
        })
    }

    /// Whether this field is one of the five tag fields.
    pub fn is_tag_field(&self) -> bool {
        Field::TAG_FIELDS.contains(self)
    }

    /// Whether this field can serve as a group-by or filter key.
    ///
    /// Every text-valued field (including `Tagged`) is groupable; the
    /// numeric cost column is a measure, not a key.
    pub fn is_groupable(&self) -> bool {
        !matches!(self, Field::MonthlyCostUsd)
    }

    /// Get the normalized value of this field on a resource, or `None`
    /// if missing. The cost column has no text value.
    pub fn value<'a>(&self, resource: &'a Resource) -> Option<&'a str> {
        match self {
            Field::ResourceId => Some(&resource.resource_id),
            Field::AccountId => resource.account_id.as_deref(),
            Field::Service => resource.service.as_deref(),
            Field::Region => resource.region.as_deref(),
            Field::Department => resource.department.as_deref(),
            Field::Project => resource.project.as_deref(),
            Field::Environment => resource.environment.as_deref(),
            Field::Owner => resource.owner.as_deref(),
            Field::CostCenter => resource.cost_center.as_deref(),
            Field::CreatedBy => resource.created_by.as_deref(),
            Field::MonthlyCostUsd => None,
            Field::Tagged => Some(resource.tagged.as_str()),
        }
    }

    /// Get the group label for this field on a resource: the normalized
    /// value, or [`MISSING_LABEL`] when absent.
    pub fn group_label<'a>(&self, resource: &'a Resource) -> &'a str {
        self.value(resource).unwrap_or(MISSING_LABEL)
    }

    /// Whether this field has a present (normalized non-empty) value on
    /// the given resource.
    pub fn is_present(&self, resource: &Resource) -> bool {
        self.value(resource).is_some()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// Asserted compliance flag on a resource.
///
/// The flag is an independent signal: a resource may be marked `Yes`
/// while some tag fields are empty, and vice versa. Nothing in this
/// crate assumes the two are consistent; the remediation engine's
/// recompute rule is the only place one is derived from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagStatus {
    /// Marked compliant
    Yes,
    /// Marked non-compliant
    No,
}

impl TagStatus {
    /// Get the wire representation of this flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagStatus::Yes => "Yes",
            TagStatus::No => "No",
        }
    }

    /// Parse a flag value (case-insensitive).
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Some(TagStatus::Yes),
            "no" => Some(TagStatus::No),
            _ => None,
        }
    }

    /// Whether this is the tagged state.
    pub fn is_tagged(&self) -> bool {
        matches!(self, TagStatus::Yes)
    }
}

impl std::fmt::Display for TagStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One cloud resource record.
///
/// String fields other than the id are optional: a value of `None`
/// means the field was missing or empty at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier, primary key within a snapshot
    pub resource_id: String,
    /// Owning cloud account
    pub account_id: Option<String>,
    /// Cloud service
    pub service: Option<String>,
    /// Deployment region
    pub region: Option<String>,
    /// Tag field: owning department
    pub department: Option<String>,
    /// Tag field: project
    pub project: Option<String>,
    /// Tag field: environment
    pub environment: Option<String>,
    /// Tag field: owner
    pub owner: Option<String>,
    /// Tag field: cost center
    pub cost_center: Option<String>,
    /// Who created the resource
    pub created_by: Option<String>,
    /// Monthly cost in USD, never negative
    pub monthly_cost_usd: f64,
    /// Asserted compliance flag
    pub tagged: TagStatus,
}

impl Resource {
    /// Create a resource with the given id, no cost and no tags.
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            account_id: None,
            service: None,
            region: None,
            department: None,
            project: None,
            environment: None,
            owner: None,
            cost_center: None,
            created_by: None,
            monthly_cost_usd: 0.0,
            tagged: TagStatus::No,
        }
    }

    /// Whether the asserted flag marks this resource as tagged.
    pub fn is_tagged(&self) -> bool {
        self.tagged.is_tagged()
    }

    /// Whether all five tag fields are present after normalization.
    ///
    /// This is the all-or-nothing compliance gate: partial fill does
    /// not count.
    pub fn tags_complete(&self) -> bool {
        Field::TAG_FIELDS.iter().all(|f| f.is_present(self))
    }

    /// Overwrite one tag field with an already-normalized value.
    ///
    /// Callers must pass a tag field; the closed enumeration makes any
    /// other field unrepresentable here.
    pub(crate) fn set_tag_field(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::Department => self.department = value,
            Field::Project => self.project = value,
            Field::Environment => self.environment = value,
            Field::Owner => self.owner = value,
            Field::CostCenter => self.cost_center = value,
            _ => {}
        }
    }
}

/// An immutable point-in-time collection of resource records.
///
/// Constructed once per session and passed by reference to every
/// engine; no engine mutates a snapshot in place. Derived snapshots
/// (filtered subsets, post-remediation states) are new values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub(crate) resources: Vec<Resource>,
}

impl Inventory {
    /// Build a snapshot from records, validating id uniqueness.
    pub fn from_records(resources: Vec<Resource>) -> Result<Self> {
        let mut seen = HashSet::new();
        for resource in &resources {
            if !seen.insert(resource.resource_id.as_str()) {
                return Err(Error::DuplicateResource {
                    id: resource.resource_id.clone(),
                });
            }
        }
        Ok(Self { resources })
    }

    /// Number of resources in the snapshot.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the snapshot holds no resources.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// All records, in original ingestion order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Iterate over records in ingestion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    /// Look up a record by id.
    pub fn get(&self, resource_id: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.resource_id == resource_id)
    }

    /// Count of resources with the asserted flag set to `Yes`.
    pub fn tagged_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_tagged()).count()
    }

    /// Count of resources with the asserted flag set to `No`.
    pub fn untagged_count(&self) -> usize {
        self.resources.iter().filter(|r| !r.is_tagged()).count()
    }

    /// New snapshot holding only the untagged resources, in order.
    pub fn untagged_subset(&self) -> Inventory {
        Inventory {
            resources: self
                .resources
                .iter()
                .filter(|r| !r.is_tagged())
                .cloned()
                .collect(),
        }
    }

    /// New snapshot holding only the tagged resources, in order.
    pub fn tagged_subset(&self) -> Inventory {
        Inventory {
            resources: self
                .resources
                .iter()
                .filter(|r| r.is_tagged())
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
