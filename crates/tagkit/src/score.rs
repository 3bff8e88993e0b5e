//! Per-resource tag completeness scoring.
//!
//! The completeness score counts how many of the given tag fields carry
//! a present value after normalization. The asserted `Tagged` flag plays
//! no part here: scoring computes only from what is actually present.

use crate::aggregate::round2;
use crate::types::{Field, Resource};

/// A resource paired with its completeness score.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<'a> {
    /// The scored resource
    pub resource: &'a Resource,
    /// Count of present tag fields, in `[0, len(tag_fields)]`
    pub score: usize,
    /// Score as a percentage, rounded to 2 decimal places
    pub percentage: f64,
}

/// Count of `tag_fields` whose normalized value is present on `resource`.
pub fn score(resource: &Resource, tag_fields: &[Field]) -> usize {
    tag_fields.iter().filter(|f| f.is_present(resource)).count()
}

/// Completeness score as a percentage, rounded to 2 decimal places.
///
/// An empty field set is vacuously complete: the result is `100.0`.
pub fn completeness_percentage(resource: &Resource, tag_fields: &[Field]) -> f64 {
    if tag_fields.is_empty() {
        return 100.0;
    }
    round2(score(resource, tag_fields) as f64 / tag_fields.len() as f64 * 100.0)
}

/// Score every record, preserving input order.
pub fn score_all<'a>(records: &'a [Resource], tag_fields: &[Field]) -> Vec<Scored<'a>> {
    records
        .iter()
        .map(|resource| Scored {
            resource,
            score: score(resource, tag_fields),
            percentage: completeness_percentage(resource, tag_fields),
        })
        .collect()
}

/// Mean completeness percentage across all records, rounded to 2
/// decimal places. Zero records yield `0.0`.
pub fn average_completeness(records: &[Resource], tag_fields: &[Field]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records
        .iter()
        .map(|r| completeness_percentage(r, tag_fields))
        .sum();
    round2(sum / records.len() as f64)
}

/// The `n` resources with the smallest completeness scores.
///
/// The underlying sort is stable and ascending, so ties are broken by
/// original input order: with more tied resources than `n`, exactly the
/// first `n` encountered are returned. This determines which resources
/// a remediation workflow surfaces first, so it must be deterministic
/// across runs given identical input order.
pub fn rank_lowest<'a>(records: &'a [Resource], tag_fields: &[Field], n: usize) -> Vec<Scored<'a>> {
    let mut scored = score_all(records, tag_fields);
    scored.sort_by_key(|s| s.score);
    scored.truncate(n);
    scored
}

/// Per-field count of records where the field is normalized-missing.
///
/// Sorted descending by count; ties keep the field's position in
/// `tag_fields`.
pub fn missing_field_frequency(records: &[Resource], tag_fields: &[Field]) -> Vec<(Field, usize)> {
    let mut counts: Vec<(Field, usize)> = tag_fields
        .iter()
        .map(|field| {
            let missing = records.iter().filter(|r| !field.is_present(r)).count();
            (*field, missing)
        })
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Inventory;

    fn with_tags(id: &str, present: usize) -> Resource {
        let mut r = Resource::new(id);
        let values = ["Finance", "Atlas", "Prod", "alice", "CC-100"];
        for (field, value) in Field::TAG_FIELDS.into_iter().zip(values).take(present) {
            r.set_tag_field(field, Some(value.to_string()));
        }
        r
    }

    #[test]
    fn test_score_bounds() {
        for present in 0..=5 {
            let r = with_tags("r-1", present);
            let s = score(&r, &Field::TAG_FIELDS);
            assert_eq!(s, present);
            assert!(s <= Field::TAG_FIELDS.len());
        }
    }

    #[test]
    fn test_completeness_percentage() {
        let r = with_tags("r-1", 3);
        assert_eq!(completeness_percentage(&r, &Field::TAG_FIELDS), 60.0);

        let r = with_tags("r-2", 1);
        assert_eq!(completeness_percentage(&r, &Field::TAG_FIELDS), 20.0);
    }

    #[test]
    fn test_empty_field_set_is_vacuously_complete() {
        let r = Resource::new("r-1");
        assert_eq!(completeness_percentage(&r, &[]), 100.0);
    }

    #[test]
    fn test_whitespace_value_counts_as_missing() {
        let mut r = Resource::new("r-1");
        // Normalization happens at ingestion; a None is what an empty
        // cell becomes.
        r.department = None;
        assert_eq!(score(&r, &[Field::Department]), 0);
    }

    #[test]
    fn test_average_completeness() {
        let records = vec![with_tags("r-1", 5), with_tags("r-2", 0)];
        assert_eq!(average_completeness(&records, &Field::TAG_FIELDS), 50.0);
        assert_eq!(average_completeness(&[], &Field::TAG_FIELDS), 0.0);
    }

    #[test]
    fn test_rank_lowest_ties_keep_input_order() {
        // 7 resources all tied at score 0; the first 5 in input order win.
        let records: Vec<Resource> = (1..=7).map(|i| with_tags(&format!("r-{i}"), 0)).collect();
        let inventory = Inventory::from_records(records).unwrap();

        let lowest = rank_lowest(inventory.resources(), &Field::TAG_FIELDS, 5);
        let ids: Vec<&str> = lowest.iter().map(|s| s.resource.resource_id.as_str()).collect();
        assert_eq!(ids, ["r-1", "r-2", "r-3", "r-4", "r-5"]);
    }

    #[test]
    fn test_rank_lowest_orders_by_score() {
        let records = vec![with_tags("r-1", 4), with_tags("r-2", 1), with_tags("r-3", 2)];
        let lowest = rank_lowest(&records, &Field::TAG_FIELDS, 2);
        let ids: Vec<&str> = lowest.iter().map(|s| s.resource.resource_id.as_str()).collect();
        assert_eq!(ids, ["r-2", "r-3"]);
    }

    #[test]
    fn test_missing_field_frequency_sorted() {
        let mut r1 = Resource::new("r-1");
        r1.department = Some("Finance".into());
        let mut r2 = Resource::new("r-2");
        r2.department = Some("Retail".into());
        r2.owner = Some("bob".into());

        let records = vec![r1, r2];
        let freq = missing_field_frequency(&records, &Field::TAG_FIELDS);

        // Project, Environment, CostCenter all missing twice; ties keep
        // tag-field order. Owner missing once, Department never.
        let fields: Vec<Field> = freq.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            fields,
            [
                Field::Project,
                Field::Environment,
                Field::CostCenter,
                Field::Owner,
                Field::Department,
            ]
        );
        assert_eq!(freq[0].1, 2);
        assert_eq!(freq[3].1, 1);
        assert_eq!(freq[4].1, 0);
    }
}
