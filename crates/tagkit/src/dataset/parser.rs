//! Parser for the quoted-CSV inventory format.
//!
//! Every line of the source, including the header, is wrapped in a
//! literal outer quote character that must be stripped before
//! structural parsing:
//! ```text
//! "ResourceID,AccountID,Service,...,MonthlyCostUSD,Tagged"
//! "r-001,123456789,EC2,...,142.50,No"
//! ```
//! Empty cell values are normalized to missing before any record
//! reaches the engines. The required column set is validated up front;
//! a missing column is a schema violation, never an empty group.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{normalize, Field, Inventory, Resource, TagStatus};

/// Parse an inventory from a file path.
///
/// An unreadable source is fatal to the session; no computation is
/// attempted on partial data.
pub fn parse_file(path: &Path) -> Result<Inventory> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let inventory = parse_string(&content)?;
    log::debug!("loaded {} resources from {}", inventory.len(), path.display());
    Ok(inventory)
}

/// Parse an inventory from a string.
pub fn parse_string(content: &str) -> Result<Inventory> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, strip_outer_quotes(line)))
        .filter(|(_, line)| !line.is_empty());

    let Some((_, header)) = lines.next() else {
        // A completely empty source has no header to violate; it is a
        // degenerate but well-formed empty snapshot.
        return Inventory::from_records(Vec::new());
    };

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let layout = Layout::from_columns(&columns)?;

    let mut records = Vec::new();
    for (line_num, line) in lines {
        records.push(layout.parse_row(line, line_num, columns.len())?);
    }

    Inventory::from_records(records)
}

/// Strip the literal outer quote wrapping and any trailing carriage
/// return from one raw line.
fn strip_outer_quotes(line: &str) -> &str {
    line.trim_end_matches('\r').trim().trim_matches('"')
}

/// Column positions for the required fields, resolved from the header.
struct Layout {
    positions: [usize; Field::ALL.len()],
}

impl Layout {
    fn from_columns(columns: &[&str]) -> Result<Self> {
        let mut positions = [0usize; Field::ALL.len()];
        for (slot, field) in Field::ALL.into_iter().enumerate() {
            let at = columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(field.column()))
                .ok_or_else(|| Error::SchemaViolation {
                    column: field.column().to_string(),
                })?;
            positions[slot] = at;
        }
        Ok(Self { positions })
    }

    fn cell<'a>(&self, cells: &[&'a str], field: Field) -> &'a str {
        let slot = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
        cells[self.positions[slot]]
    }

    fn parse_row(&self, line: &str, line_num: usize, expected: usize) -> Result<Resource> {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() != expected {
            return Err(Error::RowShape {
                line: line_num,
                expected,
                found: cells.len(),
            });
        }

        let resource_id = normalize(self.cell(&cells, Field::ResourceId))
            .ok_or(Error::MissingResourceId { line: line_num })?;

        let cost_cell = self.cell(&cells, Field::MonthlyCostUsd);
        // A missing cost is treated as zero; malformed or negative
        // values are rejected.
        let monthly_cost_usd = match normalize(cost_cell) {
            None => 0.0,
            Some(raw) => {
                let parsed: f64 = raw.parse().map_err(|_| Error::InvalidCost {
                    line: line_num,
                    value: raw.clone(),
                })?;
                if !parsed.is_finite() || parsed < 0.0 {
                    return Err(Error::InvalidCost {
                        line: line_num,
                        value: raw,
                    });
                }
                parsed
            }
        };

        let tag_cell = self.cell(&cells, Field::Tagged);
        let tagged = TagStatus::from_value(tag_cell).ok_or_else(|| Error::InvalidTagFlag {
            line: line_num,
            value: tag_cell.to_string(),
        })?;

        Ok(Resource {
            resource_id,
            account_id: normalize(self.cell(&cells, Field::AccountId)),
            service: normalize(self.cell(&cells, Field::Service)),
            region: normalize(self.cell(&cells, Field::Region)),
            department: normalize(self.cell(&cells, Field::Department)),
            project: normalize(self.cell(&cells, Field::Project)),
            environment: normalize(self.cell(&cells, Field::Environment)),
            owner: normalize(self.cell(&cells, Field::Owner)),
            cost_center: normalize(self.cell(&cells, Field::CostCenter)),
            created_by: normalize(self.cell(&cells, Field::CreatedBy)),
            monthly_cost_usd,
            tagged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "ResourceID,AccountID,Service,Region,Department,Project,Environment,Owner,CostCenter,CreatedBy,MonthlyCostUSD,Tagged";

    fn quoted(lines: &[&str]) -> String {
        lines
            .iter()
            .map(|l| format!("\"{l}\""))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parse_quoted_lines() {
        let content = quoted(&[
            HEADER,
            "r-001,111,EC2,us-east-1,Finance,Atlas,Prod,alice,CC-100,terraform,142.50,Yes",
            "r-002,111,S3,us-east-1,,,,,,console,10.00,No",
        ]);
        let inventory = parse_string(&content).unwrap();
        assert_eq!(inventory.len(), 2);

        let first = inventory.get("r-001").unwrap();
        assert_eq!(first.service.as_deref(), Some("EC2"));
        assert_eq!(first.monthly_cost_usd, 142.50);
        assert_eq!(first.tagged, TagStatus::Yes);

        let second = inventory.get("r-002").unwrap();
        assert_eq!(second.department, None);
        assert_eq!(second.tagged, TagStatus::No);
    }

    #[test]
    fn test_parse_unquoted_lines_also_accepted() {
        let content = format!("{HEADER}\nr-001,111,EC2,us-east-1,,,,,,iac,5.00,No");
        let inventory = parse_string(&content).unwrap();
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_empty_string_cells_normalize_to_missing() {
        let content = quoted(&[
            HEADER,
            "r-001,111,EC2,us-east-1,  ,Atlas,Prod,alice,CC-100,terraform,1.00,Yes",
        ]);
        let inventory = parse_string(&content).unwrap();
        let resource = inventory.get("r-001").unwrap();
        assert_eq!(resource.department, None);
        assert_eq!(resource.project.as_deref(), Some("Atlas"));
    }

    #[test]
    fn test_missing_column_is_schema_violation() {
        let content = quoted(&[
            "ResourceID,AccountID,Service,Region,Department,Project,Environment,Owner,CostCenter,CreatedBy,MonthlyCostUSD",
            "r-001,111,EC2,us-east-1,,,,,,iac,5.00",
        ]);
        let err = parse_string(&content).unwrap_err();
        assert!(matches!(err, Error::SchemaViolation { column } if column == "Tagged"));
    }

    #[test]
    fn test_column_order_is_not_fixed() {
        let content = quoted(&[
            "Tagged,ResourceID,AccountID,Service,Region,Department,Project,Environment,Owner,CostCenter,CreatedBy,MonthlyCostUSD",
            "Yes,r-001,111,EC2,us-east-1,Finance,Atlas,Prod,alice,CC-100,iac,9.99",
        ]);
        let inventory = parse_string(&content).unwrap();
        let resource = inventory.get("r-001").unwrap();
        assert_eq!(resource.tagged, TagStatus::Yes);
        assert_eq!(resource.monthly_cost_usd, 9.99);
    }

    #[test]
    fn test_missing_cost_is_zero() {
        let content = quoted(&[
            HEADER,
            "r-001,111,EC2,us-east-1,,,,,,iac,,No",
        ]);
        let inventory = parse_string(&content).unwrap();
        assert_eq!(inventory.get("r-001").unwrap().monthly_cost_usd, 0.0);
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let content = quoted(&[HEADER, "r-001,111,EC2,us-east-1,,,,,,iac,lots,No"]);
        let err = parse_string(&content).unwrap_err();
        assert!(matches!(err, Error::InvalidCost { line: 2, .. }));

        let content = quoted(&[HEADER, "r-001,111,EC2,us-east-1,,,,,,iac,-4.00,No"]);
        let err = parse_string(&content).unwrap_err();
        assert!(matches!(err, Error::InvalidCost { line: 2, .. }));
    }

    #[test]
    fn test_invalid_tag_flag_rejected() {
        let content = quoted(&[HEADER, "r-001,111,EC2,us-east-1,,,,,,iac,1.00,maybe"]);
        let err = parse_string(&content).unwrap_err();
        assert!(matches!(err, Error::InvalidTagFlag { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let content = quoted(&[
            HEADER,
            "r-001,111,EC2,us-east-1,,,,,,iac,1.00,No",
            "r-001,111,S3,us-east-1,,,,,,iac,2.00,No",
        ]);
        let err = parse_string(&content).unwrap_err();
        assert!(matches!(err, Error::DuplicateResource { id } if id == "r-001"));
    }

    #[test]
    fn test_row_shape_mismatch_rejected() {
        let content = quoted(&[HEADER, "r-001,111,EC2"]);
        let err = parse_string(&content).unwrap_err();
        assert!(matches!(
            err,
            Error::RowShape {
                line: 2,
                expected: 12,
                found: 3
            }
        ));
    }

    #[test]
    fn test_empty_source_is_empty_snapshot() {
        let inventory = parse_string("").unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_parse_file_missing_is_source_unavailable() {
        let err = parse_file(Path::new("/nonexistent/inventory.csv")).unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }
}
