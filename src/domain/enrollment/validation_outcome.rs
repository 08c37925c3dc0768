// ============================================================
// VALIDATION OUTCOME
// ============================================================
// Aggregate result of one import attempt, as handed to the upload UI

use super::{format_row_messages, CanonicalField, NormalizedRecord, RowOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Identifies this attempt in logs and in the persistence request
    pub import_id: Uuid,

    pub total_records: usize,
    pub valid_records: usize,
    pub error_records: usize,

    /// Valid rows carrying at least one warning
    pub warning_records: usize,

    /// Distinct student IDs among valid rows
    pub new_records: usize,

    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub valid_data: Vec<NormalizedRecord>,

    /// Canonical fields found in the header row, in column order
    #[serde(default)]
    pub mapped_fields: Vec<CanonicalField>,

    /// Headers that matched no canonical field
    #[serde(default)]
    pub unmapped_headers: Vec<String>,
}

impl ValidationOutcome {
    pub fn new(import_id: Uuid) -> Self {
        Self {
            import_id,
            total_records: 0,
            valid_records: 0,
            error_records: 0,
            warning_records: 0,
            new_records: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            valid_data: Vec::new(),
            mapped_fields: Vec::new(),
            unmapped_headers: Vec::new(),
        }
    }

    /// Fold row outcomes, in file order, into the aggregate
    pub fn from_rows(import_id: Uuid, rows: impl IntoIterator<Item = RowOutcome>) -> Self {
        let mut outcome = Self::new(import_id);
        let mut seen_ids = HashSet::new();

        for (index, row) in rows.into_iter().enumerate() {
            let position = index + 1;
            outcome.total_records += 1;

            match row {
                RowOutcome::Valid { record, warnings } => {
                    outcome.valid_records += 1;
                    if !warnings.is_empty() {
                        outcome.warning_records += 1;
                        outcome.warnings.push(format_row_messages(position, &warnings));
                    }
                    if let Some(id) = record.get(CanonicalField::StudentIdNumber) {
                        if seen_ids.insert(id.to_string()) {
                            outcome.new_records += 1;
                        }
                    }
                    outcome.valid_data.push(record);
                }
                RowOutcome::Invalid { errors, .. } => {
                    outcome.error_records += 1;
                    outcome.errors.push(format_row_messages(position, &errors));
                }
            }
        }

        outcome
    }

    pub fn has_errors(&self) -> bool {
        self.error_records > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_records > 0
    }

    /// Whether the upload UI may offer to persist this outcome
    pub fn can_upload(&self) -> bool {
        !self.has_errors() && !self.valid_data.is_empty()
    }

    /// Human readable summary for terminals and logs
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Import {}", self.import_id),
            format!(
                "Total: {}  Valid: {}  Errors: {}  Warnings: {}  New: {}",
                self.total_records,
                self.valid_records,
                self.error_records,
                self.warning_records,
                self.new_records
            ),
        ];

        if !self.unmapped_headers.is_empty() {
            lines.push(format!(
                "Unmapped columns: {}",
                self.unmapped_headers.join(", ")
            ));
        }
        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            lines.extend(self.errors.iter().map(|e| format!("  {}", e)));
        }
        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            lines.extend(self.warnings.iter().map(|w| format!("  {}", w)));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> NormalizedRecord {
        let mut record = NormalizedRecord::new();
        record.insert(CanonicalField::StudentIdNumber, id);
        record
    }

    #[test]
    fn test_counts_partition_rows() {
        let rows = vec![
            RowOutcome::Valid {
                record: record("A-1"),
                warnings: vec![],
            },
            RowOutcome::Invalid {
                errors: vec!["Missing required field 'first_name'".to_string()],
                warnings: vec!["ignored".to_string()],
            },
            RowOutcome::Valid {
                record: record("A-2"),
                warnings: vec!["Student is marked as 'graduated' - treated as not currently enrolled".to_string()],
            },
            RowOutcome::Valid {
                record: record("A-1"),
                warnings: vec![],
            },
        ];

        let outcome = ValidationOutcome::from_rows(Uuid::new_v4(), rows);

        assert_eq!(outcome.total_records, 4);
        assert_eq!(outcome.valid_records, 3);
        assert_eq!(outcome.error_records, 1);
        assert_eq!(outcome.valid_records + outcome.error_records, outcome.total_records);
        assert_eq!(outcome.warning_records, 1);
        assert_eq!(outcome.new_records, 2);
        assert_eq!(outcome.errors, vec!["Row 2: Missing required field 'first_name'"]);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("Row 3: "));
        assert!(!outcome.can_upload());
    }

    #[test]
    fn test_serializes_camel_case() {
        let outcome = ValidationOutcome::from_rows(
            Uuid::new_v4(),
            vec![RowOutcome::Valid {
                record: record("A-1"),
                warnings: vec![],
            }],
        );
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["totalRecords"], 1);
        assert_eq!(json["validRecords"], 1);
        assert_eq!(json["errorRecords"], 0);
        assert_eq!(json["validData"][0]["student_id_number"], "A-1");
        assert!(json.get("importId").is_some());
        assert!(outcome.can_upload());
    }
}
