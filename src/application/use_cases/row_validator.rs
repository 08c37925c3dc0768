// ============================================================
// ROW VALIDATOR
// ============================================================
// Classify a mapped row as valid or invalid, collecting every issue

use crate::domain::enrollment::{CanonicalField, MappedRow, RowOutcome, ENROLLMENT_TERMS};
use once_cell::sync::Lazy;
use regex::Regex;

static SCHOOL_YEAR_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{4}$").unwrap());
static DATE_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Raw enrollment status accepted with a warning instead of an error
pub const GRADUATED_STATUS: &str = "graduated";

/// Warning for a raw `graduated` status, any case
pub fn graduated_warning(raw: &str) -> Option<String> {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case(GRADUATED_STATUS).then(|| {
        format!(
            "Student is marked as '{}' - treated as not currently enrolled",
            raw
        )
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RowValidator;

impl RowValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, row: MappedRow) -> RowOutcome {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for field in CanonicalField::REQUIRED {
            if !row.has(field) {
                errors.push(format!("Missing required field '{}'", field));
            }
        }

        if !row.has(CanonicalField::EnrollmentYear) && !row.has(CanonicalField::EnrollmentDate) {
            errors.push(
                "Must provide either 'enrollment_year' or 'enrollment_date'".to_string(),
            );
        }

        if let Some(year) = present(&row, CanonicalField::EnrollmentYear) {
            if !SCHOOL_YEAR_FORMAT.is_match(year) {
                errors.push(format!(
                    "Invalid enrollment_year '{}' (expected YYYY-YYYY)",
                    year
                ));
            }
        }

        if let Some(term) = present(&row, CanonicalField::EnrollmentTerm) {
            if !ENROLLMENT_TERMS.contains(&term) {
                errors.push(format!(
                    "Invalid enrollment_term '{}' (expected one of: {})",
                    term,
                    ENROLLMENT_TERMS.join(", ")
                ));
            }
        }

        if let Some(value) = row.get(CanonicalField::IsCurrentlyEnrolled) {
            if !value.raw.trim().is_empty() {
                if let Some(warning) = graduated_warning(&value.raw) {
                    warnings.push(warning);
                } else if value.normalized != "true" && value.normalized != "false" {
                    errors.push(format!(
                        "Invalid is_currently_enrolled value '{}' (expected yes/no or true/false)",
                        value.raw
                    ));
                }
            }
        }

        if let Some(date) = present(&row, CanonicalField::EnrollmentDate) {
            if !DATE_FORMAT.is_match(date) {
                errors.push(format!(
                    "Invalid enrollment_date '{}' (expected YYYY-MM-DD)",
                    date
                ));
            }
        }

        if errors.is_empty() {
            RowOutcome::Valid {
                record: row.into_record(),
                warnings,
            }
        } else {
            RowOutcome::Invalid { errors, warnings }
        }
    }
}

fn present(row: &MappedRow, field: CanonicalField) -> Option<&str> {
    row.normalized(field).filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment::FieldValue;

    fn row(cells: &[(CanonicalField, &str, &str)]) -> MappedRow {
        let mut row = MappedRow::new(0);
        for (field, raw, normalized) in cells {
            row.fields.insert(
                *field,
                FieldValue {
                    raw: raw.to_string(),
                    normalized: normalized.to_string(),
                },
            );
        }
        row
    }

    fn complete() -> Vec<(CanonicalField, &'static str, &'static str)> {
        vec![
            (CanonicalField::StudentIdNumber, "2024-001", "2024-001"),
            (CanonicalField::FirstName, "juan", "Juan"),
            (CanonicalField::LastName, "dela cruz", "Dela Cruz"),
            (CanonicalField::EnrollmentYear, "2024-2025", "2024-2025"),
            (CanonicalField::EnrollmentTerm, "1st sem", "1st Semester"),
        ]
    }

    fn errors_of(outcome: RowOutcome) -> Vec<String> {
        match outcome {
            RowOutcome::Invalid { errors, .. } => errors,
            RowOutcome::Valid { .. } => panic!("expected invalid row"),
        }
    }

    #[test]
    fn test_complete_row_is_valid() {
        let outcome = RowValidator::new().validate(row(&complete()));
        match outcome {
            RowOutcome::Valid { record, warnings } => {
                assert!(warnings.is_empty());
                assert_eq!(record.get(CanonicalField::FirstName), Some("Juan"));
                assert_eq!(record.len(), 5);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_fields_in_order() {
        let cells: Vec<_> = complete()
            .into_iter()
            .filter(|(f, _, _)| *f != CanonicalField::FirstName && *f != CanonicalField::LastName)
            .collect();
        let errors = errors_of(RowValidator::new().validate(row(&cells)));
        assert_eq!(
            errors,
            vec![
                "Missing required field 'first_name'",
                "Missing required field 'last_name'"
            ]
        );
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut cells = complete();
        cells[0] = (CanonicalField::StudentIdNumber, "  ", "");
        let errors = errors_of(RowValidator::new().validate(row(&cells)));
        assert_eq!(errors, vec!["Missing required field 'student_id_number'"]);
    }

    #[test]
    fn test_year_or_date_required() {
        let cells: Vec<_> = complete()
            .into_iter()
            .filter(|(f, _, _)| *f != CanonicalField::EnrollmentYear)
            .collect();
        let errors = errors_of(RowValidator::new().validate(row(&cells)));
        assert_eq!(
            errors,
            vec!["Must provide either 'enrollment_year' or 'enrollment_date'"]
        );

        let mut with_date = cells.clone();
        with_date.push((CanonicalField::EnrollmentDate, "08/20/2024", "2024-08-20"));
        assert!(RowValidator::new().validate(row(&with_date)).is_valid());
    }

    #[test]
    fn test_format_errors() {
        let mut cells = complete();
        cells[3] = (CanonicalField::EnrollmentYear, "24-25", "24-25");
        cells[4] = (CanonicalField::EnrollmentTerm, "Trimester", "Trimester");
        cells.push((CanonicalField::IsCurrentlyEnrolled, "maybe", "maybe"));
        cells.push((CanonicalField::EnrollmentDate, "13/45/2024", "13/45/2024"));

        let errors = errors_of(RowValidator::new().validate(row(&cells)));
        assert_eq!(
            errors,
            vec![
                "Invalid enrollment_year '24-25' (expected YYYY-YYYY)",
                "Invalid enrollment_term 'Trimester' (expected one of: 1st Semester, 2nd Semester, Summer, Midyear)",
                "Invalid is_currently_enrolled value 'maybe' (expected yes/no or true/false)",
                "Invalid enrollment_date '13/45/2024' (expected YYYY-MM-DD)",
            ]
        );
    }

    #[test]
    fn test_graduated_is_a_warning() {
        let mut cells = complete();
        cells.push((CanonicalField::IsCurrentlyEnrolled, "GRADUATED", "false"));

        match RowValidator::new().validate(row(&cells)) {
            RowOutcome::Valid { record, warnings } => {
                assert_eq!(record.get(CanonicalField::IsCurrentlyEnrolled), Some("false"));
                assert_eq!(
                    warnings,
                    vec!["Student is marked as 'GRADUATED' - treated as not currently enrolled"]
                );
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_graduated_warning_only_for_that_value() {
        assert!(graduated_warning(" Graduated ").is_some());
        assert!(graduated_warning("alumni").is_none());
        assert!(graduated_warning("not graduated").is_none());
    }

    #[test]
    fn test_invalid_row_keeps_warnings_separate() {
        let cells = vec![
            (CanonicalField::StudentIdNumber, "2024-001", "2024-001"),
            (CanonicalField::IsCurrentlyEnrolled, "graduated", "false"),
        ];
        match RowValidator::new().validate(row(&cells)) {
            RowOutcome::Invalid { errors, warnings } => {
                assert_eq!(errors.len(), 4);
                assert_eq!(warnings.len(), 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
