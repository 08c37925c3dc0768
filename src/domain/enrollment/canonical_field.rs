// ============================================================
// CANONICAL FIELD
// ============================================================
// The fixed enrollment schema every partner-school export is mapped onto

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical enrollment field.
///
/// Variant order is the declaration order of the header alias table and
/// therefore the precedence order used when a header matches several fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    StudentIdNumber,
    FirstName,
    LastName,
    EnrollmentYear,
    EnrollmentTerm,
    IsCurrentlyEnrolled,
    EnrollmentDate,
    Program,
    YearLevel,
}

impl CanonicalField {
    /// All fields in declaration order
    pub const ALL: [CanonicalField; 9] = [
        CanonicalField::StudentIdNumber,
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::EnrollmentYear,
        CanonicalField::EnrollmentTerm,
        CanonicalField::IsCurrentlyEnrolled,
        CanonicalField::EnrollmentDate,
        CanonicalField::Program,
        CanonicalField::YearLevel,
    ];

    /// Fields that must be present and non-empty on every row
    pub const REQUIRED: [CanonicalField; 4] = [
        CanonicalField::StudentIdNumber,
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::EnrollmentTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::StudentIdNumber => "student_id_number",
            CanonicalField::FirstName => "first_name",
            CanonicalField::LastName => "last_name",
            CanonicalField::EnrollmentYear => "enrollment_year",
            CanonicalField::EnrollmentTerm => "enrollment_term",
            CanonicalField::IsCurrentlyEnrolled => "is_currently_enrolled",
            CanonicalField::EnrollmentDate => "enrollment_date",
            CanonicalField::Program => "program",
            CanonicalField::YearLevel => "year_level",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_name_matches_as_str() {
        for field in CanonicalField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }
}
