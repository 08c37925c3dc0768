use crate::domain::enrollment::CanonicalField;
use once_cell::sync::Lazy;

static BUILTIN: Lazy<HeaderAliasTable> = Lazy::new(HeaderAliasTable::builtin_table);

/// A known spelling of a column header, pre-normalized for matching
#[derive(Debug, Clone)]
pub struct HeaderAlias {
    /// As written in the table (also used for template headers)
    pub text: String,

    /// Lowercase alphanumerics only
    pub normalized: String,

    /// Alphabetic runs longer than two characters
    pub words: Vec<String>,
}

impl HeaderAlias {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            normalized: normalize_header(&text),
            words: header_words(&text),
            text,
        }
    }
}

/// Canonical field → known header spellings, in declaration order.
///
/// Declaration order is match precedence: the first field whose alias matches
/// a header wins.
#[derive(Debug, Clone)]
pub struct HeaderAliasTable {
    entries: Vec<(CanonicalField, Vec<HeaderAlias>)>,
}

impl HeaderAliasTable {
    pub fn new<S: Into<String>>(entries: Vec<(CanonicalField, Vec<S>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(field, aliases)| {
                    (field, aliases.into_iter().map(HeaderAlias::new).collect())
                })
                .collect(),
        }
    }

    /// Shared built-in table
    pub fn builtin() -> &'static HeaderAliasTable {
        &BUILTIN
    }

    pub fn entries(&self) -> impl Iterator<Item = (CanonicalField, &[HeaderAlias])> {
        self.entries
            .iter()
            .map(|(field, aliases)| (*field, aliases.as_slice()))
    }

    pub fn aliases_for(&self, field: CanonicalField) -> &[HeaderAlias] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or(&[])
    }

    /// Preferred header spelling for a field (its first alias)
    pub fn display_name(&self, field: CanonicalField) -> &str {
        self.aliases_for(field)
            .first()
            .map(|a| a.text.as_str())
            .unwrap_or_else(|| field.as_str())
    }

    fn builtin_table() -> Self {
        Self::new(vec![
            (
                CanonicalField::StudentIdNumber,
                vec![
                    "Student ID",
                    "Student ID Number",
                    "Student Number",
                    "Student No",
                    "Stud No",
                    "ID Number",
                    "ID No",
                    "ID",
                    "Student Code",
                    "School ID",
                    "LRN",
                    "Learner Reference Number",
                ],
            ),
            (
                CanonicalField::FirstName,
                vec!["First Name", "Given Name", "Given Names", "FName", "Forename"],
            ),
            (
                CanonicalField::LastName,
                vec!["Last Name", "Surname", "Family Name", "LName"],
            ),
            (
                CanonicalField::EnrollmentYear,
                vec![
                    "Academic Year",
                    "School Year",
                    "Enrollment Year",
                    "Acad Year",
                    "Year Enrolled",
                    "AY",
                    "SY",
                ],
            ),
            (
                CanonicalField::EnrollmentTerm,
                vec!["Semester", "Term", "Enrollment Term", "Academic Term", "Sem", "Period"],
            ),
            (
                CanonicalField::IsCurrentlyEnrolled,
                vec![
                    "Currently Enrolled",
                    "Is Currently Enrolled",
                    "Is Enrolled",
                    "Enrolled",
                    "Enrollment Status",
                    "Status",
                    "Active",
                ],
            ),
            (
                CanonicalField::EnrollmentDate,
                vec![
                    "Enrollment Date",
                    "Date Enrolled",
                    "Date of Enrollment",
                    "Enrolled On",
                    "Registration Date",
                ],
            ),
            (
                CanonicalField::Program,
                vec![
                    "Program",
                    "Program Name",
                    "Course",
                    "Course Name",
                    "Degree Program",
                    "Degree",
                    "Strand",
                    "Track",
                    "Major",
                ],
            ),
            (
                CanonicalField::YearLevel,
                vec!["Year Level", "Grade Level", "Yr Level", "Class Year", "Year", "Grade", "Level"],
            ),
        ])
    }
}

/// Strip quotes and whitespace, lowercase, drop every non-alphanumeric character
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercase alphabetic runs longer than two characters
pub fn header_words(header: &str) -> Vec<String> {
    header
        .to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  \"Student ID\" "), "studentid");
        assert_eq!(normalize_header("id_no"), "idno");
        assert_eq!(normalize_header("ID No."), "idno");
        assert_eq!(normalize_header("***"), "");
    }

    #[test]
    fn test_header_words() {
        assert_eq!(header_words("Student's Given-Name (2024)"), vec!["student", "given", "name"]);
        assert!(header_words("ID No").is_empty());
    }

    #[test]
    fn test_every_field_has_aliases() {
        let table = HeaderAliasTable::builtin();
        for field in CanonicalField::ALL {
            assert!(!table.aliases_for(field).is_empty(), "{} has no aliases", field);
        }
        assert_eq!(table.display_name(CanonicalField::EnrollmentYear), "Academic Year");
    }

    #[test]
    fn test_declaration_order_follows_field_order() {
        let fields: Vec<CanonicalField> =
            HeaderAliasTable::builtin().entries().map(|(f, _)| f).collect();
        assert_eq!(fields, CanonicalField::ALL.to_vec());
    }
}
