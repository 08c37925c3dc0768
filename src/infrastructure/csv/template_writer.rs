// ============================================================
// TEMPLATE WRITER
// ============================================================
// Example CSV showing accepted header names and value formats

use crate::domain::enrollment::CanonicalField;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::aliases::HeaderAliasTable;
use csv::Writer;

/// Example rows, one cell per field in `CanonicalField::ALL` order
const EXAMPLE_ROWS: [[&str; 9]; 3] = [
    [
        "2024-001",
        "Juan",
        "Dela Cruz",
        "2024-2025",
        "1st Semester",
        "Yes",
        "08/20/2024",
        "BS Information Technology",
        "1st Year",
    ],
    [
        "2024-002",
        "Maria",
        "Santos",
        "2024",
        "2nd sem",
        "no",
        "2025-01-13",
        "BSED",
        "2nd Year",
    ],
    [
        "2023-118",
        "Jose",
        "Reyes",
        "",
        "Summer",
        "graduated",
        "05 30 2024",
        "Civil Engineering",
        "Grade 12",
    ],
];

pub struct TemplateWriter<'a> {
    aliases: &'a HeaderAliasTable,
}

impl<'a> TemplateWriter<'a> {
    pub fn new(aliases: &'a HeaderAliasTable) -> Self {
        Self { aliases }
    }

    pub fn headers(&self) -> Vec<&str> {
        CanonicalField::ALL
            .iter()
            .map(|f| self.aliases.display_name(*f))
            .collect()
    }

    /// Render the template as CSV text
    pub fn render(&self) -> Result<String> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(self.headers())?;
        for row in EXAMPLE_ROWS.iter() {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush template: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("Template is not valid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_layout() {
        let template = TemplateWriter::new(HeaderAliasTable::builtin())
            .render()
            .unwrap();
        let lines: Vec<&str> = template.lines().collect();

        assert_eq!(
            lines[0],
            "Student ID,First Name,Last Name,Academic Year,Semester,Currently Enrolled,Enrollment Date,Program,Year Level"
        );
        assert_eq!(lines.len(), 1 + EXAMPLE_ROWS.len());
        assert!(lines[1].starts_with("2024-001,Juan,Dela Cruz"));
    }
}
