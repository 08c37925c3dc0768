use super::NormalizedRecord;

/// Validation result for one data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Accepted; warnings are annotations only
    Valid {
        record: NormalizedRecord,
        warnings: Vec<String>,
    },

    /// Rejected as a whole
    Invalid {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

impl RowOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, RowOutcome::Valid { .. })
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            RowOutcome::Valid { warnings, .. } | RowOutcome::Invalid { warnings, .. } => warnings,
        }
    }
}

/// `Row {n}: {msg}; {msg}`
pub fn format_row_messages(position: usize, messages: &[String]) -> String {
    format!("Row {}: {}", position, messages.join("; "))
}
