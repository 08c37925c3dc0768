// ============================================================
// ENROLLMENT IMPORT DOMAIN LAYER
// ============================================================
// Core types for partner-school enrollment imports
// No I/O, no async

mod canonical_field;
mod normalized_record;
mod row_outcome;
mod update_mode;
mod validation_outcome;

pub use canonical_field::CanonicalField;
pub use normalized_record::{FieldValue, MappedRow, NormalizedRecord};
pub use row_outcome::{format_row_messages, RowOutcome};
pub use update_mode::UpdateMode;
pub use validation_outcome::ValidationOutcome;

/// Accepted `enrollment_term` values
pub const ENROLLMENT_TERMS: [&str; 4] = ["1st Semester", "2nd Semester", "Summer", "Midyear"];
