// ============================================================
// ROW TYPES
// ============================================================
// Rows after header mapping, and the records accepted for persistence

use super::CanonicalField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single mapped cell: what the file said, and what we turned it into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub raw: String,
    pub normalized: String,
}

/// A data row after header mapping and value normalization, before validation
#[derive(Debug, Clone)]
pub struct MappedRow {
    /// Row position among data rows (0-based)
    pub index: usize,

    /// Non-empty mapped cells keyed by canonical field
    pub fields: BTreeMap<CanonicalField, FieldValue>,
}

impl MappedRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: BTreeMap::new(),
        }
    }

    /// Row number as shown to users (1-indexed)
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn get(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn normalized(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(|v| v.normalized.as_str())
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.normalized(field).is_some_and(|v| !v.trim().is_empty())
    }

    /// Drop raw values, keeping only the normalized record
    pub fn into_record(self) -> NormalizedRecord {
        NormalizedRecord(
            self.fields
                .into_iter()
                .map(|(field, value)| (field, value.normalized))
                .collect(),
        )
    }
}

/// Canonical field → normalized value. Absent fields were not in the source row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedRecord(BTreeMap<CanonicalField, String>);

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: CanonicalField, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

impl FromIterator<(CanonicalField, String)> for NormalizedRecord {
    fn from_iter<T: IntoIterator<Item = (CanonicalField, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
