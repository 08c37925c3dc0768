// ============================================================
// HEADER MAPPER
// ============================================================
// Map arbitrary export headers onto canonical enrollment fields

use crate::domain::enrollment::CanonicalField;
use crate::infrastructure::aliases::{contains_either, header_words, normalize_header, HeaderAliasTable};
use serde::Serialize;
use tracing::debug;

/// How a header was matched. Ordered strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Substring,
    Fragment,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeaderMatch {
    /// Column position in the file (0-based)
    pub column: usize,
    pub header: String,
    pub field: CanonicalField,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderMapping {
    pub matches: Vec<HeaderMatch>,
    pub unmapped: Vec<String>,
}

impl HeaderMapping {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Canonical field a raw header resolved to
    pub fn field_for(&self, header: &str) -> Option<CanonicalField> {
        self.matches
            .iter()
            .find(|m| m.header == header)
            .map(|m| m.field)
    }

    /// Matched fields, de-duplicated, in column order
    pub fn fields(&self) -> Vec<CanonicalField> {
        let mut fields = Vec::new();
        for m in &self.matches {
            if !fields.contains(&m.field) {
                fields.push(m.field);
            }
        }
        fields
    }

    /// Columns feeding `field`, strongest tier first, then column order
    pub fn columns_for(&self, field: CanonicalField) -> Vec<&HeaderMatch> {
        let mut columns: Vec<&HeaderMatch> =
            self.matches.iter().filter(|m| m.field == field).collect();
        columns.sort_by_key(|m| (m.tier, m.column));
        columns
    }
}

pub struct HeaderMapper<'a> {
    aliases: &'a HeaderAliasTable,
}

impl HeaderMapper<'static> {
    pub fn builtin() -> Self {
        Self::new(HeaderAliasTable::builtin())
    }
}

impl<'a> HeaderMapper<'a> {
    pub fn new(aliases: &'a HeaderAliasTable) -> Self {
        Self { aliases }
    }

    /// Resolve one header: exact, then substring, then word fragments.
    /// Within a tier the first field in table order wins.
    pub fn match_header(&self, header: &str) -> Option<(CanonicalField, MatchTier)> {
        let normalized = normalize_header(header);
        if normalized.is_empty() {
            return None;
        }

        for (field, aliases) in self.aliases.entries() {
            if aliases.iter().any(|a| a.normalized == normalized) {
                return Some((field, MatchTier::Exact));
            }
        }

        for (field, aliases) in self.aliases.entries() {
            if aliases
                .iter()
                .any(|a| contains_either(&normalized, &a.normalized))
            {
                return Some((field, MatchTier::Substring));
            }
        }

        let words = header_words(header);
        if words.is_empty() {
            return None;
        }
        for (field, aliases) in self.aliases.entries() {
            if aliases
                .iter()
                .any(|a| a.words.iter().any(|w| words.contains(w)))
            {
                return Some((field, MatchTier::Fragment));
            }
        }

        None
    }

    pub fn map_headers<S: AsRef<str>>(&self, headers: &[S]) -> HeaderMapping {
        let mut mapping = HeaderMapping::default();

        for (column, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            match self.match_header(header) {
                Some((field, tier)) => {
                    debug!(header, field = %field, ?tier, "mapped header");
                    mapping.matches.push(HeaderMatch {
                        column,
                        header: header.to_string(),
                        field,
                        tier,
                    });
                }
                None => {
                    debug!(header, "unmapped header");
                    mapping.unmapped.push(header.to_string());
                }
            }
        }

        mapping
    }
}
