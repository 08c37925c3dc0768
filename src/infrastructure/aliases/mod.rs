// ============================================================
// ALIAS TABLES
// ============================================================
// Static lookup data for header and value normalization
// Built once on first use, never mutated afterwards

mod header_aliases;
mod value_aliases;

pub use header_aliases::{header_words, normalize_header, HeaderAlias, HeaderAliasTable};
pub use value_aliases::{KeywordRule, ValueAlias, ValueAliasTable};

/// Shorter strings only ever match exactly
pub const MIN_FUZZY_MATCH_LEN: usize = 3;

/// Substring containment in either direction.
///
/// The shorter side must be at least [`MIN_FUZZY_MATCH_LEN`] characters, so a
/// stray "1" or "id" never claims half the table.
pub fn contains_either(a: &str, b: &str) -> bool {
    let shorter = a.chars().count().min(b.chars().count());
    if shorter < MIN_FUZZY_MATCH_LEN {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Aliases this short only match as a whole word of a longer value
pub const SHORT_ALIAS_LEN: usize = 4;

/// `value` contains `alias`, on word boundaries when the alias is short
pub fn contains_alias(value: &str, alias: &str) -> bool {
    let len = alias.chars().count();
    if len < MIN_FUZZY_MATCH_LEN || !value.contains(alias) {
        return false;
    }
    len > SHORT_ALIAS_LEN
        || value
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_either() {
        assert!(contains_either("studentidnumber", "studentid"));
        assert!(contains_either("sem", "1st semester"));
        assert!(!contains_either("middlename", "id"));
        assert!(!contains_either("", "firstname"));
        assert!(!contains_either("lastname", "firstname"));
    }

    #[test]
    fn test_contains_alias() {
        assert!(contains_alias("summer 2024", "summer"));
        assert!(contains_alias("senior high stem", "stem"));
        assert!(contains_alias("abm-strand", "abm"));
        assert!(!contains_alias("systems engineering", "stem"));
        assert!(!contains_alias("las vegas", "gas"));
        assert!(!contains_alias("y.", "y"));
    }
}
