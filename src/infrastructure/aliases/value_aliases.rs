use crate::domain::enrollment::CanonicalField;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static BUILTIN: Lazy<ValueAliasTable> = Lazy::new(ValueAliasTable::builtin_table);

const PROGRAM_KEYWORDS: &[(&[&str], &str)] = &[
    (&["engineering", "civil"], "BS Civil Engineering"),
    (&["engineering", "electrical"], "BS Electrical Engineering"),
    (&["engineering", "mechanical"], "BS Mechanical Engineering"),
    (&["engineering", "computer"], "BS Computer Engineering"),
    (&["science", "computer"], "BS Computer Science"),
    (&["technology", "information"], "BS Information Technology"),
    (&["education", "secondary"], "Bachelor of Secondary Education"),
    (&["education", "elementary"], "Bachelor of Elementary Education"),
    (&["administration", "business"], "BS Business Administration"),
    (&["nurs"], "BS Nursing"),
    (&["account"], "BS Accountancy"),
];

/// Lowercase input variant → canonical display value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueAlias {
    pub variant: String,
    pub canonical: String,
}

/// All keywords must appear in the value for the rule to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub canonical: String,
}

impl KeywordRule {
    pub fn matches(&self, lower_value: &str) -> bool {
        self.keywords.iter().all(|k| lower_value.contains(k.as_str()))
    }
}

/// Per-field value lookup data. Entry order is match precedence.
#[derive(Debug, Clone, Default)]
pub struct ValueAliasTable {
    aliases: BTreeMap<CanonicalField, Vec<ValueAlias>>,
    program_keywords: Vec<KeywordRule>,
    true_tokens: Vec<String>,
    false_tokens: Vec<String>,
    negation_words: Vec<String>,
}

impl ValueAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared built-in table
    pub fn builtin() -> &'static ValueAliasTable {
        &BUILTIN
    }

    pub fn with_aliases(mut self, field: CanonicalField, pairs: &[(&str, &str)]) -> Self {
        self.aliases.entry(field).or_default().extend(pairs.iter().map(
            |(variant, canonical)| ValueAlias {
                variant: variant.to_lowercase(),
                canonical: canonical.to_string(),
            },
        ));
        self
    }

    pub fn with_program_keywords(mut self, rules: &[(&[&str], &str)]) -> Self {
        self.program_keywords
            .extend(rules.iter().map(|(keywords, canonical)| KeywordRule {
                keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
                canonical: canonical.to_string(),
            }));
        self
    }

    pub fn with_boolean_tokens(mut self, truthy: &[&str], falsy: &[&str]) -> Self {
        self.true_tokens.extend(truthy.iter().map(|t| t.to_string()));
        self.false_tokens.extend(falsy.iter().map(|t| t.to_string()));
        self
    }

    pub fn with_negation_words(mut self, words: &[&str]) -> Self {
        self.negation_words.extend(words.iter().map(|w| w.to_lowercase()));
        self
    }

    pub fn aliases_for(&self, field: CanonicalField) -> &[ValueAlias] {
        self.aliases
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn program_keywords(&self) -> &[KeywordRule] {
        &self.program_keywords
    }

    /// `Some(true)` / `Some(false)` for a compacted boolean-like token
    pub fn boolean_token(&self, compact: &str) -> Option<bool> {
        if self.false_tokens.iter().any(|t| t == compact) {
            Some(false)
        } else if self.true_tokens.iter().any(|t| t == compact) {
            Some(true)
        } else {
            None
        }
    }

    /// Any whole word of `value` is a negation ("Not yet enrolled", "no longer active")
    pub fn is_negated(&self, value: &str) -> bool {
        value
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| self.negation_words.iter().any(|n| n == word))
    }

    fn builtin_table() -> Self {
        Self::new()
            .with_aliases(
                CanonicalField::EnrollmentTerm,
                &[
                    ("1st semester", "1st Semester"),
                    ("first semester", "1st Semester"),
                    ("1st sem", "1st Semester"),
                    ("first sem", "1st Semester"),
                    ("semester 1", "1st Semester"),
                    ("sem 1", "1st Semester"),
                    ("1st term", "1st Semester"),
                    ("first term", "1st Semester"),
                    ("1st", "1st Semester"),
                    ("first", "1st Semester"),
                    ("1", "1st Semester"),
                    ("2nd semester", "2nd Semester"),
                    ("second semester", "2nd Semester"),
                    ("2nd sem", "2nd Semester"),
                    ("second sem", "2nd Semester"),
                    ("semester 2", "2nd Semester"),
                    ("sem 2", "2nd Semester"),
                    ("2nd term", "2nd Semester"),
                    ("second term", "2nd Semester"),
                    ("2nd", "2nd Semester"),
                    ("second", "2nd Semester"),
                    ("2", "2nd Semester"),
                    ("summer", "Summer"),
                    ("summer term", "Summer"),
                    ("summer class", "Summer"),
                    ("summer semester", "Summer"),
                    ("midyear", "Midyear"),
                    ("mid-year", "Midyear"),
                    ("mid year", "Midyear"),
                    ("midyear term", "Midyear"),
                ],
            )
            // Negative spellings come first: "unenrolled" contains "enrolled"
            .with_aliases(
                CanonicalField::IsCurrentlyEnrolled,
                &[
                    ("not enrolled", "false"),
                    ("not currently enrolled", "false"),
                    ("no longer enrolled", "false"),
                    ("unenrolled", "false"),
                    ("inactive", "false"),
                    ("dropped", "false"),
                    ("withdrawn", "false"),
                    ("transferred", "false"),
                    ("graduated", "false"),
                    ("no", "false"),
                    ("n", "false"),
                    ("false", "false"),
                    ("0", "false"),
                    ("currently enrolled", "true"),
                    ("enrolled", "true"),
                    ("active", "true"),
                    ("yes", "true"),
                    ("y", "true"),
                    ("true", "true"),
                    ("1", "true"),
                ],
            )
            .with_aliases(
                CanonicalField::YearLevel,
                &[
                    ("kindergarten", "Kindergarten"),
                    ("kinder", "Kindergarten"),
                    ("1st year", "1st Year"),
                    ("first year", "1st Year"),
                    ("freshman", "1st Year"),
                    ("2nd year", "2nd Year"),
                    ("second year", "2nd Year"),
                    ("sophomore", "2nd Year"),
                    ("3rd year", "3rd Year"),
                    ("third year", "3rd Year"),
                    ("4th year", "4th Year"),
                    ("fourth year", "4th Year"),
                    ("5th year", "5th Year"),
                    ("fifth year", "5th Year"),
                ],
            )
            // Full titles before acronyms
            .with_aliases(
                CanonicalField::Program,
                &[
                    ("bs information technology", "BS Information Technology"),
                    ("information technology", "BS Information Technology"),
                    ("bsit", "BS Information Technology"),
                    ("bs it", "BS Information Technology"),
                    ("bs information systems", "BS Information Systems"),
                    ("information systems", "BS Information Systems"),
                    ("bsis", "BS Information Systems"),
                    ("bs computer science", "BS Computer Science"),
                    ("computer science", "BS Computer Science"),
                    ("bscs", "BS Computer Science"),
                    ("bs computer engineering", "BS Computer Engineering"),
                    ("computer engineering", "BS Computer Engineering"),
                    ("bscpe", "BS Computer Engineering"),
                    ("bs civil engineering", "BS Civil Engineering"),
                    ("civil engineering", "BS Civil Engineering"),
                    ("bsce", "BS Civil Engineering"),
                    ("bs electrical engineering", "BS Electrical Engineering"),
                    ("electrical engineering", "BS Electrical Engineering"),
                    ("bsee", "BS Electrical Engineering"),
                    ("bs mechanical engineering", "BS Mechanical Engineering"),
                    ("mechanical engineering", "BS Mechanical Engineering"),
                    ("bsme", "BS Mechanical Engineering"),
                    ("bs nursing", "BS Nursing"),
                    ("nursing", "BS Nursing"),
                    ("bsn", "BS Nursing"),
                    ("bs accountancy", "BS Accountancy"),
                    ("accountancy", "BS Accountancy"),
                    ("bsa", "BS Accountancy"),
                    ("bs business administration", "BS Business Administration"),
                    ("business administration", "BS Business Administration"),
                    ("bsba", "BS Business Administration"),
                    ("bachelor of secondary education", "Bachelor of Secondary Education"),
                    ("secondary education", "Bachelor of Secondary Education"),
                    ("bsed", "Bachelor of Secondary Education"),
                    ("bachelor of elementary education", "Bachelor of Elementary Education"),
                    ("elementary education", "Bachelor of Elementary Education"),
                    ("beed", "Bachelor of Elementary Education"),
                    ("bs criminology", "BS Criminology"),
                    ("criminology", "BS Criminology"),
                    ("humss", "HUMSS"),
                    ("stem", "STEM"),
                    ("abm", "ABM"),
                    ("gas", "GAS"),
                    ("tvl", "TVL"),
                ],
            )
            .with_program_keywords(PROGRAM_KEYWORDS)
            .with_boolean_tokens(
                &["yes", "y", "true", "t", "1", "active", "enrolled", "current", "ongoing", "regular"],
                &[
                    "no", "n", "false", "f", "0", "inactive", "dropped", "withdrawn",
                    "transferred", "graduated", "alumni", "alumnus", "completed", "finished",
                ],
            )
            .with_negation_words(&["not", "no", "never", "non"])
    }
}
