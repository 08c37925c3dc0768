// ============================================================
// VALUE NORMALIZER
// ============================================================
// Turn raw cell text into the canonical display value for its field

use crate::domain::enrollment::CanonicalField;
use crate::infrastructure::aliases::{contains_alias, ValueAliasTable};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static YEAR_RANGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\D)(\d{4})(?:\s*[-/]\s*(\d{4}))?(?:\D|$)").unwrap());

static DATE_MDY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})(?:[ T]\d{1,2}:\d{2}(?::\d{2})?)?$").unwrap()
});
static DATE_YMD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})(?:[ T]\d{1,2}:\d{2}(?::\d{2})?)?$").unwrap()
});
static DATE_MDY_SPACED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\s+(\d{1,2})\s+(\d{4})$").unwrap());

static SEMESTER_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([12])(?:st|nd)?[\s_-]*(?:sem|semester|term)\b|\b(?:sem|semester|term)[\s._-]*([12])\b|^s([12])$")
        .unwrap()
});

static GRADE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:grade|gr|g)[\s._-]*(\d{1,2})\b").unwrap());
static YEAR_LEVEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([1-6])(?:st|nd|rd|th)?[\s_-]*(?:year|yr)\b|\b(?:year|yr)[\s._-]*([1-6])\b")
        .unwrap()
});

pub struct ValueNormalizer<'a> {
    aliases: &'a ValueAliasTable,
}

impl ValueNormalizer<'static> {
    pub fn builtin() -> Self {
        Self::new(ValueAliasTable::builtin())
    }
}

impl<'a> ValueNormalizer<'a> {
    pub fn new(aliases: &'a ValueAliasTable) -> Self {
        Self { aliases }
    }

    /// Canonical display value for `raw`; unknown input passes through unchanged
    pub fn normalize(&self, field: CanonicalField, raw: &str) -> String {
        let normalized = match field {
            CanonicalField::FirstName | CanonicalField::LastName => Some(title_case(raw)),
            CanonicalField::StudentIdNumber => Some(raw.trim().to_uppercase()),
            CanonicalField::EnrollmentYear => normalize_school_year(raw),
            CanonicalField::EnrollmentDate => normalize_date(raw),
            CanonicalField::EnrollmentTerm => self
                .lookup_alias(field, raw)
                .or_else(|| semester_from_number(raw)),
            CanonicalField::IsCurrentlyEnrolled => self
                .negated_status(raw)
                .or_else(|| self.lookup_alias(field, raw))
                .or_else(|| self.boolean_from_synonym(raw)),
            CanonicalField::YearLevel => self
                .lookup_alias(field, raw)
                .or_else(|| year_level_from_pattern(raw)),
            CanonicalField::Program => self
                .lookup_alias(field, raw)
                .or_else(|| self.program_from_keywords(raw)),
        };

        match normalized {
            Some(value) => {
                if value != raw {
                    trace!(field = %field, raw, normalized = %value, "normalized value");
                }
                value
            }
            None => {
                trace!(field = %field, raw, "no normalization rule matched");
                raw.to_string()
            }
        }
    }

    /// Exact alias, then an alias inside the value, then the value inside aliases
    fn lookup_alias(&self, field: CanonicalField, raw: &str) -> Option<String> {
        let lower = raw.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }

        let aliases = self.aliases.aliases_for(field);
        if let Some(alias) = aliases
            .iter()
            .find(|a| a.variant == lower)
            .or_else(|| aliases.iter().find(|a| contains_alias(&lower, &a.variant)))
        {
            return Some(alias.canonical.clone());
        }

        // A fragment shared by aliases of different values is ambiguous
        let mut canonicals = aliases
            .iter()
            .filter(|a| contains_alias(&a.variant, &lower))
            .map(|a| a.canonical.as_str());
        let first = canonicals.next()?;
        canonicals.all(|c| c == first).then(|| first.to_string())
    }

    fn negated_status(&self, raw: &str) -> Option<String> {
        self.aliases
            .is_negated(raw)
            .then(|| "false".to_string())
    }

    fn boolean_from_synonym(&self, raw: &str) -> Option<String> {
        let compact: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        self.aliases
            .boolean_token(&compact)
            .map(|value| value.to_string())
    }

    fn program_from_keywords(&self, raw: &str) -> Option<String> {
        let lower = raw.to_lowercase();
        self.aliases
            .program_keywords()
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.canonical.clone())
    }
}

/// Capitalize the first letter of each whitespace-separated word
pub fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `2024-2025`, `2024/2025`, `SY 2024-25` → `2024-2025`
fn normalize_school_year(raw: &str) -> Option<String> {
    let captures = YEAR_RANGE_PATTERN.captures(raw)?;
    let start = captures.get(1)?.as_str();

    match captures.get(2) {
        Some(end) => Some(format!("{}-{}", start, end.as_str())),
        None => {
            let start_year: u32 = start.parse().ok()?;
            Some(format!("{}-{}", start_year, start_year + 1))
        }
    }
}

/// First matching pattern wins; impossible calendar dates are left alone
fn normalize_date(raw: &str) -> Option<String> {
    let value = raw.trim();

    let (year, month, day) = if let Some(c) = DATE_MDY_PATTERN.captures(value) {
        (c[3].parse().ok()?, c[1].parse().ok()?, c[2].parse().ok()?)
    } else if let Some(c) = DATE_YMD_PATTERN.captures(value) {
        (c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?)
    } else if let Some(c) = DATE_MDY_SPACED_PATTERN.captures(value) {
        (c[3].parse().ok()?, c[1].parse().ok()?, c[2].parse().ok()?)
    } else {
        return None;
    };

    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}

fn semester_from_number(raw: &str) -> Option<String> {
    let captures = SEMESTER_NUMBER_PATTERN.captures(raw.trim())?;
    let number = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?;

    match number.as_str() {
        "1" => Some("1st Semester".to_string()),
        "2" => Some("2nd Semester".to_string()),
        _ => None,
    }
}

fn year_level_from_pattern(raw: &str) -> Option<String> {
    if let Some(c) = GRADE_PATTERN.captures(raw) {
        let grade: u32 = c[1].parse().ok()?;
        if (1..=12).contains(&grade) {
            return Some(format!("Grade {}", grade));
        }
    }

    let captures = YEAR_LEVEL_PATTERN.captures(raw)?;
    let year: u32 = captures
        .get(1)
        .or_else(|| captures.get(2))?
        .as_str()
        .parse()
        .ok()?;
    Some(format!("{} Year", ordinal(year)))
}

fn ordinal(n: u32) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
