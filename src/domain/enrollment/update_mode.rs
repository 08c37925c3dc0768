use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the persistence API applies an upload to existing enrollment data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// Add new students and update existing ones
    #[default]
    Merge,

    /// Delete the school's existing records, then insert
    Replace,
}

impl UpdateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Merge => "merge",
            UpdateMode::Replace => "replace",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(UpdateMode::Merge),
            "replace" => Ok(UpdateMode::Replace),
            other => Err(format!(
                "Unknown update mode '{}', expected 'merge' or 'replace'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_default() {
        assert_eq!(UpdateMode::default(), UpdateMode::Merge);
        assert_eq!("Replace".parse::<UpdateMode>(), Ok(UpdateMode::Replace));
        assert!("upsert".parse::<UpdateMode>().is_err());
        assert_eq!(serde_json::to_string(&UpdateMode::Merge).unwrap(), "\"merge\"");
    }
}
