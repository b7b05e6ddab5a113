// File: src/config.rs
use crate::core::rules::ConversionRuleTable;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_LANGUAGE: &str = "ja";
pub const DEFAULT_MIN_DIFFICULTY: u8 = 0;

/// Session settings. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Language code used to pick both phrases and the rule table.
    pub language: String,
    pub min_difficulty: u8,
    pub max_difficulty: Option<u8>,
    /// Fixed seed for phrase selection; random when absent.
    pub seed: Option<u64>,
    pub progress_path: Option<PathBuf>,
    /// Rule table JSON for `language`. The bundled table is used for "ja" when absent.
    pub rules_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            min_difficulty: DEFAULT_MIN_DIFFICULTY,
            max_difficulty: None,
            seed: None,
            progress_path: None,
            rules_path: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn accepts_difficulty(&self, difficulty: u8) -> bool {
        difficulty >= self.min_difficulty && self.max_difficulty.map_or(true, |max| difficulty <= max)
    }

    /// Rule tables by language code, as the phrase provider expects them.
    pub fn rule_tables(&self) -> Result<HashMap<String, Arc<ConversionRuleTable>>> {
        let mut tables = HashMap::new();
        let table = match &self.rules_path {
            Some(path) => Some(ConversionRuleTable::from_path(path)?),
            None if self.language == DEFAULT_LANGUAGE => Some(ConversionRuleTable::japanese()?),
            None => None,
        };
        if let Some(table) = table {
            tables.insert(self.language.clone(), Arc::new(table));
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = SessionConfig::from_json(r#"{ "max_difficulty": 2 }"#).unwrap();
        assert_eq!(config.language, "ja");
        assert_eq!(config.max_difficulty, Some(2));
        assert!(config.seed.is_none());
    }

    #[test]
    fn difficulty_window_is_inclusive() {
        let config = SessionConfig { min_difficulty: 1, max_difficulty: Some(3), ..Default::default() };
        assert!(!config.accepts_difficulty(0));
        assert!(config.accepts_difficulty(1));
        assert!(config.accepts_difficulty(3));
        assert!(!config.accepts_difficulty(4));
    }

    #[test]
    fn bundled_table_backs_the_default_language() {
        let tables = SessionConfig::default().rule_tables().unwrap();
        assert!(tables.contains_key("ja"));
    }

    #[test]
    fn unknown_language_without_rules_has_no_table() {
        let config = SessionConfig { language: "ko".to_string(), ..Default::default() };
        assert!(config.rule_tables().unwrap().is_empty());
    }
}
