// File: src/core/rules.rs
use crate::error::{Result, TypingError};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const BUNDLED_JAPANESE: &str = include_str!("../../data/japanese.json");

/// Longest phonetic unit the tokenizer will look up, in characters.
pub const MAX_UNIT_CHARS: usize = 2;

// --- On-disk layout, validated into ConversionRuleTable on load ---

#[derive(Deserialize)]
struct RawTable {
    definitions: HashMap<String, Vec<String>>,
    rules: RawRules,
}

#[derive(Deserialize)]
struct RawRules {
    sokuon: RawSokuon,
    hatsuon: RawHatsuon,
}

#[derive(Deserialize)]
struct RawSokuon {
    #[serde(rename = "char")]
    marker: String,
    default: String,
    consonants: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawHatsuon {
    #[serde(rename = "char")]
    marker: String,
    default: String,
    #[serde(default)]
    double_n_if_next_is: Vec<String>,
    #[serde(default)]
    double_n_exceptions: Vec<String>,
}

/// Sokuon: doubles the first consonant of the following unit.
#[derive(Debug, Clone)]
pub struct GeminationRule {
    pub marker: char,
    pub default_sequence: String,
    /// First keystroke of the following unit -> prefix typed in front of it.
    pub doubling: HashMap<char, String>,
}

/// Hatsuon: "n" or "nn" depending on what follows.
#[derive(Debug, Clone)]
pub struct NasalRule {
    pub marker: char,
    pub default_sequence: String,
    /// Units after which only the doubled "nn" form (or the default) is accepted.
    pub forces_double: HashSet<String>,
}

impl NasalRule {
    pub fn forces_double_before(&self, unit: &str) -> bool {
        self.forces_double.contains(unit)
    }
}

/// Language-specific mapping from phonetic units to accepted keystroke sequences.
/// Immutable once loaded; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ConversionRuleTable {
    definitions: HashMap<String, Vec<String>>,
    gemination: GeminationRule,
    nasal: NasalRule,
}

impl ConversionRuleTable {
    /// Builds a table from already-parsed parts, applying the same checks as the JSON loader.
    pub fn new(
        definitions: HashMap<String, Vec<String>>,
        gemination: GeminationRule,
        nasal: NasalRule,
    ) -> Result<Self> {
        let table = Self { definitions, gemination, nasal };
        table.validate()?;
        Ok(table)
    }

    /// The hiragana table shipped with the crate.
    pub fn japanese() -> Result<Self> {
        Self::from_json(BUNDLED_JAPANESE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawTable = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: RawTable = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded rule table from {} ({} units)",
            path.display(),
            table.definitions.len()
        );
        Ok(table)
    }

    fn from_raw(raw: RawTable) -> Result<Self> {
        let mut doubling = HashMap::with_capacity(raw.rules.sokuon.consonants.len());
        for (consonant, prefix) in raw.rules.sokuon.consonants {
            doubling.insert(single_char(&consonant, "sokuon consonant")?, prefix);
        }
        let gemination = GeminationRule {
            marker: single_char(&raw.rules.sokuon.marker, "sokuon char")?,
            default_sequence: raw.rules.sokuon.default,
            doubling,
        };

        let exceptions: HashSet<String> = raw.rules.hatsuon.double_n_exceptions.into_iter().collect();
        let forces_double = raw
            .rules
            .hatsuon
            .double_n_if_next_is
            .into_iter()
            .filter(|unit| !exceptions.contains(unit))
            .collect();
        let nasal = NasalRule {
            marker: single_char(&raw.rules.hatsuon.marker, "hatsuon char")?,
            default_sequence: raw.rules.hatsuon.default,
            forces_double,
        };

        Self::new(raw.definitions, gemination, nasal)
    }

    fn validate(&self) -> Result<()> {
        for (unit, alternatives) in &self.definitions {
            let len = unit.chars().count();
            if len == 0 || len > MAX_UNIT_CHARS {
                return Err(TypingError::invalid_table(format!(
                    "unit '{unit}' must be 1 to {MAX_UNIT_CHARS} characters"
                )));
            }
            if alternatives.is_empty() {
                return Err(TypingError::invalid_table(format!("unit '{unit}' has no alternatives")));
            }
            let mut seen = HashSet::with_capacity(alternatives.len());
            for alt in alternatives {
                if alt.is_empty() {
                    return Err(TypingError::invalid_table(format!(
                        "unit '{unit}' has an empty alternative"
                    )));
                }
                if !seen.insert(alt.as_str()) {
                    return Err(TypingError::invalid_table(format!(
                        "unit '{unit}' lists '{alt}' twice"
                    )));
                }
            }
        }
        if self.gemination.default_sequence.is_empty() {
            return Err(TypingError::invalid_table("sokuon default is empty"));
        }
        if self.nasal.default_sequence.is_empty() {
            return Err(TypingError::invalid_table("hatsuon default is empty"));
        }
        if self.gemination.marker == self.nasal.marker {
            return Err(TypingError::invalid_table("sokuon and hatsuon share a marker"));
        }
        Ok(())
    }

    /// Accepted keystroke sequences for a unit, in table order.
    pub fn alternatives(&self, unit: &str) -> Option<&[String]> {
        self.definitions.get(unit).map(Vec::as_slice)
    }

    pub fn contains_unit(&self, unit: &str) -> bool {
        self.definitions.contains_key(unit)
    }

    pub fn gemination(&self) -> &GeminationRule {
        &self.gemination
    }

    pub fn nasal(&self) -> &NasalRule {
        &self.nasal
    }

    pub fn unit_count(&self) -> usize {
        self.definitions.len()
    }
}

fn single_char(s: &str, what: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TypingError::invalid_table(format!(
            "{what} must be exactly one character, got '{s}'"
        ))),
    }
}
